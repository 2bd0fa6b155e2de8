//! Tree transforms run between parsing and rendering.

pub mod identifiers;
pub mod sections;

use sectional::Document;

/// A transform an extension can switch on.
///
/// The derived ordering is the execution order: whatever order extensions
/// were named in, enabled stages always run top to bottom as declared here.
/// Heading ids are assigned before headings get wrapped into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    AutoIdentifiers,
    Sections,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::AutoIdentifiers => "autoidentifiers",
            Stage::Sections => "sections",
        }
    }

    pub fn apply(&self, document: &mut Document) {
        tracing::debug!(stage = self.name(), "Running transform");
        match self {
            Stage::AutoIdentifiers => identifiers::assign_heading_ids(document),
            Stage::Sections => sections::build_sections(document),
        }
    }
}
