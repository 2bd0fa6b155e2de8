use std::ops::Range;

use sectional::{Block, BlockId, Document};

/// A section still accepting children. Its block is only created once the
/// first child arrives, so headings with nothing under them get no section.
#[derive(Debug, Clone)]
struct OpenSection {
    level: u8,
    id: Option<BlockId>,
    /// Span of the owning heading.
    heading: Range<usize>,
}

/// Re-parent the document's flat root sequence into nested sections.
///
/// Every heading of level L opens a section that collects all subsequent
/// blocks until a heading of level <= L shows up. The heading itself stays
/// outside its section, as the sibling right before it. Content ahead of the
/// first heading stays at the root. Heading levels may skip: `#` followed by
/// `###` nests the level-3 section directly in the level-1 one. A section
/// that ends up with no children is never materialized.
///
/// Single pass over the root; the open stack never grows past the number of
/// distinct heading levels.
pub fn build_sections(document: &mut Document) {
    let flat = std::mem::take(&mut document.root);
    // Levels strictly increase from bottom to top.
    let mut open: Vec<OpenSection> = Vec::new();

    for id in flat {
        let Some(level) = document[id].heading_level() else {
            append(document, &mut open, id);
            continue;
        };

        close_sections_to_level(document, &mut open, level);
        append(document, &mut open, id);

        debug_assert!(open.last().is_none_or(|outer| outer.level < level));
        tracing::trace!(level, depth = open.len(), "open section");
        open.push(OpenSection {
            level,
            id: None,
            heading: document[id].span.clone(),
        });
    }

    // Close everything still open, innermost first.
    close_sections_to_level(document, &mut open, 0);
}

/// Close every open section whose level is >= `level`, attaching each to
/// the context that becomes innermost.
fn close_sections_to_level(document: &mut Document, open: &mut Vec<OpenSection>, level: u8) {
    while open.last().is_some_and(|top| top.level >= level) {
        let Some(section) = open.pop() else {
            break;
        };
        tracing::trace!(level = section.level, materialized = section.id.is_some(), "close section");
        if let Some(id) = section.id {
            append(document, open, id);
        }
    }
}

/// Attach `child` to the innermost open section, or the root.
fn append(document: &mut Document, open: &mut [OpenSection], child: BlockId) {
    let end = document[child].span.end;
    let Some(parent) = open.last_mut() else {
        document.root.push(child);
        return;
    };
    let parent_id = match parent.id {
        Some(id) => id,
        None => {
            let id = document.push(Block::section(parent.level, parent.heading.clone()));
            parent.id = Some(id);
            id
        }
    };
    let section = &mut document[parent_id];
    section.children.push(child);
    section.span.end = section.span.end.max(end);
}
