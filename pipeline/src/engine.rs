use sectional::Document;
use sectional::parser::Parser;

use crate::config::PipelineConfig;
use crate::error::UnknownExtensionError;
use crate::registry::{self, ExtensionRegistry};
use crate::render::render_html;

/// A configured Markdown-to-HTML pipeline.
///
/// Holds only the resolved configuration, so one pipeline can render any
/// number of documents, from any number of threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Build from extension identifiers using the global registry.
    pub fn new<I, S>(names: I) -> Result<Self, UnknownExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_registry(registry::global(), names)
    }

    /// Build from an `_`-joined identifier string such as `"sections_pipetables"`.
    pub fn from_spec(spec: &str) -> Result<Self, UnknownExtensionError> {
        Self::new(split_spec(spec))
    }

    pub fn with_registry<I, S>(
        registry: &ExtensionRegistry,
        names: I,
    ) -> Result<Self, UnknownExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = registry.build(names)?;
        Ok(Pipeline { config })
    }

    pub fn from_config(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse and run every configured stage, stopping short of rendering.
    pub fn parse(&self, markdown: &str) -> Document {
        let mut document = Parser::new(markdown, self.config.options()).parse();
        for stage in self.config.stages() {
            stage.apply(&mut document);
        }
        document
    }

    pub fn render(&self, markdown: &str) -> String {
        render_html(&self.parse(markdown))
    }
}

/// Split an `_`-joined identifier string, ignoring blank segments.
pub fn split_spec(spec: &str) -> impl Iterator<Item = &str> {
    spec.split('_').map(str::trim).filter(|name| !name.is_empty())
}
