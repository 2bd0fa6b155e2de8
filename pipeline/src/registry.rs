use std::collections::HashMap;

use once_cell::sync::Lazy;
use pulldown_cmark::Options;

use crate::config::PipelineConfig;
use crate::error::UnknownExtensionError;
use crate::transform::Stage;

/// Applies one extension's capabilities to a config. Must be idempotent.
pub type Mutator = fn(&mut PipelineConfig);

/// Built-in extensions, by identifier.
const BUILTINS: &[(&str, Mutator)] = &[
    ("commonmark", builtin::commonmark as Mutator),
    ("sections", builtin::sections as Mutator),
    ("autoidentifiers", builtin::auto_identifiers as Mutator),
    ("pipetables", builtin::pipe_tables as Mutator),
    ("strikethrough", builtin::strikethrough as Mutator),
    ("tasklists", builtin::task_lists as Mutator),
    ("footnotes", builtin::footnotes as Mutator),
    ("attributes", builtin::attributes as Mutator),
    ("smartypants", builtin::smarty_pants as Mutator),
    ("all", builtin::all as Mutator),
];

static GLOBAL: Lazy<ExtensionRegistry> = Lazy::new(ExtensionRegistry::with_builtins);

/// The process-wide registry, holding the built-in extensions.
///
/// Created on first use and never written afterwards, so any number of
/// threads can build pipelines from it at once.
pub fn global() -> &'static ExtensionRegistry {
    &GLOBAL
}

/// Maps extension identifiers to the mutators that configure them.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    mutators: HashMap<String, Mutator>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = ExtensionRegistry::new();
        for (name, mutator) in BUILTINS {
            registry.register(name, *mutator);
        }
        registry
    }

    /// Register `mutator` under `name` (case-insensitive), replacing and
    /// returning any previous mutator for it.
    pub fn register(&mut self, name: &str, mutator: Mutator) -> Option<Mutator> {
        self.mutators.insert(name.to_lowercase(), mutator)
    }

    pub fn get(&self, name: &str) -> Option<Mutator> {
        self.mutators.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mutators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `names` in order and apply their mutators to a fresh config.
    ///
    /// Fails on the first identifier that is not registered; no config is
    /// produced in that case.
    pub fn build<I, S>(&self, names: I) -> Result<PipelineConfig, UnknownExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = PipelineConfig::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_lowercase();
            let mutator = self
                .mutators
                .get(&key)
                .ok_or_else(|| UnknownExtensionError::new(name))?;
            mutator(&mut config);
            config.record_extension(&key);
        }
        tracing::debug!(
            extensions = ?config.extensions(),
            stages = ?config.stages().collect::<Vec<_>>(),
            "Built pipeline config"
        );
        Ok(config)
    }
}

mod builtin {
    use super::*;

    /// Strict CommonMark baseline. Adds nothing on purpose.
    pub fn commonmark(_config: &mut PipelineConfig) {}

    pub fn sections(config: &mut PipelineConfig) {
        config.enable_stage(Stage::Sections);
    }

    pub fn auto_identifiers(config: &mut PipelineConfig) {
        config.enable_stage(Stage::AutoIdentifiers);
    }

    pub fn pipe_tables(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_TABLES);
    }

    pub fn strikethrough(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_STRIKETHROUGH);
    }

    pub fn task_lists(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_TASKLISTS);
    }

    pub fn footnotes(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_FOOTNOTES);
    }

    pub fn attributes(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_HEADING_ATTRIBUTES);
    }

    pub fn smarty_pants(config: &mut PipelineConfig) {
        config.enable_option(Options::ENABLE_SMART_PUNCTUATION);
    }

    /// Everything except the baseline, composed additively.
    pub fn all(config: &mut PipelineConfig) {
        sections(config);
        auto_identifiers(config);
        pipe_tables(config);
        strikethrough(config);
        task_lists(config);
        footnotes(config);
        attributes(config);
        smarty_pants(config);
    }
}
