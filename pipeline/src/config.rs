use std::collections::BTreeSet;

use pulldown_cmark::Options;

use crate::transform::Stage;

/// The resolved shape of a pipeline: which parser features are on and which
/// transform stages run.
///
/// Every mutation is idempotent. Options are bit flags, stages are a set and
/// the applied-extension list drops repeats, so applying the same extension
/// twice leaves the config exactly as applying it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    extensions: Vec<String>,
    options: Options,
    stages: BTreeSet<Stage>,
}

impl PipelineConfig {
    /// Plain CommonMark: no parser extensions, no stages.
    pub fn new() -> Self {
        PipelineConfig {
            extensions: Vec::new(),
            options: Options::empty(),
            stages: BTreeSet::new(),
        }
    }

    pub fn enable_option(&mut self, option: Options) {
        self.options.insert(option);
    }

    pub fn enable_stage(&mut self, stage: Stage) {
        self.stages.insert(stage);
    }

    /// Parser options to hand to pulldown-cmark.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Enabled stages, in execution order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().copied()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Names of the extensions applied so far, lower-cased, first use order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub(crate) fn record_extension(&mut self, name: &str) {
        if !self.extensions.iter().any(|e| e == name) {
            self.extensions.push(name.to_string());
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
