// src/pipeline/builder.rs
use super::config::{OutputOptions, PipelineConfig};
use super::orchestrator::LayoutPipeline;
use crate::error::PipelineError;
use anchorage_layout::LayoutConfig;
use anchorage_traits::{ContentMeasure, StackedFlowMeasure};
use std::path::Path;

/// A builder for creating a `LayoutPipeline`.
#[derive(Debug)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    measure: Box<dyn ContentMeasure>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            measure: Box::new(StackedFlowMeasure),
        }
    }
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = PipelineConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn with_output_options(mut self, output: OutputOptions) -> Self {
        self.config.output = output;
        self
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.config.output.pretty_print = pretty_print;
        self
    }

    /// Emit `start`/`end` anchors for right-to-left documents.
    pub fn with_rtl(mut self, supports_rtl: bool) -> Self {
        self.config.layout.supports_rtl = supports_rtl;
        self
    }

    /// Selects how multi-column content heights are estimated.
    pub fn with_measure(mut self, measure: Box<dyn ContentMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Consumes the builder and creates the `LayoutPipeline`.
    pub fn build(self) -> Result<LayoutPipeline, PipelineError> {
        self.config.validate()?;
        log::info!(
            "Building layout pipeline (rtl: {}, collapse: {})",
            self.config.layout.supports_rtl,
            self.config.layout.collapse_unattributed_elements
        );
        Ok(LayoutPipeline::new(self.config, self.measure))
    }
}
