// src/pipeline/orchestrator.rs
use super::config::PipelineConfig;
use crate::document::DocumentNode;
use crate::error::PipelineError;
use crate::xml::{LayoutFile, write_layouts};
use anchorage_layout::{Controller, RenderOutput};
use anchorage_traits::{ContentMeasure, InMemoryResources};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// The result of converting one document.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: RenderOutput,
    /// Colors, strings and drawables referenced from the attributes.
    pub resources: InMemoryResources,
}

/// Converts measured documents into layout XML.
#[derive(Debug)]
pub struct LayoutPipeline {
    config: PipelineConfig,
    measure: Box<dyn ContentMeasure>,
}

impl LayoutPipeline {
    pub(super) fn new(config: PipelineConfig, measure: Box<dyn ContentMeasure>) -> Self {
        Self { config, measure }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the layout engine over one document.
    pub fn convert(&self, document: &DocumentNode) -> Result<Conversion, PipelineError> {
        let start = Instant::now();
        let tree = document.into_tree()?;
        let nodes = tree.len();
        let mut resources = InMemoryResources::new();
        let output = Controller::new(tree, self.config.layout, &mut resources, self.measure.as_ref()).convert()?;
        log::info!(
            "Converted {} nodes in {:.2?} ({} resources)",
            nodes,
            start.elapsed(),
            resources.len()
        );
        Ok(Conversion { output, resources })
    }

    pub fn convert_json(&self, json: &str) -> Result<Conversion, PipelineError> {
        self.convert(&DocumentNode::from_json(json)?)
    }

    /// Converts a document and writes its layouts to strings. The main layout
    /// comes first, named `name`.
    pub fn generate(&self, document: &DocumentNode, name: &str) -> Result<Vec<LayoutFile>, PipelineError> {
        let conversion = self.convert(document)?;
        write_layouts(&conversion.output, name, &self.config.output)
    }

    /// Converts a document and writes `<name>.xml` plus its included layouts
    /// into `dir`. Returns the written paths.
    pub fn generate_to_dir<P: AsRef<Path>>(
        &self,
        document: &DocumentNode,
        name: &str,
        dir: P,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for file in self.generate(document, name)? {
            let path = dir.join(format!("{}.xml", file.name));
            fs::write(&path, file.contents)?;
            log::debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
