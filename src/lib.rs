pub mod document;
pub mod error;
pub mod pipeline;
pub mod xml;

pub use anchorage_layout::{
    AttributeKey, ContainerType, Controller, LayoutConfig, LayoutError, RenderOutput, RenderTemplate,
    TemplateKind,
};
pub use document::DocumentNode;
pub use error::PipelineError;
pub use pipeline::{Conversion, LayoutPipeline, OutputOptions, PipelineBuilder, PipelineConfig};
pub use xml::{LayoutFile, write_layouts};
