// src/error.rs
use anchorage_layout::LayoutError;
use anchorage_style::StyleParseError;
use thiserror::Error;

/// A comprehensive error type for the whole conversion pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid style value: {0}")]
    Style(#[from] StyleParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML writing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is invalid: {0}")]
    Document(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
