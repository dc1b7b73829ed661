//! Conversion pipeline orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder for a [`LayoutPipeline`]
//! - [`PipelineConfig`]: layout and output options, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use anchorage::{DocumentNode, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_config_file("anchorage.json")?
//!     .build()?;
//!
//! let document = DocumentNode::from_file("page.json")?;
//! pipeline.generate_to_dir(&document, "activity_main", "res/layout")?;
//! ```

mod builder;
pub mod config;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::{OutputOptions, PipelineConfig};
pub use orchestrator::{Conversion, LayoutPipeline};
