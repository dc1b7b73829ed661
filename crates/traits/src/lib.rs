pub mod measure;
pub mod resource;

pub use measure::{ContentMeasure, FlowContent, FlowItem, MeasureError, StackedFlowMeasure};
pub use resource::{InMemoryResources, ResourceError, ResourceKind, ResourceSink};
