use anchorage_traits::MeasureError;
use anchorage_types::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Layout has no children to classify.")]
    EmptyLayout,
    #[error("Container type of node {0} was never assigned.")]
    ContainerTypeUnset(NodeId),
    #[error("Container type of node {0} is already assigned.")]
    ContainerTypeReassigned(NodeId),
    #[error("Node {0} is not a constraint container.")]
    NotConstraintContainer(NodeId),
    #[error("Node {0} does not exist in the tree.")]
    UnknownNode(NodeId),
    #[error("Content measurement failed: {0}")]
    Measure(#[from] MeasureError),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod anchor;
pub mod attributes;
pub mod classifier;
pub mod config;
pub mod constraint;
pub mod context;
pub mod controller;
pub mod edit;
pub mod finalize;
pub mod flags;
pub mod flexbox;
pub mod layout;
pub mod materialize;
pub mod node;
pub mod node_kind;
pub mod relative;
pub mod template;
pub mod tree;
pub mod util;

pub use self::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
pub use self::attributes::{AttributeBag, AttributeKey, Namespace};
pub use self::config::LayoutConfig;
pub use self::context::LayoutContext;
pub use self::controller::{Controller, RenderOutput};
pub use self::flags::Alignment;
pub use self::layout::Layout;
pub use self::node::{Element, Node};
pub use self::node_kind::ContainerType;
pub use self::template::{RenderTemplate, TemplateKind};
pub use self::tree::NodeTree;

#[cfg(test)]
mod scenario_test;
#[cfg(test)]
mod test_utils;
