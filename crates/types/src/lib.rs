pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{Axis, BoxRect, Edge, Edges, Size};
pub use ids::{DocumentId, NodeId};
