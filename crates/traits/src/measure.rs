//! ContentMeasure trait for estimating the height of reflowed content.
//!
//! Multi-column distribution needs the height a run of elements would take
//! when stacked inside a single column. A browser host answers this by
//! rendering the content off-screen; other hosts estimate it.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Cannot measure content of width {0:.2}")]
    InvalidWidth(f32),

    #[error("Measurement failed: {0}")]
    Failed(String),
}

/// One element of a flow run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowItem {
    /// Border-box height as measured in the source layout.
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// The element only exists in the output tree (e.g. a synthesized group).
    pub synthetic: bool,
}

/// A run of elements stacked vertically inside a box of `width`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowContent {
    pub width: f32,
    pub items: Vec<FlowItem>,
}

pub trait ContentMeasure: Debug {
    /// Height of `content` laid out as normal block flow.
    fn measure_flow_height(&self, content: &FlowContent) -> Result<f32, MeasureError>;
}

/// Estimates flow height by stacking measured boxes with collapsed margins.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackedFlowMeasure;

impl ContentMeasure for StackedFlowMeasure {
    fn measure_flow_height(&self, content: &FlowContent) -> Result<f32, MeasureError> {
        if !content.width.is_finite() || content.width < 0.0 {
            return Err(MeasureError::InvalidWidth(content.width));
        }
        let mut height = 0.0;
        let mut pending_margin: Option<f32> = None;
        for item in &content.items {
            height += match pending_margin {
                Some(previous) => collapse(previous, item.margin_top),
                None => item.margin_top,
            };
            height += item.height;
            pending_margin = Some(item.margin_bottom);
        }
        Ok(height + pending_margin.unwrap_or(0.0))
    }
}

/// Collapses two adjoining vertical margins.
fn collapse(a: f32, b: f32) -> f32 {
    if a >= 0.0 && b >= 0.0 {
        a.max(b)
    } else if a < 0.0 && b < 0.0 {
        a.min(b)
    } else {
        a + b
    }
}
