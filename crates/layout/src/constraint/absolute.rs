//! Out-of-flow children: each axis is resolved on its own from the offsets.

use super::guideline::add_guideline;
use super::{center_in_parent, inset, pin_to_parent};
use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget, GuidelineMode};
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use anchorage_style::ComputedStyle;
use anchorage_style::dimension::Dimension;
use anchorage_types::{Axis, Edge, NodeId};
use log::trace;

fn offset(style: &ComputedStyle, edge: Edge) -> Dimension {
    match edge {
        Edge::Top => style.top,
        Edge::Right => style.right,
        Edge::Bottom => style.bottom,
        Edge::Left => style.left,
    }
}

fn size(style: &ComputedStyle, axis: Axis) -> Dimension {
    match axis {
        Axis::Horizontal => style.width,
        Axis::Vertical => style.height,
    }
}

/// Anchors a positioned child to the parent edges its offsets name.
///
/// A single set offset anchors that edge alone. Both offsets around an auto
/// margin center the child; both offsets around an auto size stretch it. A
/// full size with one offset anchors both edges. A percentage offset, or no
/// offset at all, places the child on a guideline at its measured position.
pub fn resolve_absolute(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId) -> Result<(), LayoutError> {
    let style = ctx.node(id).style().clone();
    let auto = ctx.node(id).auto_margin();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (near, far) = axis.edges();
        let near_set = !offset(&style, near).is_auto();
        let far_set = !offset(&style, far).is_auto();
        let auto_margins = match axis {
            Axis::Horizontal => auto.left && auto.right,
            Axis::Vertical => auto.top && auto.bottom,
        };
        let dimension = size(&style, axis);
        let full = dimension.fraction().is_some_and(|f| f >= 1.0);

        if near_set && far_set && auto_margins {
            center_in_parent(ctx, container, id, axis);
        } else if full && near_set != far_set {
            ctx.anchor_parent(id, axis, None, true);
            ctx.set_margin_to(id, near, 0.0);
            ctx.set_margin_to(id, far, 0.0);
        } else if near_set && far_set && dimension.is_auto() {
            let content = *ctx.node(container).content_box();
            let bounds = *ctx.node(id).bounds();
            ctx.anchor(id, AnchorPosition::aligned(near), AnchorTarget::Parent, true);
            ctx.anchor(id, AnchorPosition::aligned(far), AnchorTarget::Parent, true);
            ctx.set_margin_to(id, near, inset(&content, &bounds, near));
            ctx.set_margin_to(id, far, inset(&content, &bounds, far));
            let key = match axis {
                Axis::Horizontal => AttributeKey::LayoutWidth,
                Axis::Vertical => AttributeKey::LayoutHeight,
            };
            ctx.set_attr(id, key, "0px", true);
        } else if far_set && !near_set {
            pin_to_parent(ctx, container, id, far);
        } else if near_set && !offset(&style, near).is_percent() {
            pin_to_parent(ctx, container, id, near);
        } else if near_set {
            add_guideline(ctx, container, id, axis, GuidelineMode::Percent)?;
        } else {
            add_guideline(ctx, container, id, axis, GuidelineMode::Begin)?;
        }
    }
    ctx.view_mut(id).positioned = true;
    trace!("Resolved positioned child {} of {}", id, container);
    Ok(())
}
