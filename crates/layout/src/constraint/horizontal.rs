//! A single row of children held in a packed horizontal chain.

use super::{center_in_parent, pin_to_parent};
use crate::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
use crate::context::LayoutContext;
use anchorage_style::{Display, TextAlign, VerticalAlign};
use anchorage_types::{Axis, Edge, NodeId};
use std::cmp::Ordering;

/// Horizontal bias of a chain placed by `text-align`.
pub fn text_align_bias(align: TextAlign, rtl: bool) -> f32 {
    match align {
        TextAlign::Center => 0.5,
        TextAlign::Right => 1.0,
        TextAlign::Left | TextAlign::Justify => 0.0,
        TextAlign::Start => {
            if rtl {
                1.0
            } else {
                0.0
            }
        }
        TextAlign::End => {
            if rtl {
                0.0
            } else {
                1.0
            }
        }
    }
}

/// Chains `items` left to right between the parent edges and aligns each one
/// vertically by its `vertical-align`.
pub fn process_constraint_horizontal(ctx: &mut LayoutContext<'_>, container: NodeId, items: &[NodeId]) {
    let Some((&first, rest)) = items.split_first() else {
        return;
    };
    let parent = ctx.node(container);
    let bias = text_align_bias(parent.style().text_align, parent.rtl());

    ctx.anchor(first, AnchorPosition::Left, AnchorTarget::Parent, true);
    let mut previous = first;
    for &item in rest {
        ctx.anchor(item, AnchorPosition::LeftRight, AnchorTarget::Node(previous), true);
        ctx.anchor(previous, AnchorPosition::RightLeft, AnchorTarget::Node(item), true);
        previous = item;
    }
    ctx.anchor(previous, AnchorPosition::Right, AnchorTarget::Parent, true);
    if rest.is_empty() {
        ctx.anchor_bias(first, Axis::Horizontal, bias, true);
    } else {
        ctx.anchor_style(first, Axis::Horizontal, ChainStyle::Packed, bias, true);
    }

    let baseline = find_text_baseline(ctx, items);
    let text_bottom = find_text_bottom(ctx, items, baseline);
    for &item in items {
        let (align, on_baseline) = {
            let node = ctx.node(item);
            (node.style().vertical_align, node.has_baseline())
        };
        match align {
            VerticalAlign::Top | VerticalAlign::TextTop => pin_to_parent(ctx, container, item, Edge::Top),
            VerticalAlign::Bottom => pin_to_parent(ctx, container, item, Edge::Bottom),
            VerticalAlign::TextBottom => match text_bottom.filter(|t| *t != item) {
                Some(target) => align_bottoms(ctx, item, target),
                None => pin_to_parent(ctx, container, item, Edge::Bottom),
            },
            VerticalAlign::Middle => center_in_parent(ctx, container, item, Axis::Vertical),
            VerticalAlign::Sub | VerticalAlign::Super | VerticalAlign::Length(_) => {
                pin_to_parent(ctx, container, item, Edge::Top)
            }
            VerticalAlign::Baseline => match baseline {
                Some(target) if target != item && on_baseline => {
                    ctx.anchor(item, AnchorPosition::Baseline, AnchorTarget::Node(target), true);
                }
                _ => center_in_parent(ctx, container, item, Axis::Vertical),
            },
        }
    }
    if let (Some(base), Some(bottom)) = (baseline, text_bottom)
        && base != bottom
    {
        ctx.anchor_delete(base, &[AnchorPosition::Top, AnchorPosition::Bottom]);
        ctx.delete_chain_style(base, Axis::Vertical);
        align_bottoms(ctx, base, bottom);
    }
}

fn align_bottoms(ctx: &mut LayoutContext<'_>, id: NodeId, target: NodeId) {
    let distance = ctx.node(target).bounds().bottom - ctx.node(id).bounds().bottom;
    ctx.anchor(id, AnchorPosition::Bottom, AnchorTarget::Node(target), true);
    ctx.set_margin_to(id, Edge::Bottom, distance);
}

fn by_height(ctx: &LayoutContext<'_>, a: NodeId, b: NodeId) -> Ordering {
    let height = |id: NodeId| ctx.node(id).bounds().height;
    height(a).total_cmp(&height(b))
}

/// The tallest text item sitting on the baseline, which the others align to.
pub fn find_text_baseline(ctx: &LayoutContext<'_>, items: &[NodeId]) -> Option<NodeId> {
    items
        .iter()
        .copied()
        .filter(|id| {
            let node = ctx.node(*id);
            node.has_baseline() && !node.is_image()
        })
        .reduce(|best, id| {
            if by_height(ctx, id, best) == Ordering::Greater {
                id
            } else {
                best
            }
        })
}

/// The tallest item whose bottom edge ends the line of text, preferring
/// anything over a select box of the same height.
pub fn find_text_bottom(ctx: &LayoutContext<'_>, items: &[NodeId], baseline: Option<NodeId>) -> Option<NodeId> {
    items
        .iter()
        .copied()
        .filter(|id| Some(*id) != baseline)
        .filter(|id| {
            let node = ctx.node(*id);
            node.style().vertical_align == VerticalAlign::TextBottom
                || (node.style().display == Display::InlineBlock && node.has_baseline())
        })
        .reduce(|best, id| match by_height(ctx, id, best) {
            Ordering::Greater => id,
            Ordering::Equal if ctx.node(best).tag() == "SELECT" && ctx.node(id).tag() != "SELECT" => id,
            _ => best,
        })
}
