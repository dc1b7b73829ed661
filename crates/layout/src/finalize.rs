//! The last pass over rendered nodes: sizes, box spacing, relative offsets,
//! linear and frame specifics, and the final stacking order.

use crate::LayoutError;
use crate::attributes::AttributeKey;
use crate::constraint::inset;
use crate::context::LayoutContext;
use crate::flags::Alignment;
use crate::node_kind::ContainerType;
use crate::template::sort_render_position;
use crate::util::{format_px, truncate, within_range};
use anchorage_style::{Dimension, Float, TextAlign};
use anchorage_types::{Axis, Edge, NodeId};
use log::{debug, trace};

const EDGES: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

/// Finalizes every node of `order`, which lists rendered nodes parents first.
pub fn finalize(ctx: &mut LayoutContext<'_>, order: &[NodeId]) -> Result<(), LayoutError> {
    for &id in order {
        match ctx.node(id).container_type() {
            ContainerType::Linear => finalize_linear(ctx, id),
            ContainerType::Frame => finalize_frame(ctx, id),
            _ => {}
        }
    }
    for &id in order {
        if ctx.node(id).container_type().is_helper() {
            continue;
        }
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let value = layout_size(ctx, id, axis);
            let key = match axis {
                Axis::Horizontal => AttributeKey::LayoutWidth,
                Axis::Vertical => AttributeKey::LayoutHeight,
            };
            ctx.set_attr(id, key, value, false);
        }
        write_margins(ctx, id);
        write_padding(ctx, id);
        write_translation(ctx, id);
        write_min_max(ctx, id);
    }
    let parents: Vec<NodeId> = ctx.templates.parents().collect();
    for parent in parents {
        let tree = &ctx.tree;
        if let Some(templates) = ctx.templates.children_mut(parent) {
            sort_render_position(tree, templates);
        }
    }
    debug!("Finalized {} nodes", order.len());
    Ok(())
}

/// The `layout_width`/`layout_height` string of a node.
fn layout_size(ctx: &LayoutContext<'_>, id: NodeId, axis: Axis) -> String {
    let node = ctx.node(id);
    let Some(parent) = node.view.render_parent else {
        return "match_parent".to_string();
    };
    let size = node.bounds().size(axis);
    let explicit = match axis {
        Axis::Horizontal => node.has_width(),
        Axis::Vertical => node.has_height(),
    };
    if explicit || node.is_image() || node.container_type() == ContainerType::Block {
        return format_px(size);
    }
    if axis == Axis::Horizontal && node.block_statically() {
        let state = &node.view.constraint;
        let content = ctx.node(parent).content_box();
        match ctx.parent_container(id) {
            ContainerType::Constraint
                if state.anchored_to_parent(crate::anchor::AnchorPosition::Left)
                    && state.anchored_to_parent(crate::anchor::AnchorPosition::Right) =>
            {
                return "0px".to_string();
            }
            ContainerType::Constraint => {}
            _ if within_range(node.element.linear.width, content.width, ctx.epsilon()) => {
                return "match_parent".to_string();
            }
            _ => {}
        }
    }
    "wrap_content".to_string()
}

fn auto_edge(ctx: &LayoutContext<'_>, id: NodeId, edge: Edge) -> bool {
    let margin = &ctx.node(id).style().margin;
    match edge {
        Edge::Top => margin.top.is_auto(),
        Edge::Right => margin.right.is_auto(),
        Edge::Bottom => margin.bottom.is_auto(),
        Edge::Left => margin.left.is_auto(),
    }
}

fn write_margins(ctx: &mut LayoutContext<'_>, id: NodeId) {
    if ctx.render_parent(id).is_none() {
        return;
    }
    let anchored = ctx.parent_container(id).is_anchored();
    for edge in EDGES {
        // Auto margins are reproduced by gravity outside anchored containers.
        let value = if auto_edge(ctx, id, edge) && !anchored {
            0.0
        } else {
            ctx.final_margin(id, edge)
        };
        if value.abs() >= 0.5 {
            ctx.set_attr(id, AttributeKey::Margin(edge), format_px(value), true);
        } else {
            ctx.remove_attr(id, AttributeKey::Margin(edge));
        }
    }
}

fn write_padding(ctx: &mut LayoutContext<'_>, id: NodeId) {
    for edge in EDGES {
        let node = ctx.node(id);
        let style = node.style();
        let value = style.padding.get(edge) + style.border_width.get(edge) + node.view.box_adjustment.padding.get(edge);
        if value.abs() >= 0.5 {
            ctx.set_attr(id, AttributeKey::Padding(edge), format_px(value), true);
        }
    }
}

fn write_translation(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let (x, y) = ctx.node(id).element.offset;
    if x != 0.0 {
        ctx.set_attr(id, AttributeKey::TranslationX, format_px(x), true);
    }
    if y != 0.0 {
        ctx.set_attr(id, AttributeKey::TranslationY, format_px(y), true);
    }
}

fn write_min_max(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let style = ctx.node(id).style().clone();
    let entries = [
        (Axis::Horizontal, style.min_width, AttributeKey::MinWidth, AttributeKey::DimensionMin(Axis::Horizontal)),
        (Axis::Vertical, style.min_height, AttributeKey::MinHeight, AttributeKey::DimensionMin(Axis::Vertical)),
        (Axis::Horizontal, style.max_width, AttributeKey::MaxWidth, AttributeKey::DimensionMax(Axis::Horizontal)),
        (Axis::Vertical, style.max_height, AttributeKey::MaxHeight, AttributeKey::DimensionMax(Axis::Vertical)),
    ];
    for (_, dimension, key, constrained) in entries {
        if ctx.attr(id, constrained).is_some() {
            continue;
        }
        if let Some(px) = dimension.px()
            && px > 0.0
        {
            ctx.set_attr(id, key, format_px(px), true);
        }
    }
}

/// Linear children are spaced by their measured gaps and aligned across the
/// orientation by gravity.
fn finalize_linear(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let horizontal = ctx.attr(id, AttributeKey::Orientation) == Some("horizontal");
    let children = ctx.templates.child_nodes(id);
    let content = *ctx.node(id).content_box();
    let (near, far) = if horizontal { Axis::Horizontal.edges() } else { Axis::Vertical.edges() };
    let baseline = children.iter().any(|&c| ctx.node(c).has_baseline());

    let mut previous: Option<NodeId> = None;
    for &child in &children {
        let bounds = *ctx.node(child).bounds();
        let gap = match previous {
            None => inset(&content, &bounds, near),
            Some(p) => bounds.edge(near) - ctx.node(p).bounds().edge(far),
        };
        ctx.set_margin_to(child, near, gap);
        if let Some(p) = previous {
            ctx.set_margin_to(p, far, 0.0);
        }
        if horizontal {
            if !baseline {
                ctx.set_margin_to(child, Edge::Top, inset(&content, &bounds, Edge::Top));
            }
        } else {
            let node = ctx.node(child);
            let auto = node.auto_margin();
            if auto.horizontal() {
                ctx.set_attr(child, AttributeKey::LayoutGravity, "center_horizontal", true);
            } else if node.float() == Float::Right || auto.left_only() {
                ctx.set_attr(child, AttributeKey::LayoutGravity, "right", true);
                ctx.set_margin_to(child, Edge::Right, inset(&content, &bounds, Edge::Right));
            } else {
                ctx.set_margin_to(child, Edge::Left, inset(&content, &bounds, Edge::Left));
            }
        }
        previous = Some(child);
    }
    if let Some(last) = previous {
        ctx.set_margin_to(last, far, 0.0);
    }

    if horizontal {
        let gravity = match ctx.node(id).style().text_align {
            TextAlign::Center => Some("center_horizontal"),
            TextAlign::Right | TextAlign::End => Some("right"),
            _ => None,
        };
        if let Some(gravity) = gravity {
            ctx.set_attr(id, AttributeKey::Gravity, gravity, true);
        }
        if !baseline {
            ctx.set_attr(id, AttributeKey::BaselineAligned, "false", true);
        }
        let percent: Option<Vec<(NodeId, f32)>> = children
            .iter()
            .map(|&c| match ctx.node(c).style().width {
                Dimension::Percent(v) => Some((c, v / 100.0)),
                _ => None,
            })
            .collect();
        if let Some(weights) = percent.filter(|w| !w.is_empty()) {
            for (child, weight) in weights {
                ctx.set_attr(child, AttributeKey::LayoutWidth, "0px", true);
                let value = truncate(weight, ctx.config.decimal_places);
                ctx.set_attr(child, AttributeKey::LayoutWeight, value, true);
            }
        }
    }
    trace!("Spaced {} children of linear {}", children.len(), id);
}

/// Frame children keep their measured offsets as margins.
fn finalize_frame(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let content = *ctx.node(id).content_box();
    for child in ctx.templates.child_nodes(id) {
        let node = ctx.node(child);
        let bounds = *node.bounds();
        let right = node.float() == Float::Right || node.view.alignment.has_all(Alignment::RIGHT);
        if right {
            ctx.set_attr(child, AttributeKey::LayoutGravity, "right", true);
            ctx.set_margin_to(child, Edge::Right, inset(&content, &bounds, Edge::Right));
            ctx.set_margin_to(child, Edge::Left, 0.0);
        } else {
            ctx.set_margin_to(child, Edge::Left, inset(&content, &bounds, Edge::Left));
        }
        ctx.set_margin_to(child, Edge::Top, inset(&content, &bounds, Edge::Top));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{AnchorPosition, AnchorTarget};
    use crate::test_utils::{block, floated, render_under, with_context, TreeBuilder};
    use anchorage_style::Position;

    fn rendered(ctx: &LayoutContext<'_>, root: NodeId) -> Vec<NodeId> {
        std::iter::once(root).chain(ctx.templates.child_nodes(root)).collect()
    }

    #[test]
    fn sizes_follow_the_render_context() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut fixed = block(0.0, 0.0, 120.0, 40.0);
        fixed.style.width = Dimension::Px(120.0);
        let fixed = builder.child(root, fixed);
        let full = builder.child(root, block(0.0, 40.0, 400.0, 40.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[fixed, full]);
            ctx.view_mut(full).container_type = ContainerType::Linear;
            ctx.anchor(full, AnchorPosition::Left, AnchorTarget::Parent, true);
            ctx.anchor(full, AnchorPosition::Right, AnchorTarget::Parent, true);
            let order = rendered(ctx, root);
            finalize(ctx, &order).unwrap();
            assert_eq!(ctx.attr(root, AttributeKey::LayoutWidth), Some("match_parent"));
            assert_eq!(ctx.attr(fixed, AttributeKey::LayoutWidth), Some("120px"));
            assert_eq!(ctx.attr(full, AttributeKey::LayoutWidth), Some("0px"));
            assert_eq!(ctx.attr(full, AttributeKey::LayoutHeight), Some("wrap_content"));
        });
    }

    #[test]
    fn linear_children_take_their_gaps_as_margins() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let first = builder.child(root, block(10.0, 5.0, 200.0, 40.0));
        let second = builder.child(root, floated(Float::Right, 300.0, 60.0, 100.0, 40.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Linear, &[first, second]);
            ctx.set_attr(root, AttributeKey::Orientation, "vertical", true);
            let order = rendered(ctx, root);
            finalize(ctx, &order).unwrap();
            assert_eq!(ctx.attr(first, AttributeKey::Margin(Edge::Top)), Some("5px"));
            assert_eq!(ctx.attr(first, AttributeKey::Margin(Edge::Left)), Some("10px"));
            assert_eq!(ctx.attr(second, AttributeKey::Margin(Edge::Top)), Some("15px"));
            assert_eq!(ctx.attr(second, AttributeKey::LayoutGravity), Some("right"));
            assert!(ctx.attr(second, AttributeKey::Margin(Edge::Right)).is_none());
        });
    }

    #[test]
    fn relative_offsets_become_translations() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut shifted = block(20.0, 10.0, 100.0, 40.0);
        shifted.style.position = Position::Relative;
        shifted.style.left = Dimension::Px(20.0);
        shifted.style.top = Dimension::Px(10.0);
        let shifted = builder.child(root, shifted);
        with_context(builder.build(), |ctx| {
            assert_eq!(ctx.node(shifted).bounds().left, 0.0);
            render_under(ctx, root, ContainerType::Frame, &[shifted]);
            let order = rendered(ctx, root);
            finalize(ctx, &order).unwrap();
            assert_eq!(ctx.attr(shifted, AttributeKey::TranslationX), Some("20px"));
            assert_eq!(ctx.attr(shifted, AttributeKey::TranslationY), Some("10px"));
            assert!(ctx.attr(shifted, AttributeKey::Margin(Edge::Left)).is_none());
        });
    }

    #[test]
    fn padding_includes_borders() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut boxed = block(0.0, 0.0, 100.0, 40.0);
        boxed.style.padding = anchorage_types::Edges::all(8.0);
        boxed.style.border_width = anchorage_types::Edges::all(2.0);
        let boxed = builder.child(root, boxed);
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Frame, &[boxed]);
            let order = rendered(ctx, root);
            finalize(ctx, &order).unwrap();
            assert_eq!(ctx.attr(boxed, AttributeKey::Padding(Edge::Left)), Some("10px"));
        });
    }
}
