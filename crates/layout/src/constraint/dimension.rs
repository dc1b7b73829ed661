//! Percentage and min/max sizes of constraint children.

use crate::anchor::{AnchorPosition, AnchorTarget};
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use crate::util::{format_px, truncate};
use anchorage_types::{Axis, Edge, NodeId};

fn size_key(axis: Axis) -> AttributeKey {
    match axis {
        Axis::Horizontal => AttributeKey::LayoutWidth,
        Axis::Vertical => AttributeKey::LayoutHeight,
    }
}

fn edge_anchored(ctx: &LayoutContext<'_>, id: NodeId, edge: Edge) -> bool {
    ctx.node(id)
        .view
        .constraint
        .iter()
        .any(|(position, _)| position.node_edge() == Some(edge))
}

/// Sizes a percentage child as a share of a container without an explicit
/// size on that axis, and writes its px min/max bounds.
pub fn set_constraint_dimension(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId) {
    if ctx.node(id).container_type().is_helper() {
        return;
    }
    let style = ctx.node(id).style().clone();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (size, min, max) = match axis {
            Axis::Horizontal => (style.width, style.min_width, style.max_width),
            Axis::Vertical => (style.height, style.min_height, style.max_height),
        };
        let parent_sized = match axis {
            Axis::Horizontal => ctx.node(container).has_width(),
            Axis::Vertical => ctx.node(container).has_height(),
        };
        if let Some(fraction) = size.fraction()
            && ctx.config.constraint_percent_dimensions
            && !parent_sized
            && ctx.attr(id, AttributeKey::DimensionPercent(axis)).is_none()
        {
            let (near, far) = axis.edges();
            if !edge_anchored(ctx, id, near) {
                ctx.anchor(id, AnchorPosition::aligned(near), AnchorTarget::Parent, false);
            }
            if !edge_anchored(ctx, id, far) {
                ctx.anchor(id, AnchorPosition::aligned(far), AnchorTarget::Parent, false);
                ctx.anchor_bias(id, axis, 0.0, false);
            }
            let percent = truncate(fraction, ctx.config.decimal_places);
            ctx.set_attr(id, size_key(axis), "0px", true);
            ctx.set_attr(id, AttributeKey::DimensionPercent(axis), percent, true);
        }
        let constrained = ctx.attr(id, size_key(axis)) == Some("0px");
        if !constrained {
            continue;
        }
        if let Some(px) = min.px()
            && px > 0.0
        {
            ctx.set_attr(id, AttributeKey::DimensionMin(axis), format_px(px), true);
        }
        if let Some(px) = max.px() {
            ctx.set_attr(id, AttributeKey::DimensionMax(axis), format_px(px), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ConstraintRelation;
    use crate::node_kind::ContainerType;
    use crate::test_utils::{block, render_under, with_config, with_context, TreeBuilder};
    use crate::config::LayoutConfig;
    use anchorage_style::dimension::Dimension;

    #[test]
    fn percent_width_becomes_a_constraint_percent() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut half = block(0.0, 0.0, 200.0, 20.0);
        half.style.width = Dimension::Percent(50.0);
        half.style.min_width = Dimension::Px(120.0);
        let half = builder.child(root, half);
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[half]);
            ctx.anchor(half, AnchorPosition::Left, AnchorTarget::Parent, true);
            set_constraint_dimension(ctx, root, half);
            assert_eq!(ctx.attr(half, AttributeKey::LayoutWidth), Some("0px"));
            assert_eq!(ctx.attr(half, AttributeKey::DimensionPercent(Axis::Horizontal)), Some("0.5"));
            assert_eq!(ctx.attr(half, AttributeKey::DimensionMin(Axis::Horizontal)), Some("120px"));
            assert_eq!(
                ctx.attr(half, AttributeKey::Constraint(ConstraintRelation::RightToRightOf)),
                Some("parent")
            );
            assert_eq!(ctx.attr(half, AttributeKey::Bias(Axis::Horizontal)), Some("0"));
        });
    }

    #[test]
    fn percent_is_left_alone_when_disabled() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut half = block(0.0, 0.0, 200.0, 20.0);
        half.style.width = Dimension::Percent(50.0);
        let half = builder.child(root, half);
        let config = LayoutConfig {
            constraint_percent_dimensions: false,
            ..Default::default()
        };
        with_config(builder.build(), config, |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[half]);
            set_constraint_dimension(ctx, root, half);
            assert!(ctx.attr(half, AttributeKey::DimensionPercent(Axis::Horizontal)).is_none());
            assert!(ctx.attr(half, AttributeKey::LayoutWidth).is_none());
        });
    }
}
