//! Guidelines: invisible lines children of a constraint container can be
//! anchored to when no sibling or parent edge sits where they need to be.

use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget, GuidelineKey, GuidelineMode};
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use crate::materialize::{StaticNode, render_node_static};
use crate::node_kind::ContainerType;
use crate::util::{format_px, truncate, within_range};
use anchorage_types::{Axis, BoxRect, Edge, NodeId};
use log::trace;

/// A sibling already anchored on `axis` whose edge lines up with the node's
/// near edge.
fn matching_sibling(
    ctx: &LayoutContext<'_>,
    container: NodeId,
    id: NodeId,
    edge: Edge,
) -> Option<(NodeId, AnchorPosition)> {
    let epsilon = ctx.epsilon();
    let location = ctx.node(id).bounds().edge(edge);
    ctx.templates.child_nodes(container).into_iter().find_map(|sibling| {
        let node = ctx.node(sibling);
        if sibling == id || node.container_type().is_helper() || !node.view.constraint.anchored(edge.axis()) {
            return None;
        }
        if within_range(node.bounds().edge(edge), location, epsilon) {
            Some((sibling, AnchorPosition::aligned(edge)))
        } else if within_range(node.bounds().edge(edge.opposite()), location, epsilon) {
            Some((sibling, AnchorPosition::adjacent(edge)))
        } else {
            None
        }
    })
}

/// Anchors the near edge of `id` on `axis` at its measured position.
///
/// Prefers an aligned sibling, then the parent edges, then a guideline
/// already created at the same offset, and only then adds a new one.
pub fn add_guideline(
    ctx: &mut LayoutContext<'_>,
    container: NodeId,
    id: NodeId,
    axis: Axis,
    mode: GuidelineMode,
) -> Result<(), LayoutError> {
    let (edge, far) = axis.edges();
    if let Some((sibling, position)) = matching_sibling(ctx, container, id, edge) {
        ctx.anchor(id, position, AnchorTarget::Node(sibling), true);
        ctx.set_margin_to(id, edge, 0.0);
        return Ok(());
    }

    let content = *ctx.node(container).content_box();
    let bounds = *ctx.node(id).bounds();
    // Negative margins are already part of the measured border box.
    let mut location = bounds.edge(edge) - content.edge(edge);
    if ctx.node(id).positive_axis() {
        location -= ctx.node(container).view.box_adjustment.padding.get(edge);
    }
    if location <= 0.0 {
        ctx.anchor(id, AnchorPosition::aligned(edge), AnchorTarget::Parent, true);
        ctx.set_margin_to(id, edge, 0.0);
        return Ok(());
    }
    let size = content.size(axis);
    let sized = match axis {
        Axis::Horizontal => ctx.node(container).has_width(),
        Axis::Vertical => ctx.node(container).has_height(),
    };
    if sized && location >= size {
        ctx.anchor(id, AnchorPosition::aligned(far), AnchorTarget::Parent, true);
        ctx.set_margin_to(id, far, 0.0);
        return Ok(());
    }

    let mode = if size > 0.0 { mode } else { GuidelineMode::Begin };
    let value = match mode {
        GuidelineMode::Percent => truncate(location / size, ctx.config.decimal_places),
        GuidelineMode::Begin => format_px(location),
    };
    let key = GuidelineKey { axis, mode, edge };
    let cached = ctx.node(container).view.constraint.guideline(key, &value);
    let guideline = match cached {
        Some(existing) => existing,
        None => {
            let (orientation, line) = match axis {
                Axis::Horizontal => (
                    "vertical",
                    BoxRect::new(content.left + location, content.top, 0.0, content.height),
                ),
                Axis::Vertical => (
                    "horizontal",
                    BoxRect::new(content.left, content.top + location, content.width, 0.0),
                ),
            };
            let attribute = match mode {
                GuidelineMode::Percent => AttributeKey::GuidePercent,
                GuidelineMode::Begin => AttributeKey::GuideBegin,
            };
            let guideline = render_node_static(
                ctx,
                container,
                StaticNode::new(ContainerType::Guideline, line)
                    .attribute(AttributeKey::Orientation, orientation)
                    .attribute(attribute, value.clone()),
            )?;
            let view = ctx.view_mut(guideline);
            view.constraint.pin(Axis::Horizontal);
            view.constraint.pin(Axis::Vertical);
            ctx.view_mut(container)
                .constraint
                .cache_guideline(key, value.clone(), guideline);
            trace!("Added {:?} guideline at {} in {}", axis, value, container);
            guideline
        }
    };
    ctx.anchor(id, AnchorPosition::aligned(edge), AnchorTarget::Node(guideline), true);
    ctx.set_margin_to(id, edge, 0.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ConstraintRelation;
    use crate::test_utils::{block, render_under, with_context, TreeBuilder};

    #[test]
    fn zero_offset_anchors_the_parent_edge() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let item = builder.child(root, block(0.0, 40.0, 100.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[item]);
            add_guideline(ctx, root, item, Axis::Horizontal, GuidelineMode::Begin).unwrap();
            assert_eq!(
                ctx.attr(item, AttributeKey::Constraint(ConstraintRelation::LeftToLeftOf)),
                Some("parent")
            );
            assert_eq!(ctx.node(root).view.constraint.guideline_count(), 0);
            assert_eq!(ctx.templates.child_nodes(root), vec![item]);
        });
    }

    #[test]
    fn guidelines_at_the_same_offset_are_shared() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let first = builder.child(root, block(40.0, 10.0, 100.0, 20.0));
        let second = builder.child(root, block(40.0, 200.0, 100.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[first, second]);
            add_guideline(ctx, root, first, Axis::Horizontal, GuidelineMode::Begin).unwrap();
            assert_eq!(ctx.node(root).view.constraint.guideline_count(), 1);
            let guideline = ctx.templates.child_nodes(root)[2];
            assert_eq!(ctx.attr(guideline, AttributeKey::GuideBegin), Some("40px"));
            assert_eq!(ctx.attr(guideline, AttributeKey::Orientation), Some("vertical"));

            ctx.anchor_clear(first, None);
            add_guideline(ctx, root, second, Axis::Horizontal, GuidelineMode::Begin).unwrap();
            assert_eq!(ctx.node(root).view.constraint.guideline_count(), 1);
            assert_eq!(
                ctx.attr(second, AttributeKey::Constraint(ConstraintRelation::LeftToLeftOf)),
                Some("@id/guideline_1")
            );
        });
    }

    #[test]
    fn aligned_sibling_is_preferred_over_a_guideline() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let first = builder.child(root, block(40.0, 10.0, 100.0, 20.0));
        let second = builder.child(root, block(140.0, 200.0, 100.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[first, second]);
            add_guideline(ctx, root, first, Axis::Horizontal, GuidelineMode::Percent).unwrap();
            add_guideline(ctx, root, second, Axis::Horizontal, GuidelineMode::Percent).unwrap();
            assert_eq!(ctx.node(root).view.constraint.guideline_count(), 1);
            assert_eq!(
                ctx.attr(second, AttributeKey::Constraint(ConstraintRelation::LeftToRightOf)),
                Some("@id/view_1")
            );
        });
    }
}
