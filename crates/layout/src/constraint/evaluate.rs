//! Checks that every child of a constraint container is positioned, and adds
//! barriers where a bottom-anchored child would otherwise ignore the views
//! stacked above it.

use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget};
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use crate::materialize::{StaticNode, render_node_static};
use crate::node_kind::ContainerType;
use anchorage_types::{Axis, BoxRect, NodeId};
use log::{debug, warn};

const AXES: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

/// An axis is resolved once one of its anchors reaches the parent or a
/// sibling already resolved on that axis.
fn resolves(ctx: &LayoutContext<'_>, id: NodeId, axis: Axis) -> bool {
    ctx.node(id).view.constraint.targets(axis).any(|target| match target {
        AnchorTarget::Parent => true,
        AnchorTarget::Node(other) => ctx.node(other).view.constraint.pinned(axis),
    })
}

/// Pins every child whose anchors lead back to the parent, repeating until
/// nothing changes, then inserts the barriers bottom anchors need.
pub fn evaluate_anchors(ctx: &mut LayoutContext<'_>, container: NodeId) -> Result<(), LayoutError> {
    let nodes = ctx.templates.child_nodes(container);
    for &id in &nodes {
        if ctx.node(id).container_type().is_helper() {
            let view = ctx.view_mut(id);
            view.constraint.pin(Axis::Horizontal);
            view.constraint.pin(Axis::Vertical);
        }
    }

    let mut index = 0;
    while index < nodes.len() {
        let id = nodes[index];
        let mut changed = false;
        for axis in AXES {
            if !ctx.node(id).view.constraint.pinned(axis) && resolves(ctx, id, axis) {
                ctx.view_mut(id).constraint.pin(axis);
                changed = true;
            }
        }
        index = if changed { 0 } else { index + 1 };
    }

    insert_barriers(ctx, container, &nodes)?;

    for &id in &nodes {
        for axis in AXES {
            if !ctx.node(id).view.constraint.pinned(axis) {
                warn!("{} is not anchored on the {} axis in {}", id, axis.as_str(), container);
            }
        }
    }
    Ok(())
}

/// A node nothing below it is stacked onto.
fn dead_end(ctx: &LayoutContext<'_>, nodes: &[NodeId], id: NodeId) -> bool {
    !nodes
        .iter()
        .any(|&other| ctx.anchor_target(other, AnchorPosition::TopBottom) == Some(AnchorTarget::Node(id)))
}

fn insert_barriers(ctx: &mut LayoutContext<'_>, container: NodeId, nodes: &[NodeId]) -> Result<(), LayoutError> {
    let epsilon = ctx.epsilon();
    for &id in nodes {
        let node = ctx.node(id);
        let state = &node.view.constraint;
        if node.container_type().is_helper()
            || node.view.positioned
            || !state.anchored_to_parent(AnchorPosition::Bottom)
            || state.get(AnchorPosition::Top).is_some()
            || state.get(AnchorPosition::TopBottom).is_some()
            || state.get(AnchorPosition::Baseline).is_some()
        {
            continue;
        }
        let top = node.bounds().top;
        let above: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|&other| {
                let candidate = ctx.node(other);
                other != id
                    && !candidate.container_type().is_helper()
                    && !candidate.view.positioned
                    && candidate.bounds().bottom <= top + epsilon
                    && dead_end(ctx, nodes, other)
            })
            .collect();
        if above.is_empty() {
            continue;
        }
        let referenced: Vec<String> = above
            .iter()
            .filter_map(|&other| ctx.tree.document_id(other).map(|d| d.to_string()))
            .collect();
        let content = *ctx.node(container).content_box();
        let line = BoxRect::new(content.left, top, content.width, 0.0);
        let barrier = render_node_static(
            ctx,
            container,
            StaticNode::new(ContainerType::Barrier, line)
                .attribute(AttributeKey::BarrierDirection, "bottom")
                .attribute(AttributeKey::ReferencedIds, referenced.join(",")),
        )?;
        let view = ctx.view_mut(barrier);
        view.constraint.pin(Axis::Horizontal);
        view.constraint.pin(Axis::Vertical);
        ctx.anchor(id, AnchorPosition::TopBottom, AnchorTarget::Node(barrier), true);
        ctx.anchor_bias(id, Axis::Vertical, 1.0, true);
        debug!("Barrier {} keeps {} below {} views", barrier, id, referenced.len());
    }
    Ok(())
}
