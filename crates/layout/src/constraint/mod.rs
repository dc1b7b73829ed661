//! Anchoring of children inside constraint containers.
//!
//! Every pass here works on the render children of one container and only
//! writes anchors, biases, chain styles and margin adjustments. Sizes that
//! depend on anchors are settled by [`dimension`]; [`evaluate`] verifies that
//! every child ends up pinned on both axes.

pub mod absolute;
pub mod chain;
pub mod column;
pub mod dimension;
pub mod evaluate;
pub mod guideline;
pub mod horizontal;

use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget};
use crate::context::LayoutContext;
use crate::flags::Alignment;
use crate::flexbox;
use crate::node_kind::ContainerType;
use crate::relative;
use anchorage_types::{Axis, BoxRect, Edge, NodeId};
use log::debug;

/// Distance from the container's content edge to the same edge of `rect`,
/// measured inwards.
pub(crate) fn inset(container: &BoxRect, rect: &BoxRect, edge: Edge) -> f32 {
    if edge.is_near() {
        rect.edge(edge) - container.edge(edge)
    } else {
        container.edge(edge) - rect.edge(edge)
    }
}

/// Anchors `edge` of the node to the same parent edge at its measured distance.
pub(crate) fn pin_to_parent(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId, edge: Edge) {
    let distance = inset(ctx.node(container).content_box(), ctx.node(id).bounds(), edge);
    ctx.anchor(id, AnchorPosition::aligned(edge), AnchorTarget::Parent, true);
    ctx.set_margin_to(id, edge, distance);
}

/// Centers the node on `axis` with a bias reproducing its measured position.
pub(crate) fn center_in_parent(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId, axis: Axis) {
    let (near, far) = axis.edges();
    let content = *ctx.node(container).content_box();
    let bounds = *ctx.node(id).bounds();
    let bias = crate::util::calculate_bias(
        inset(&content, &bounds, near).max(0.0),
        inset(&content, &bounds, far).max(0.0),
        ctx.config.decimal_places,
    );
    ctx.anchor_parent(id, axis, Some(bias), true);
    ctx.set_margin_to(id, near, 0.0);
    ctx.set_margin_to(id, far, 0.0);
}

/// Places the children of every rendered anchored container, in render order.
pub fn set_constraints(ctx: &mut LayoutContext<'_>, containers: &[NodeId]) -> Result<(), LayoutError> {
    for &id in containers {
        match ctx.node(id).container_type() {
            ContainerType::Constraint => process_constraint_container(ctx, id)?,
            ContainerType::Relative => relative::process_relative(ctx, id),
            _ => {}
        }
    }
    Ok(())
}

/// Anchors the children of one constraint container.
pub fn process_constraint_container(ctx: &mut LayoutContext<'_>, id: NodeId) -> Result<(), LayoutError> {
    if ctx.node(id).container_type() != ContainerType::Constraint {
        return Err(LayoutError::NotConstraintContainer(id));
    }
    let children: Vec<NodeId> = ctx
        .templates
        .child_nodes(id)
        .into_iter()
        .filter(|c| !ctx.node(*c).container_type().is_helper())
        .collect();
    if children.is_empty() {
        return Ok(());
    }
    let alignment = ctx.node(id).view.alignment;
    debug!(
        "Anchoring {} children of {} with {:?}",
        children.len(),
        id,
        alignment
    );
    if alignment.has_all(Alignment::AUTO_LAYOUT) && !alignment.has_all(Alignment::COLUMN) {
        flexbox::process_flexbox(ctx, id, &children)?;
    } else {
        let (flow, positioned): (Vec<NodeId>, Vec<NodeId>) =
            children.iter().copied().partition(|c| ctx.node(*c).page_flow());
        for &child in &positioned {
            absolute::resolve_absolute(ctx, id, child)?;
        }
        if alignment.has_all(Alignment::COLUMN) {
            column::process_constraint_column(ctx, id, &flow)?;
        } else if alignment.is_row() {
            horizontal::process_constraint_horizontal(ctx, id, &flow);
        } else if let [single] = flow.as_slice() {
            anchor_single(ctx, id, *single);
        } else if !flow.is_empty() {
            chain::process_constraint_chain(ctx, id, &flow);
        }
    }
    for &child in &children {
        dimension::set_constraint_dimension(ctx, id, child);
    }
    evaluate::evaluate_anchors(ctx, id)?;
    Ok(())
}

/// Anchors a lone child to the closest parent edge on each axis.
fn anchor_single(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId) {
    let epsilon = ctx.epsilon();
    let content = *ctx.node(container).content_box();
    let bounds = *ctx.node(id).bounds();
    let fixed_height = ctx.node(container).has_height();
    if ctx.node(id).auto_margin().horizontal() {
        center_in_parent(ctx, container, id, Axis::Horizontal);
    } else if inset(&content, &bounds, Edge::Right) < inset(&content, &bounds, Edge::Left) - epsilon {
        pin_to_parent(ctx, container, id, Edge::Right);
    } else {
        pin_to_parent(ctx, container, id, Edge::Left);
    }
    if fixed_height && inset(&content, &bounds, Edge::Bottom) < inset(&content, &bounds, Edge::Top) - epsilon {
        pin_to_parent(ctx, container, id, Edge::Bottom);
    } else {
        pin_to_parent(ctx, container, id, Edge::Top);
    }
}
