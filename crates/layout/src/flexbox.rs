//! Flex containers rendered as constraint layouts.
//!
//! Each flex line becomes a chain along the main axis whose style follows
//! `justify-content`; growing items share the free space through chain
//! weights. Items are then aligned on the cross axis against the line they
//! sit in.

use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
use crate::attributes::AttributeKey;
use crate::constraint::absolute::resolve_absolute;
use crate::constraint::horizontal::find_text_baseline;
use crate::constraint::inset;
use crate::context::LayoutContext;
use crate::util::{calculate_bias, round_to, truncate};
use anchorage_style::{AlignItems, Dimension, JustifyContent};
use anchorage_types::{Axis, NodeId};
use itertools::Itertools;
use log::{debug, trace};

fn size_key(axis: Axis) -> AttributeKey {
    match axis {
        Axis::Horizontal => AttributeKey::LayoutWidth,
        Axis::Vertical => AttributeKey::LayoutHeight,
    }
}

/// Chain style and bias reproducing `justify-content` for a line.
fn justify_chain(justify: JustifyContent) -> (ChainStyle, f32) {
    match justify {
        JustifyContent::FlexStart => (ChainStyle::Packed, 0.0),
        JustifyContent::FlexEnd => (ChainStyle::Packed, 1.0),
        JustifyContent::Center => (ChainStyle::Packed, 0.5),
        JustifyContent::SpaceBetween => (ChainStyle::SpreadInside, 0.0),
        JustifyContent::SpaceAround | JustifyContent::SpaceEvenly => (ChainStyle::Spread, 0.5),
    }
}

/// Chain weights of the growing items of a line.
///
/// Items growing from a zero basis split the free space by `flex-grow`
/// alone. Once a basis or content size takes part, the measured sizes are
/// the result of that split, so weights follow the sizes relative to the
/// smallest grower.
pub fn adjust_grow_ratio(ctx: &LayoutContext<'_>, items: &[NodeId], axis: Axis) -> Vec<(NodeId, f32)> {
    let growers: Vec<NodeId> = items
        .iter()
        .copied()
        .filter(|&id| ctx.node(id).style().flex_grow > 0.0)
        .collect();
    let zero_basis = growers
        .iter()
        .all(|&id| matches!(ctx.node(id).style().flex_basis, Dimension::Px(v) | Dimension::Percent(v) if v == 0.0));
    let decimals = ctx.config.decimal_places;
    if zero_basis {
        return growers
            .into_iter()
            .map(|id| (id, ctx.node(id).style().flex_grow))
            .collect();
    }
    let size = |id: NodeId| ctx.node(id).bounds().size(axis);
    let smallest = growers
        .iter()
        .map(|&id| size(id))
        .fold(f32::INFINITY, f32::min);
    growers
        .into_iter()
        .map(|id| {
            let weight = if smallest > 0.0 { size(id) / smallest } else { ctx.node(id).style().flex_grow };
            (id, round_to(weight, decimals))
        })
        .collect()
}

/// Splits the ordered items into flex lines by their measured position: an
/// item starting before the end of the previous one on the main axis wrapped.
fn flex_lines(ctx: &LayoutContext<'_>, items: &[NodeId], axis: Axis, wraps: bool) -> Vec<Vec<NodeId>> {
    if !wraps {
        return vec![items.to_vec()];
    }
    let epsilon = ctx.epsilon();
    let (near, far) = axis.edges();
    let cross = axis.cross().edges().0;
    let mut lines: Vec<Vec<NodeId>> = Vec::new();
    for &item in items {
        let bounds = ctx.node(item).element.linear;
        let breaks = lines.last().and_then(|l| l.last()).is_some_and(|&previous| {
            let before = ctx.node(previous).element.linear;
            let main_back = bounds.edge(near) < before.edge(far) - epsilon;
            let cross_moved = (bounds.edge(cross) - before.edge(cross)).abs() > epsilon;
            main_back && cross_moved
        });
        match lines.last_mut() {
            Some(line) if !breaks => line.push(item),
            _ => lines.push(vec![item]),
        }
    }
    lines.sort_by(|a, b| {
        let top = |line: &Vec<NodeId>| ctx.node(line[0]).bounds().edge(cross);
        top(a).total_cmp(&top(b))
    });
    lines
}

/// Anchors the children of a flex container.
pub fn process_flexbox(ctx: &mut LayoutContext<'_>, container: NodeId, children: &[NodeId]) -> Result<(), LayoutError> {
    let style = ctx.node(container).style().clone();
    let (flow, positioned): (Vec<NodeId>, Vec<NodeId>) =
        children.iter().copied().partition(|c| ctx.node(*c).page_flow());
    for &child in &positioned {
        resolve_absolute(ctx, container, child)?;
    }
    let mut ordered: Vec<NodeId> = flow
        .into_iter()
        .sorted_by_key(|&id| ctx.node(id).style().order)
        .collect();
    if style.flex_direction.is_reverse() {
        ordered.reverse();
    }
    let axis = if style.flex_direction.is_row() { Axis::Horizontal } else { Axis::Vertical };
    let lines = flex_lines(ctx, &ordered, axis, style.flex_wrap.wraps());
    debug!(
        "Flex container {} has {} lines along the {} axis",
        container,
        lines.len(),
        axis.as_str()
    );

    let mut previous_line: Option<NodeId> = None;
    let single = lines.len() == 1;
    for line in &lines {
        build_main_chain(ctx, container, line, axis, style.justify_content);
        let extent = align_cross(ctx, container, line, axis, style.align_items, previous_line, single);
        previous_line = extent;
    }
    Ok(())
}

fn build_main_chain(
    ctx: &mut LayoutContext<'_>,
    container: NodeId,
    line: &[NodeId],
    axis: Axis,
    justify: JustifyContent,
) {
    let Some((&first, rest)) = line.split_first() else {
        return;
    };
    let (near, far) = axis.edges();
    let weights = adjust_grow_ratio(ctx, line, axis);
    let (mut chain_style, bias) = justify_chain(justify);
    if !weights.is_empty() {
        chain_style = ChainStyle::Spread;
    }
    let content = *ctx.node(container).content_box();
    let packed = chain_style == ChainStyle::Packed;

    ctx.anchor(first, AnchorPosition::aligned(near), AnchorTarget::Parent, true);
    if packed || !weights.is_empty() {
        let distance = inset(&content, ctx.node(first).bounds(), near);
        let leading = if weights.is_empty() && bias > 0.0 { ctx.node(first).element.margin.get(near) } else { distance };
        ctx.set_margin_to(first, near, leading);
    }
    let mut previous = first;
    for &item in rest {
        ctx.anchor(item, AnchorPosition::adjacent(near), AnchorTarget::Node(previous), true);
        ctx.anchor(previous, AnchorPosition::adjacent(far), AnchorTarget::Node(item), true);
        if packed || !weights.is_empty() {
            let gap = ctx.node(item).bounds().edge(near) - ctx.node(previous).bounds().edge(far);
            ctx.set_margin_to(item, near, gap);
            ctx.set_margin_to(previous, far, 0.0);
        }
        previous = item;
    }
    ctx.anchor(previous, AnchorPosition::aligned(far), AnchorTarget::Parent, true);
    if rest.is_empty() {
        ctx.anchor_bias(first, axis, bias, true);
    } else {
        ctx.anchor_style(first, axis, chain_style, bias, true);
    }
    for (id, weight) in weights {
        ctx.set_attr(id, size_key(axis), "0px", true);
        ctx.set_attr(id, AttributeKey::ChainWeight(axis), truncate(weight, ctx.config.decimal_places), true);
    }
    trace!("Flex line of {} items chained as {}", line.len(), chain_style.as_str());
}

/// Aligns every item of a line on the cross axis. Returns the item with the
/// furthest cross end, which the next line is placed after.
fn align_cross(
    ctx: &mut LayoutContext<'_>,
    container: NodeId,
    line: &[NodeId],
    axis: Axis,
    align_items: AlignItems,
    previous_line: Option<NodeId>,
    single: bool,
) -> Option<NodeId> {
    let cross = axis.cross();
    let (start, end) = cross.edges();
    let epsilon = ctx.epsilon();
    let extent = line.iter().copied().reduce(|best, id| {
        if ctx.node(id).bounds().edge(end) > ctx.node(best).bounds().edge(end) {
            id
        } else {
            best
        }
    })?;
    let baseline = if cross == Axis::Vertical { find_text_baseline(ctx, line) } else { None };
    let content = *ctx.node(container).content_box();

    // The line's extent is placed first; the other items align against it.
    let ordered: Vec<NodeId> = std::iter::once(extent)
        .chain(line.iter().copied().filter(|&id| id != extent))
        .collect();
    for item in ordered {
        let node = ctx.node(item);
        let align = node.style().align_self.resolve(align_items);
        let explicit = match cross {
            Axis::Horizontal => node.has_width(),
            Axis::Vertical => node.has_height(),
        };
        let bounds = *node.bounds();
        let on_baseline = node.has_baseline();
        let reference = if single || item == extent { None } else { Some(extent) };

        match (align, reference) {
            (AlignItems::Baseline, _) if on_baseline && baseline.is_some_and(|b| b != item) => {
                if let Some(target) = baseline {
                    ctx.anchor(item, AnchorPosition::Baseline, AnchorTarget::Node(target), true);
                }
            }
            (AlignItems::Center, None) if previous_line.is_none() => {
                let bias = calculate_bias(
                    inset(&content, &bounds, start).max(0.0),
                    inset(&content, &bounds, end).max(0.0),
                    ctx.config.decimal_places,
                );
                ctx.anchor_parent(item, cross, Some(bias), true);
                ctx.set_margin_to(item, start, 0.0);
                ctx.set_margin_to(item, end, 0.0);
            }
            (AlignItems::Center, Some(target)) => {
                ctx.anchor(item, AnchorPosition::aligned(start), AnchorTarget::Node(target), true);
                ctx.anchor(item, AnchorPosition::aligned(end), AnchorTarget::Node(target), true);
                ctx.set_margin_to(item, start, 0.0);
                ctx.set_margin_to(item, end, 0.0);
            }
            (AlignItems::FlexEnd, None) if previous_line.is_none() => {
                let distance = inset(&content, &bounds, end);
                ctx.anchor(item, AnchorPosition::aligned(end), AnchorTarget::Parent, true);
                ctx.set_margin_to(item, end, distance);
            }
            (AlignItems::FlexEnd, Some(target)) => {
                let distance = ctx.node(target).bounds().edge(end) - bounds.edge(end);
                ctx.anchor(item, AnchorPosition::aligned(end), AnchorTarget::Node(target), true);
                ctx.set_margin_to(item, end, distance);
            }
            (AlignItems::Stretch, _) if !explicit => {
                let full = match reference {
                    Some(target) => (ctx.node(target).bounds().size(cross) - bounds.size(cross)).abs() <= epsilon,
                    None => true,
                };
                match reference {
                    Some(target) if !full => {
                        ctx.anchor(item, AnchorPosition::aligned(start), AnchorTarget::Node(target), true);
                        ctx.anchor(item, AnchorPosition::aligned(end), AnchorTarget::Node(target), true);
                        ctx.set_margin_to(item, start, 0.0);
                        ctx.set_margin_to(item, end, 0.0);
                        ctx.set_attr(item, size_key(cross), "0px", true);
                    }
                    _ => {
                        line_start(ctx, container, item, cross, previous_line);
                        if previous_line.is_none() && single {
                            let distance = inset(&content, &bounds, end);
                            ctx.anchor(item, AnchorPosition::aligned(end), AnchorTarget::Parent, true);
                            ctx.set_margin_to(item, end, distance);
                            ctx.set_attr(item, size_key(cross), "0px", true);
                        }
                    }
                }
            }
            (_, Some(target)) => {
                let distance = bounds.edge(start) - ctx.node(target).bounds().edge(start);
                ctx.anchor(item, AnchorPosition::aligned(start), AnchorTarget::Node(target), true);
                ctx.set_margin_to(item, start, distance);
            }
            _ => line_start(ctx, container, item, cross, previous_line),
        }
    }
    Some(extent)
}

/// Places the cross start of an item at the start of its line: the parent
/// edge for the first line, the end of the previous line otherwise.
fn line_start(ctx: &mut LayoutContext<'_>, container: NodeId, item: NodeId, cross: Axis, previous_line: Option<NodeId>) {
    let (start, end) = cross.edges();
    let bounds = *ctx.node(item).bounds();
    match previous_line {
        None => {
            let distance = inset(ctx.node(container).content_box(), &bounds, start);
            ctx.anchor(item, AnchorPosition::aligned(start), AnchorTarget::Parent, true);
            ctx.set_margin_to(item, start, distance);
        }
        Some(target) => {
            let gap = bounds.edge(start) - ctx.node(target).bounds().edge(end);
            ctx.anchor(item, AnchorPosition::adjacent(start), AnchorTarget::Node(target), true);
            ctx.set_margin_to(item, start, gap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ConstraintRelation;
    use crate::node_kind::ContainerType;
    use crate::test_utils::{block, render_under, with_context, TreeBuilder};
    use anchorage_style::{Display, FlexWrap};

    #[test]
    fn justify_content_picks_the_chain_style() {
        assert_eq!(justify_chain(JustifyContent::SpaceBetween).0, ChainStyle::SpreadInside);
        assert_eq!(justify_chain(JustifyContent::Center), (ChainStyle::Packed, 0.5));
        assert_eq!(justify_chain(JustifyContent::SpaceEvenly).0, ChainStyle::Spread);
    }

    #[test]
    fn growing_items_share_the_line_by_weight() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let mut a = block(0.0, 0.0, 100.0, 40.0);
        a.style.flex_grow = 1.0;
        a.style.flex_basis = Dimension::Px(0.0);
        let mut b = block(100.0, 0.0, 300.0, 40.0);
        b.style.flex_grow = 3.0;
        b.style.flex_basis = Dimension::Px(0.0);
        let a = builder.child(root, a);
        let b = builder.child(root, b);
        let mut tree = builder.build();
        tree.node_mut(root).element.style.display = Display::Flex;
        with_context(tree, |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a, b]);
            process_flexbox(ctx, root, &[a, b]).unwrap();
            assert_eq!(ctx.attr(a, AttributeKey::ChainStyle(Axis::Horizontal)), Some("spread"));
            assert_eq!(ctx.attr(a, AttributeKey::ChainWeight(Axis::Horizontal)), Some("1"));
            assert_eq!(ctx.attr(b, AttributeKey::ChainWeight(Axis::Horizontal)), Some("3"));
            assert_eq!(ctx.attr(b, AttributeKey::LayoutWidth), Some("0px"));
            assert_eq!(
                ctx.attr(b, AttributeKey::Constraint(ConstraintRelation::RightToRightOf)),
                Some("parent")
            );
        });
    }

    #[test]
    fn content_sized_growers_follow_measured_sizes() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let mut a = block(0.0, 0.0, 150.0, 40.0);
        a.style.flex_grow = 1.0;
        let mut b = block(150.0, 0.0, 250.0, 40.0);
        b.style.flex_grow = 1.0;
        let a = builder.child(root, a);
        let b = builder.child(root, b);
        with_context(builder.build(), |ctx| {
            let weights = adjust_grow_ratio(ctx, &[a, b], Axis::Horizontal);
            assert_eq!(weights, vec![(a, 1.0), (b, round_to(250.0 / 150.0, 4))]);
        });
    }

    #[test]
    fn wrapped_items_start_a_new_line() {
        let mut builder = TreeBuilder::new(200.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, block(0.0, 0.0, 120.0, 30.0));
        let b = builder.child(root, block(0.0, 30.0, 120.0, 20.0));
        let mut tree = builder.build();
        tree.node_mut(root).element.style.display = Display::Flex;
        tree.node_mut(root).element.style.flex_wrap = FlexWrap::Wrap;
        tree.node_mut(root).element.style.align_items = AlignItems::FlexStart;
        with_context(tree, |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a, b]);
            assert_eq!(flex_lines(ctx, &[a, b], Axis::Horizontal, true), vec![vec![a], vec![b]]);
            process_flexbox(ctx, root, &[a, b]).unwrap();
            assert_eq!(
                ctx.attr(b, AttributeKey::Constraint(ConstraintRelation::TopToBottomOf)),
                Some("@id/view_1")
            );
            assert_eq!(
                ctx.attr(a, AttributeKey::Constraint(ConstraintRelation::TopToTopOf)),
                Some("parent")
            );
        });
    }

    #[test]
    fn centered_items_use_the_parent_bias() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, block(0.0, 30.0, 100.0, 40.0));
        let mut tree = builder.build();
        tree.node_mut(root).element.style.display = Display::Flex;
        tree.node_mut(root).element.style.align_items = AlignItems::Center;
        with_context(tree, |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a]);
            process_flexbox(ctx, root, &[a]).unwrap();
            assert_eq!(ctx.attr(a, AttributeKey::Bias(Axis::Vertical)), Some("0.5"));
            assert_eq!(ctx.attr(a, AttributeKey::Bias(Axis::Horizontal)), Some("0"));
        });
    }
}
