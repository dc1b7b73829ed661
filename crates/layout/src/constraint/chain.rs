//! Rows of floats and flow content held in horizontal chains, with the rows
//! stacked in a vertical chain.

use super::pin_to_parent;
use crate::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
use crate::context::LayoutContext;
use anchorage_style::{Clear, Float};
use anchorage_types::{Axis, Edge, NodeId};
use log::trace;

/// Positions used to build a horizontal chain: the edge it starts from, the
/// edge it ends at, the link of an item to its predecessor and the link back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorDirection {
    pub start: Edge,
    pub end: Edge,
    pub link: AnchorPosition,
    pub back: AnchorPosition,
}

pub fn get_anchor_direction(reverse: bool) -> AnchorDirection {
    if reverse {
        AnchorDirection {
            start: Edge::Right,
            end: Edge::Left,
            link: AnchorPosition::RightLeft,
            back: AnchorPosition::LeftRight,
        }
    } else {
        AnchorDirection {
            start: Edge::Left,
            end: Edge::Right,
            link: AnchorPosition::LeftRight,
            back: AnchorPosition::RightLeft,
        }
    }
}

fn row_bottom(ctx: &LayoutContext<'_>, row: &[NodeId]) -> f32 {
    row.iter()
        .map(|id| ctx.node(*id).bounds().bottom)
        .fold(f32::NEG_INFINITY, f32::max)
}

fn starts_row(ctx: &LayoutContext<'_>, row: &[NodeId], item: NodeId, epsilon: f32) -> bool {
    let node = ctx.node(item);
    let Some(previous) = row.last().map(|p| ctx.node(*p)) else {
        return true;
    };
    node.element.line_break
        || node.block_statically()
        || previous.block_statically()
        || node.style().clear != Clear::None
        || node.bounds().top >= row_bottom(ctx, row) - epsilon
}

/// Splits a row into the items chained from the left edge and those chained
/// from the right edge.
fn split_sides(ctx: &LayoutContext<'_>, row: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
    row.iter().copied().partition(|id| {
        let node = ctx.node(*id);
        !(node.float() == Float::Right || node.auto_margin().left_only())
    })
}

/// Chains `subset` from the parent edge. The right side runs in reverse, its
/// first item sitting against the right edge.
fn build_subset(ctx: &mut LayoutContext<'_>, container: NodeId, subset: &[NodeId], reverse: bool) {
    let Some((&head, rest)) = subset.split_first() else {
        return;
    };
    let direction = get_anchor_direction(reverse);
    pin_to_parent(ctx, container, head, direction.start);
    let mut previous = head;
    for &item in rest {
        let gap = if reverse {
            ctx.node(previous).bounds().left - ctx.node(item).bounds().right
        } else {
            ctx.node(item).bounds().left - ctx.node(previous).bounds().right
        };
        ctx.anchor(item, direction.link, AnchorTarget::Node(previous), true);
        ctx.anchor(previous, direction.back, AnchorTarget::Node(item), true);
        ctx.set_margin_to(item, direction.start, gap);
        ctx.set_margin_to(previous, direction.end, 0.0);
        previous = item;
    }
    ctx.anchor(previous, AnchorPosition::aligned(direction.end), AnchorTarget::Parent, true);
    let bias = if reverse { 1.0 } else { 0.0 };
    if rest.is_empty() {
        ctx.anchor_bias(head, Axis::Horizontal, bias, true);
    } else {
        let leftmost = if reverse { previous } else { head };
        ctx.anchor_style(leftmost, Axis::Horizontal, ChainStyle::Packed, bias, true);
    }
}

fn build_row(ctx: &mut LayoutContext<'_>, container: NodeId, row: &[NodeId]) {
    let (left, right) = split_sides(ctx, row);
    build_subset(ctx, container, &left, false);
    build_subset(ctx, container, &right, true);
}

/// Adds a float to an already chained row: the chain of its side is taken
/// apart and rebuilt with the float at its end.
fn fold_into_row(ctx: &mut LayoutContext<'_>, container: NodeId, row: &mut Vec<NodeId>, item: NodeId) {
    let reverse = ctx.node(item).float() == Float::Right;
    let (left, right) = split_sides(ctx, row);
    let side = if reverse { right } else { left };
    for &member in &side {
        ctx.anchor_clear(member, Some(Axis::Horizontal));
        ctx.delete_chain_style(member, Axis::Horizontal);
    }
    let mut side = side;
    side.push(item);
    build_subset(ctx, container, &side, reverse);
    row.push(item);
    trace!("Folded float {} into the row of {:?}", item, row.first());
}

/// Links each row below the bottom-most item of the row above. Rows that
/// follow each other without overlap form a packed vertical chain.
fn link_rows(ctx: &mut LayoutContext<'_>, container: NodeId, rows: &[Vec<NodeId>]) {
    let epsilon = ctx.epsilon();
    let mut above: Option<NodeId> = None;
    let mut head: Option<NodeId> = None;
    let mut tail: Option<NodeId> = None;
    for row in rows {
        let Some(bottom_most) = row.iter().copied().reduce(|best, id| {
            if ctx.node(id).bounds().bottom > ctx.node(best).bounds().bottom {
                id
            } else {
                best
            }
        }) else {
            continue;
        };
        let mut linked = false;
        for &item in row {
            match above {
                Some(previous) => {
                    let gap = ctx.node(item).bounds().top - ctx.node(previous).bounds().bottom;
                    if gap >= -epsilon {
                        ctx.anchor(item, AnchorPosition::TopBottom, AnchorTarget::Node(previous), true);
                        ctx.set_margin_to(item, Edge::Top, gap.max(0.0));
                        linked |= item == bottom_most;
                    } else {
                        pin_to_parent(ctx, container, item, Edge::Top);
                    }
                }
                None => pin_to_parent(ctx, container, item, Edge::Top),
            }
        }
        if let Some(previous) = above.filter(|_| linked) {
            ctx.anchor(previous, AnchorPosition::BottomTop, AnchorTarget::Node(bottom_most), true);
            ctx.set_margin_to(previous, Edge::Bottom, 0.0);
            head.get_or_insert(previous);
            tail = Some(bottom_most);
        }
        above = Some(bottom_most);
    }
    if let (Some(head), Some(tail)) = (head, tail) {
        ctx.anchor(tail, AnchorPosition::Bottom, AnchorTarget::Parent, true);
        ctx.anchor_style(head, Axis::Vertical, ChainStyle::Packed, 0.0, true);
    }
}

/// Splits the flow children into rows and chains them.
///
/// A float which still overlaps the row before a block row is folded into
/// that earlier row instead of opening a new one.
pub fn process_constraint_chain(ctx: &mut LayoutContext<'_>, container: NodeId, items: &[NodeId]) {
    let epsilon = ctx.epsilon();
    let mut rows: Vec<Vec<NodeId>> = Vec::new();
    for &item in items {
        if let Some(current) = rows.last() {
            if !starts_row(ctx, current, item, epsilon) {
                if let Some(current) = rows.last_mut() {
                    current.push(item);
                }
                continue;
            }
            let fold = rows.len() >= 2
                && ctx.node(item).floating()
                && ctx.node(current[0]).block_statically()
                && ctx.node(item).bounds().top < row_bottom(ctx, &rows[rows.len() - 2]) - epsilon;
            if fold {
                let index = rows.len() - 2;
                fold_into_row(ctx, container, &mut rows[index], item);
                continue;
            }
            build_row(ctx, container, current);
        }
        rows.push(vec![item]);
    }
    if let Some(last) = rows.last() {
        build_row(ctx, container, last);
    }
    trace!("Chained {} rows in {}", rows.len(), container);
    link_rows(ctx, container, &rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeKey, ConstraintRelation};
    use crate::node_kind::ContainerType;
    use crate::test_utils::{block, floated, inline, render_under, with_context, TreeBuilder};

    fn relation(ctx: &LayoutContext<'_>, id: NodeId, relation: ConstraintRelation) -> Option<String> {
        ctx.attr(id, AttributeKey::Constraint(relation)).map(str::to_string)
    }

    fn reference(ctx: &LayoutContext<'_>, id: NodeId) -> Option<String> {
        ctx.node(id).document_id().map(|d| format!("@id/{}", d))
    }

    #[test]
    fn direction_quadruples() {
        let forward = get_anchor_direction(false);
        assert_eq!(forward.start, Edge::Left);
        assert_eq!(forward.link, AnchorPosition::LeftRight);
        let reverse = get_anchor_direction(true);
        assert_eq!(reverse.end, Edge::Left);
        assert_eq!(reverse.back, AnchorPosition::LeftRight);
    }

    #[test]
    fn rows_form_a_vertical_chain() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, inline(0.0, 0.0, 100.0, 20.0));
        let b = builder.child(root, inline(110.0, 0.0, 100.0, 20.0));
        let mut c = inline(0.0, 30.0, 100.0, 20.0);
        c.line_break = true;
        let c = builder.child(root, c);
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a, b, c]);
            process_constraint_chain(ctx, root, &[a, b, c]);

            assert_eq!(relation(ctx, b, ConstraintRelation::LeftToRightOf), reference(ctx, a));
            assert_eq!(relation(ctx, a, ConstraintRelation::RightToLeftOf), reference(ctx, b));
            assert_eq!(ctx.final_margin(b, Edge::Left), 10.0);
            assert_eq!(relation(ctx, c, ConstraintRelation::TopToBottomOf), reference(ctx, a));
            assert_eq!(relation(ctx, a, ConstraintRelation::BottomToTopOf), reference(ctx, c));
            assert_eq!(ctx.final_margin(c, Edge::Top), 10.0);
            assert_eq!(relation(ctx, c, ConstraintRelation::BottomToBottomOf).as_deref(), Some("parent"));
            assert_eq!(ctx.attr(a, AttributeKey::ChainStyle(Axis::Vertical)), Some("packed"));
            assert_eq!(ctx.attr(a, AttributeKey::ChainStyle(Axis::Horizontal)), Some("packed"));
        });
    }

    #[test]
    fn right_floats_chain_from_the_right_edge() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, inline(0.0, 0.0, 100.0, 20.0));
        let r1 = builder.child(root, floated(Float::Right, 340.0, 0.0, 60.0, 20.0));
        let r2 = builder.child(root, floated(Float::Right, 270.0, 0.0, 60.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a, r1, r2]);
            process_constraint_chain(ctx, root, &[a, r1, r2]);
            assert_eq!(relation(ctx, r1, ConstraintRelation::RightToRightOf).as_deref(), Some("parent"));
            assert_eq!(relation(ctx, r2, ConstraintRelation::RightToLeftOf), reference(ctx, r1));
            assert_eq!(ctx.final_margin(r2, Edge::Right), 10.0);
            assert_eq!(ctx.attr(r2, AttributeKey::Bias(Axis::Horizontal)), Some("1"));
            assert_eq!(ctx.attr(a, AttributeKey::Bias(Axis::Horizontal)), Some("0"));
        });
    }

    #[test]
    fn late_float_folds_into_the_earlier_row() {
        let mut builder = TreeBuilder::new(400.0, 200.0);
        let root = builder.root();
        let a = builder.child(root, floated(Float::Left, 0.0, 0.0, 100.0, 100.0));
        let b = builder.child(root, block(0.0, 0.0, 400.0, 40.0));
        let c = builder.child(root, floated(Float::Left, 100.0, 40.0, 100.0, 50.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &[a, b, c]);
            process_constraint_chain(ctx, root, &[a, b, c]);
            assert_eq!(relation(ctx, c, ConstraintRelation::LeftToRightOf), reference(ctx, a));
            assert_eq!(relation(ctx, a, ConstraintRelation::RightToLeftOf), reference(ctx, c));
            assert!(relation(ctx, a, ConstraintRelation::RightToRightOf).is_none());
            assert_eq!(relation(ctx, c, ConstraintRelation::RightToRightOf).as_deref(), Some("parent"));
            assert_eq!(ctx.attr(a, AttributeKey::ChainStyle(Axis::Horizontal)), Some("packed"));
            assert_eq!(ctx.final_margin(c, Edge::Top), 40.0);
            assert_eq!(relation(ctx, b, ConstraintRelation::TopToTopOf).as_deref(), Some("parent"));
        });
    }
}
