//! Anchoring of children inside relative containers.
//!
//! A relative container has no line wrapping of its own, so rows of inline
//! content are rebuilt here: items are linked with `toRightOf` inside a row and
//! every row is placed `below` the tallest item of the row before it.

use crate::anchor::{AnchorPosition, AnchorTarget};
use crate::constraint::{inset, pin_to_parent};
use crate::context::LayoutContext;
use crate::node::SyntheticKind;
use crate::util::within_range;
use anchorage_style::{Float, VerticalAlign};
use anchorage_types::{Axis, Edge, NodeId};
use log::{debug, trace};

/// Anchors the render children of a relative container.
pub fn process_relative(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let children: Vec<NodeId> = ctx
        .templates
        .child_nodes(id)
        .into_iter()
        .filter(|c| !ctx.node(*c).container_type().is_helper())
        .collect();
    if children.is_empty() {
        return;
    }
    let (flow, positioned): (Vec<NodeId>, Vec<NodeId>) =
        children.iter().copied().partition(|c| ctx.node(*c).page_flow());
    for &child in &positioned {
        resolve_positioned(ctx, id, child);
    }
    if ctx.node(id).view.alignment.is_row() {
        process_relative_horizontal(ctx, id, &flow);
    } else {
        process_relative_vertical(ctx, id, &flow);
    }
}

/// Out-of-flow children keep to the parent edges their offsets name.
fn resolve_positioned(ctx: &mut LayoutContext<'_>, container: NodeId, id: NodeId) {
    let style = ctx.node(id).style().clone();
    let (right, bottom) = (!style.right.is_auto(), !style.bottom.is_auto());
    let horizontal = if right && style.left.is_auto() { Edge::Right } else { Edge::Left };
    let vertical = if bottom && style.top.is_auto() { Edge::Bottom } else { Edge::Top };
    pin_to_parent(ctx, container, id, horizontal);
    pin_to_parent(ctx, container, id, vertical);
    ctx.view_mut(id).positioned = true;
}

/// Width available to a row: the content box minus floats of preceding
/// siblings that sit beside the container.
fn wrap_width(ctx: &LayoutContext<'_>, container: NodeId) -> f32 {
    let node = ctx.node(container);
    let bounds = *node.bounds();
    let beside: f32 = ctx
        .tree
        .previous_siblings(container)
        .into_iter()
        .map(|s| ctx.node(s))
        .filter(|s| s.floating() && s.element.linear.overlaps_vertically(&bounds))
        .filter(|s| s.element.linear.overlaps_horizontally(&bounds))
        .map(|s| s.element.linear.width)
        .sum();
    (node.content_box().width - beside).max(0.0)
}

/// Whether `item` opens a new row after the items of `row`.
fn starts_row(ctx: &LayoutContext<'_>, row: &[NodeId], item: NodeId, width: f32, indent: f32) -> bool {
    let epsilon = ctx.epsilon();
    let node = ctx.node(item);
    if node.synthetic == Some(SyntheticKind::Group) || node.element.line_break {
        return true;
    }
    if ctx
        .tree
        .previous_siblings(item)
        .last()
        .is_some_and(|&s| ctx.node(s).excluded() || ctx.node(s).block_statically())
    {
        return true;
    }
    let Some(&previous) = row.last() else {
        return false;
    };
    let row_bottom = row
        .iter()
        .map(|&r| ctx.node(r).element.linear.bottom)
        .fold(f32::MIN, f32::max);
    let previous_node = ctx.node(previous);
    if node.element.linear.top >= row_bottom - epsilon {
        return true;
    }
    // Text continuing on the last line of a wrapped item stays in its row.
    if previous_node.multiline() && node.element.linear.left < previous_node.element.linear.right {
        return false;
    }
    // A positive indent narrows the first line, a hanging one widens it.
    let used: f32 = row.iter().map(|&r| ctx.node(r).element.linear.width).sum();
    used + node.element.linear.width + indent > width + epsilon
}

/// Groups `items` into rows the way inline content wraps.
fn partition_rows(ctx: &LayoutContext<'_>, container: NodeId, items: &[NodeId]) -> Vec<Vec<NodeId>> {
    let width = wrap_width(ctx, container);
    let text_indent = ctx.node(container).style().text_indent;
    let mut rows: Vec<Vec<NodeId>> = Vec::new();
    for &item in items {
        let indent = if rows.len() <= 1 { text_indent } else { 0.0 };
        match rows.last_mut() {
            Some(row) if !starts_row(ctx, row, item, width, indent) => row.push(item),
            _ => rows.push(vec![item]),
        }
    }
    rows
}

/// The item a row is positioned by: the tallest on the baseline, preferring
/// items that do not float.
fn row_baseline(ctx: &LayoutContext<'_>, row: &[NodeId]) -> Option<NodeId> {
    let height = |id: NodeId| ctx.node(id).bounds().height;
    let candidates: Vec<NodeId> = row
        .iter()
        .copied()
        .filter(|&id| ctx.node(id).element.baseline.is_some())
        .collect();
    let flowing: Vec<NodeId> = candidates
        .iter()
        .copied()
        .filter(|&id| !ctx.node(id).floating())
        .collect();
    let pool = if flowing.is_empty() { candidates } else { flowing };
    pool.into_iter()
        .reduce(|best, id| if height(id) > height(best) { id } else { best })
}

fn tallest(ctx: &LayoutContext<'_>, row: &[NodeId]) -> Option<NodeId> {
    row.iter()
        .copied()
        .reduce(|best, id| {
            if ctx.node(id).bounds().bottom > ctx.node(best).bounds().bottom {
                id
            } else {
                best
            }
        })
}

/// An input whose line height differs from the row's is aligned by its bottom
/// edge, since its baseline does not match the text around it.
fn text_bottom(ctx: &LayoutContext<'_>, id: NodeId, representative: NodeId) -> bool {
    let node = ctx.node(id);
    if !node.is_input() {
        return false;
    }
    let own = node.style().resolved_line_height();
    let row = ctx.node(representative).style().resolved_line_height();
    !within_range(own, row, ctx.epsilon())
}

fn offset_top(ctx: &mut LayoutContext<'_>, id: NodeId, target: NodeId) {
    let distance = ctx.node(id).bounds().top - ctx.node(target).bounds().top;
    ctx.anchor(id, AnchorPosition::Top, AnchorTarget::Node(target), true);
    ctx.set_margin_to(id, Edge::Top, distance);
}

fn offset_bottom(ctx: &mut LayoutContext<'_>, id: NodeId, target: NodeId) {
    let distance = ctx.node(target).bounds().bottom - ctx.node(id).bounds().bottom;
    ctx.anchor(id, AnchorPosition::Bottom, AnchorTarget::Node(target), true);
    ctx.set_margin_to(id, Edge::Bottom, distance);
}

/// Rebuilds wrapped rows of inline content. Right floats are chained from
/// the right edge; everything else flows left to right.
pub fn process_relative_horizontal(ctx: &mut LayoutContext<'_>, container: NodeId, items: &[NodeId]) {
    let (right, left): (Vec<NodeId>, Vec<NodeId>) = items
        .iter()
        .copied()
        .partition(|&c| ctx.node(c).float() == Float::Right);
    let rows = partition_rows(ctx, container, &left);
    debug!("Relative container {} wraps into {} rows", container, rows.len());

    let mut above: Option<NodeId> = None;
    for row in &rows {
        let Some(&first) = row.first() else {
            continue;
        };
        pin_to_parent(ctx, container, first, Edge::Left);
        for pair in row.windows(2) {
            let (previous, item) = (pair[0], pair[1]);
            let gap = ctx.node(item).bounds().left - ctx.node(previous).bounds().right;
            ctx.anchor(item, AnchorPosition::LeftRight, AnchorTarget::Node(previous), true);
            ctx.set_margin_to(item, Edge::Left, gap);
        }

        let representative = row_baseline(ctx, row).or_else(|| tallest(ctx, row)).unwrap_or(first);
        match above {
            None => pin_to_parent(ctx, container, representative, Edge::Top),
            Some(target) => {
                let gap = ctx.node(representative).bounds().top - ctx.node(target).bounds().bottom;
                ctx.anchor(representative, AnchorPosition::TopBottom, AnchorTarget::Node(target), true);
                ctx.set_margin_to(representative, Edge::Top, gap);
            }
        }
        for &item in row.iter().filter(|&&i| i != representative) {
            let (align, on_baseline) = {
                let node = ctx.node(item);
                (node.style().vertical_align, node.has_baseline())
            };
            match align {
                VerticalAlign::Baseline if on_baseline && text_bottom(ctx, item, representative) => {
                    offset_bottom(ctx, item, representative)
                }
                VerticalAlign::Baseline if on_baseline => {
                    ctx.anchor(item, AnchorPosition::Baseline, AnchorTarget::Node(representative), true);
                }
                VerticalAlign::Bottom | VerticalAlign::TextBottom => offset_bottom(ctx, item, representative),
                VerticalAlign::Top | VerticalAlign::TextTop => offset_top(ctx, item, representative),
                // Shifted items keep their measured distance from the representative's top.
                VerticalAlign::Baseline
                | VerticalAlign::Middle
                | VerticalAlign::Sub
                | VerticalAlign::Super
                | VerticalAlign::Length(_) => offset_top(ctx, item, representative),
            }
        }
        above = tallest(ctx, row);
        trace!("Row of {} items led by {}", row.len(), representative);
    }

    let mut previous: Option<NodeId> = None;
    for &item in &right {
        match previous {
            None => pin_to_parent(ctx, container, item, Edge::Right),
            Some(target) => {
                let gap = ctx.node(target).bounds().left - ctx.node(item).bounds().right;
                ctx.anchor(item, AnchorPosition::RightLeft, AnchorTarget::Node(target), true);
                ctx.set_margin_to(item, Edge::Right, gap);
            }
        }
        pin_to_parent(ctx, container, item, Edge::Top);
        previous = Some(item);
    }
}

/// Stacks items top to bottom, each `below` the one before it.
pub fn process_relative_vertical(ctx: &mut LayoutContext<'_>, container: NodeId, items: &[NodeId]) {
    let mut previous: Option<NodeId> = None;
    for &item in items {
        match previous {
            None => pin_to_parent(ctx, container, item, Edge::Top),
            Some(target) => {
                let gap = ctx.node(item).bounds().top - ctx.node(target).bounds().bottom;
                ctx.anchor(item, AnchorPosition::TopBottom, AnchorTarget::Node(target), true);
                ctx.set_margin_to(item, Edge::Top, gap);
            }
        }
        let node = ctx.node(item);
        let auto = node.auto_margin();
        if auto.horizontal() {
            ctx.anchor_parent(item, Axis::Horizontal, None, true);
            let content = *ctx.node(container).content_box();
            let bounds = *ctx.node(item).bounds();
            let offset = inset(&content, &bounds, Edge::Left) - inset(&content, &bounds, Edge::Right);
            ctx.set_margin_to(item, Edge::Left, offset.max(0.0));
            ctx.set_margin_to(item, Edge::Right, (-offset).max(0.0));
        } else if node.float() == Float::Right || auto.left_only() {
            pin_to_parent(ctx, container, item, Edge::Right);
        } else {
            pin_to_parent(ctx, container, item, Edge::Left);
        }
        previous = Some(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeKey, RelativeRule};
    use crate::flags::Alignment;
    use crate::node_kind::ContainerType;
    use crate::test_utils::{block, floated, render_under, text, with_context, TreeBuilder};

    fn rule(ctx: &LayoutContext<'_>, id: NodeId, rule: RelativeRule) -> Option<String> {
        ctx.attr(id, AttributeKey::Relative(rule)).map(str::to_string)
    }

    #[test]
    fn inline_items_wrap_into_rows() {
        let mut builder = TreeBuilder::new(200.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, text("first", 0.0, 0.0, 120.0, 20.0));
        let b = builder.child(root, text("second", 120.0, 0.0, 60.0, 20.0));
        let c = builder.child(root, text("third", 0.0, 20.0, 90.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Relative, &[a, b, c]);
            ctx.view_mut(root).alignment = Alignment::HORIZONTAL;
            let rows = partition_rows(ctx, root, &[a, b, c]);
            assert_eq!(rows, vec![vec![a, b], vec![c]]);

            process_relative(ctx, root);
            assert_eq!(rule(ctx, a, RelativeRule::AlignParentLeft).as_deref(), Some("true"));
            assert_eq!(rule(ctx, b, RelativeRule::ToRightOf).as_deref(), Some("@id/view_1"));
            assert_eq!(rule(ctx, c, RelativeRule::Below).as_deref(), Some("@id/view_1"));
            assert_eq!(ctx.final_margin(c, Edge::Top), 0.0);
        });
    }

    #[test]
    fn hanging_indent_widens_the_first_row() {
        let mut builder = TreeBuilder::new(200.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, text("hanging", -40.0, 0.0, 150.0, 20.0));
        let b = builder.child(root, text("tail", 110.0, 0.0, 80.0, 20.0));
        let mut tree = builder.build();
        tree.node_mut(root).element.style.text_indent = -40.0;
        with_context(tree, |ctx| {
            assert_eq!(partition_rows(ctx, root, &[a, b]), vec![vec![a, b]]);
        });
    }

    #[test]
    fn positive_indent_narrows_the_first_row() {
        let mut builder = TreeBuilder::new(200.0, 100.0);
        let root = builder.root();
        let a = builder.child(root, text("indented", 40.0, 0.0, 100.0, 20.0));
        let b = builder.child(root, text("next", 130.0, 0.0, 80.0, 20.0));
        let mut tree = builder.build();
        tree.node_mut(root).element.style.text_indent = 40.0;
        with_context(tree, |ctx| {
            assert_eq!(partition_rows(ctx, root, &[a, b]), vec![vec![a], vec![b]]);
        });
    }

    #[test]
    fn top_aligned_items_keep_their_offset_from_the_representative() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let mut small = text("small", 0.0, 4.0, 50.0, 16.0);
        small.style.vertical_align = VerticalAlign::Top;
        let small = builder.child(root, small);
        let large = builder.child(root, text("large", 50.0, 0.0, 80.0, 32.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Relative, &[small, large]);
            ctx.view_mut(root).alignment = Alignment::HORIZONTAL;
            process_relative(ctx, root);
            assert_eq!(
                rule(ctx, small, RelativeRule::AlignTop),
                ctx.attr(large, AttributeKey::Id).map(|id| id.replace("@+id/", "@id/"))
            );
            assert_eq!(ctx.final_margin(small, Edge::Top), 4.0);
            assert!(rule(ctx, small, RelativeRule::AlignBaseline).is_none());
        });
    }

    #[test]
    fn baseline_items_align_to_the_row_representative() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let small = builder.child(root, text("small", 0.0, 8.0, 50.0, 16.0));
        let large = builder.child(root, text("large", 50.0, 0.0, 80.0, 32.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Relative, &[small, large]);
            ctx.view_mut(root).alignment = Alignment::HORIZONTAL;
            process_relative(ctx, root);
            assert_eq!(rule(ctx, large, RelativeRule::AlignParentTop).as_deref(), Some("true"));
            assert_eq!(
                rule(ctx, small, RelativeRule::AlignBaseline),
                ctx.attr(large, AttributeKey::Id).map(|id| id.replace("@+id/", "@id/"))
            );
        });
    }

    #[test]
    fn right_floats_chain_from_the_right_edge() {
        let mut builder = TreeBuilder::new(400.0, 100.0);
        let root = builder.root();
        let outer = builder.child(root, floated(Float::Right, 350.0, 0.0, 50.0, 20.0));
        let inner = builder.child(root, floated(Float::Right, 290.0, 0.0, 50.0, 20.0));
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Relative, &[outer, inner]);
            ctx.view_mut(root).alignment = Alignment::HORIZONTAL;
            process_relative(ctx, root);
            assert_eq!(rule(ctx, outer, RelativeRule::AlignParentRight).as_deref(), Some("true"));
            assert_eq!(rule(ctx, inner, RelativeRule::ToLeftOf).as_deref(), Some("@id/view_1"));
            assert_eq!(ctx.final_margin(inner, Edge::Right), 10.0);
        });
    }

    #[test]
    fn vertical_items_stack_below_each_other() {
        let mut builder = TreeBuilder::new(400.0, 200.0);
        let root = builder.root();
        let top = builder.child(root, block(0.0, 0.0, 400.0, 40.0));
        let mut centered = block(100.0, 50.0, 200.0, 40.0);
        centered.style.margin.left = anchorage_style::dimension::Dimension::Auto;
        centered.style.margin.right = anchorage_style::dimension::Dimension::Auto;
        let centered = builder.child(root, centered);
        with_context(builder.build(), |ctx| {
            render_under(ctx, root, ContainerType::Relative, &[top, centered]);
            ctx.view_mut(root).alignment = Alignment::VERTICAL;
            process_relative(ctx, root);
            assert_eq!(rule(ctx, centered, RelativeRule::Below).as_deref(), Some("@id/view_1"));
            assert_eq!(ctx.final_margin(centered, Edge::Top), 10.0);
            assert_eq!(rule(ctx, centered, RelativeRule::CenterHorizontal).as_deref(), Some("true"));
            assert_eq!(ctx.final_margin(centered, Edge::Left), 0.0);
        });
    }
}
