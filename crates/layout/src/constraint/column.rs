//! Multi-column containers.
//!
//! Consecutive children between `column-span: all` elements form a column
//! row. Each row is balanced into columns of equal width which are held side
//! by side in a spread-inside chain of the column heads.

use crate::LayoutError;
use crate::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use crate::util::{split_runs, truncate};
use anchorage_style::{ColumnSpan, ComputedStyle};
use anchorage_traits::{FlowContent, FlowItem};
use anchorage_types::{Axis, Edge, NodeId};
use log::debug;

fn spans(ctx: &LayoutContext<'_>, id: NodeId) -> bool {
    ctx.node(id).style().column_span == ColumnSpan::All
}

/// Number of columns for a row of `len` children.
pub fn column_count(style: &ComputedStyle, width: f32, len: usize) -> usize {
    let by_width = style
        .column_width
        .filter(|w| *w > 0.0)
        .map(|w| (width / w).floor().max(1.0) as usize);
    let by_count = style.column_count.map(|c| c.max(1) as usize);
    let count = match (by_count, by_width) {
        (Some(count), Some(fit)) => count.min(fit),
        (Some(count), None) => count,
        (None, Some(fit)) => fit,
        (None, None) => 1,
    };
    count.clamp(1, len.max(1))
}

/// Splits a row into `count` columns of roughly equal measured height.
///
/// An item moves to the next column when half of it would pass the target
/// height. Every closed column sets a new target from what is left, so that
/// early columns running long do not starve the last ones.
pub fn distribute_columns(
    ctx: &LayoutContext<'_>,
    row: &[NodeId],
    count: usize,
    width: f32,
) -> Result<Vec<Vec<NodeId>>, LayoutError> {
    let content = FlowContent {
        width,
        items: row
            .iter()
            .map(|id| {
                let node = ctx.node(*id);
                FlowItem {
                    height: node.bounds().height,
                    margin_top: node.element.margin.top,
                    margin_bottom: node.element.margin.bottom,
                    synthetic: node.is_synthetic(),
                }
            })
            .collect(),
    };
    let total = ctx.measure.measure_flow_height(&content)?;
    let mut columns: Vec<Vec<NodeId>> = vec![Vec::new()];
    let mut target = total / count as f32;
    let mut consumed = 0.0;
    let mut running = 0.0;
    for (index, &item) in row.iter().enumerate() {
        let height = ctx.node(item).linear().height;
        let remaining_items = row.len() - index;
        let remaining_columns = count - columns.len();
        let current_filled = columns.last().is_some_and(|c| !c.is_empty());
        if current_filled
            && remaining_columns > 0
            && (remaining_items <= remaining_columns || running + height / 2.0 > target)
        {
            consumed += running;
            target = (total - consumed) / remaining_columns as f32;
            columns.push(Vec::new());
            running = 0.0;
        }
        if let Some(column) = columns.last_mut() {
            column.push(item);
        }
        running += height;
    }
    Ok(columns)
}

/// A heading left at the bottom of a column moves to the top of the next one.
pub fn promote_headings(ctx: &LayoutContext<'_>, columns: &mut [Vec<NodeId>]) {
    for index in 0..columns.len().saturating_sub(1) {
        let stranded = columns[index].len() > 1
            && columns[index].last().is_some_and(|id| ctx.node(*id).is_heading());
        if stranded && let Some(heading) = columns[index].pop() {
            columns[index + 1].insert(0, heading);
        }
    }
}

fn collapsed_gap(ctx: &LayoutContext<'_>, above: NodeId, below: NodeId) -> f32 {
    ctx.node(above)
        .element
        .margin
        .bottom
        .max(ctx.node(below).element.margin.top)
}

fn link_below(ctx: &mut LayoutContext<'_>, item: NodeId, above: Option<NodeId>) {
    match above {
        Some(above) => {
            let gap = collapsed_gap(ctx, above, item);
            ctx.anchor(item, AnchorPosition::TopBottom, AnchorTarget::Node(above), true);
            ctx.set_margin_to(item, Edge::Top, gap);
            ctx.set_margin_to(above, Edge::Bottom, 0.0);
        }
        None => {
            let margin = ctx.node(item).element.margin.top;
            ctx.anchor(item, AnchorPosition::Top, AnchorTarget::Parent, true);
            ctx.set_margin_to(item, Edge::Top, margin);
        }
    }
}

fn place_spanning(ctx: &mut LayoutContext<'_>, container: NodeId, item: NodeId) {
    let content = *ctx.node(container).content_box();
    let bounds = *ctx.node(item).bounds();
    ctx.anchor(item, AnchorPosition::Left, AnchorTarget::Parent, true);
    ctx.anchor(item, AnchorPosition::Right, AnchorTarget::Parent, true);
    ctx.set_margin_to(item, Edge::Left, super::inset(&content, &bounds, Edge::Left));
    ctx.set_margin_to(item, Edge::Right, super::inset(&content, &bounds, Edge::Right));
    if !ctx.node(item).has_width() {
        ctx.set_attr(item, AttributeKey::LayoutWidth, "0px", true);
    }
}

fn place_columns(ctx: &mut LayoutContext<'_>, columns: &[Vec<NodeId>], gap: f32, width: f32, above: Option<NodeId>) {
    let count = columns.len();
    let extra = columns
        .iter()
        .flatten()
        .map(|id| ctx.node(*id).element.margin.horizontal())
        .fold(0.0, f32::max);
    let spacing = gap + extra;
    let percent = if width > 0.0 {
        ((width - spacing * (count - 1) as f32) / count as f32 / width).max(0.0)
    } else {
        1.0 / count as f32
    };
    let percent = truncate(percent, ctx.config.decimal_places);
    let heads: Vec<NodeId> = columns.iter().filter_map(|c| c.first().copied()).collect();

    for (index, column) in columns.iter().enumerate() {
        let Some(&head) = column.first() else {
            continue;
        };
        match index.checked_sub(1).map(|i| heads[i]) {
            Some(previous) => {
                ctx.anchor(head, AnchorPosition::LeftRight, AnchorTarget::Node(previous), true);
            }
            None => {
                ctx.anchor(head, AnchorPosition::Left, AnchorTarget::Parent, true);
            }
        }
        match heads.get(index + 1) {
            Some(&next) => {
                ctx.anchor(head, AnchorPosition::RightLeft, AnchorTarget::Node(next), true);
            }
            None => {
                ctx.anchor(head, AnchorPosition::Right, AnchorTarget::Parent, true);
            }
        }
        link_below(ctx, head, above);
        let mut previous = head;
        for &item in &column[1..] {
            ctx.anchor(item, AnchorPosition::Left, AnchorTarget::Node(head), true);
            ctx.anchor(item, AnchorPosition::Right, AnchorTarget::Node(head), true);
            link_below(ctx, item, Some(previous));
            previous = item;
        }
        for &item in column {
            ctx.set_margin_to(item, Edge::Left, 0.0);
            ctx.set_margin_to(item, Edge::Right, 0.0);
            ctx.set_attr(item, AttributeKey::LayoutWidth, "0px", true);
            ctx.set_attr(item, AttributeKey::DimensionPercent(Axis::Horizontal), percent.clone(), true);
        }
    }
    if heads.len() > 1 {
        ctx.set_attr(
            heads[0],
            AttributeKey::ChainStyle(Axis::Horizontal),
            ChainStyle::SpreadInside.as_str(),
            true,
        );
    }
}

/// The last item of the tallest column.
fn row_bottom(ctx: &LayoutContext<'_>, columns: &[Vec<NodeId>]) -> Option<NodeId> {
    let height = |column: &Vec<NodeId>| -> f32 { column.iter().map(|id| ctx.node(*id).linear().height).sum() };
    columns
        .iter()
        .filter(|c| !c.is_empty())
        .reduce(|best, column| if height(column) > height(best) { column } else { best })
        .and_then(|column| column.last().copied())
}

pub fn process_constraint_column(
    ctx: &mut LayoutContext<'_>,
    container: NodeId,
    items: &[NodeId],
) -> Result<(), LayoutError> {
    let style = ctx.node(container).style().clone();
    let width = ctx.node(container).content_box().width;
    let gap = style.column_gap.unwrap_or(ctx.config.default_column_gap);
    let runs = split_runs(items, |run, item| {
        spans(ctx, item) || run.last().is_some_and(|last| spans(ctx, *last))
    });
    let mut above: Option<NodeId> = None;
    for run in runs {
        if let [single] = run.as_slice()
            && spans(ctx, *single)
        {
            place_spanning(ctx, container, *single);
            link_below(ctx, *single, above);
            above = Some(*single);
            continue;
        }
        let count = column_count(&style, width, run.len());
        let mut columns = distribute_columns(ctx, &run, count, width / count as f32)?;
        promote_headings(ctx, &mut columns);
        debug!(
            "Balanced {} children of {} into {} columns",
            run.len(),
            container,
            columns.len()
        );
        place_columns(ctx, &columns, gap, width, above);
        above = row_bottom(ctx, &columns).or(above);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ConstraintRelation;
    use crate::node_kind::ContainerType;
    use crate::test_utils::{block, render_under, with_context, TreeBuilder};

    fn reference(ctx: &LayoutContext<'_>, id: NodeId) -> Option<String> {
        ctx.node(id).document_id().map(|d| format!("@id/{}", d))
    }

    fn four_blocks(heading: bool) -> (crate::tree::NodeTree, NodeId, Vec<NodeId>) {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut ids = Vec::new();
        for i in 0..4 {
            let mut element = block(0.0, i as f32 * 50.0, 200.0, 50.0);
            if heading && i == 1 {
                element.tag = "H2".into();
            }
            ids.push(builder.child(root, element));
        }
        let mut tree = builder.build();
        tree.node_mut(root).element.style.column_count = Some(2);
        (tree, root, ids)
    }

    #[test]
    fn count_is_limited_by_width_and_children() {
        let style = ComputedStyle {
            column_count: Some(4),
            column_width: Some(150.0),
            ..Default::default()
        };
        assert_eq!(column_count(&style, 400.0, 10), 2);
        assert_eq!(column_count(&style, 800.0, 3), 3);
    }

    #[test]
    fn items_are_balanced_by_height() {
        let (tree, _, ids) = four_blocks(false);
        with_context(tree, |ctx| {
            let columns = distribute_columns(ctx, &ids, 2, 200.0).unwrap();
            assert_eq!(columns, vec![vec![ids[0], ids[1]], vec![ids[2], ids[3]]]);
        });
    }

    #[test]
    fn trailing_heading_moves_to_next_column() {
        let (tree, _, ids) = four_blocks(true);
        with_context(tree, |ctx| {
            let mut columns = distribute_columns(ctx, &ids, 2, 200.0).unwrap();
            promote_headings(ctx, &mut columns);
            assert_eq!(columns, vec![vec![ids[0]], vec![ids[1], ids[2], ids[3]]]);
        });
    }

    #[test]
    fn columns_share_the_width() {
        let (tree, root, ids) = four_blocks(false);
        with_context(tree, |ctx| {
            render_under(ctx, root, ContainerType::Constraint, &ids);
            process_constraint_column(ctx, root, &ids).unwrap();
            let (a, b, c) = (ids[0], ids[1], ids[2]);
            assert_eq!(ctx.attr(a, AttributeKey::ChainStyle(Axis::Horizontal)), Some("spread_inside"));
            assert_eq!(ctx.attr(a, AttributeKey::DimensionPercent(Axis::Horizontal)), Some("0.48"));
            assert_eq!(ctx.attr(a, AttributeKey::LayoutWidth), Some("0px"));
            assert_eq!(
                ctx.attr(c, AttributeKey::Constraint(ConstraintRelation::LeftToRightOf)).map(str::to_string),
                reference(ctx, a)
            );
            assert_eq!(
                ctx.attr(c, AttributeKey::Constraint(ConstraintRelation::RightToRightOf)),
                Some("parent")
            );
            assert_eq!(
                ctx.attr(b, AttributeKey::Constraint(ConstraintRelation::TopToBottomOf)).map(str::to_string),
                reference(ctx, a)
            );
            assert_eq!(
                ctx.attr(b, AttributeKey::Constraint(ConstraintRelation::LeftToLeftOf)).map(str::to_string),
                reference(ctx, a)
            );
        });
    }
}
