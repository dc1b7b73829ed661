//! Chooses the native container for a parent and its flowing children.
//!
//! Classification only reads the tree. Topology changes it wants are returned
//! as [`StructuralEdit`]s for the controller to apply.

use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::edit::StructuralEdit;
use crate::flags::Alignment;
use crate::layout::Layout;
use crate::node_kind::ContainerType;
use crate::tree::NodeTree;
use anchorage_style::{AlignItems, Float, VerticalAlign};
use anchorage_types::NodeId;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutcome {
    pub layout: Layout,
    /// The node itself is not rendered; traversal moves on.
    pub next: bool,
    /// Render this node in place of the classified one.
    pub render_as: Option<NodeId>,
    pub edits: Vec<StructuralEdit>,
}

impl ClassifyOutcome {
    fn typed(layout: Layout) -> Self {
        Self {
            layout,
            next: false,
            render_as: None,
            edits: Vec::new(),
        }
    }
}

/// Classifies a parent with at least one flowing child.
pub fn classify_unknown_parent(
    tree: &NodeTree,
    config: &LayoutConfig,
    mut layout: Layout,
) -> Result<ClassifyOutcome, LayoutError> {
    if layout.is_empty() {
        return Err(LayoutError::EmptyLayout);
    }
    let epsilon = config.relative_epsilon;
    let node = tree.node(layout.node);
    let style = node.style();
    let children: Vec<_> = layout.children.iter().map(|c| tree.node(*c)).collect();

    if style.is_multi_column() {
        layout.set_type(ContainerType::Constraint, Alignment::COLUMN | Alignment::AUTO_LAYOUT)?;
    } else if style.display.is_flex() {
        layout.set_type(ContainerType::Constraint, Alignment::AUTO_LAYOUT)?;
    } else if style.display.is_grid() && style.grid_column_count().is_some() {
        layout.set_type(ContainerType::Grid, Alignment::empty())?;
    } else if children.iter().any(|c| !c.page_flow()) {
        layout.set_type(ContainerType::Constraint, Alignment::ABSOLUTE | Alignment::UNKNOWN)?;
    } else if layout.len() == 1 {
        return classify_single_child(tree, config, layout);
    } else if children.iter().skip(1).all(|c| c.element.line_break) {
        let container = if children.iter().any(|c| c.position_relative()) {
            ContainerType::Relative
        } else {
            ContainerType::Linear
        };
        layout.set_type(container, Alignment::VERTICAL)?;
    } else if check_constraint_float(tree, &layout, true) {
        layout.set_type(ContainerType::Constraint, Alignment::FLOAT)?;
    } else if layout.linear_x(tree, epsilon) {
        if check_frame_horizontal(tree, &layout) {
            layout.set_type(ContainerType::Frame, Alignment::FLOAT)?;
        } else if check_constraint_horizontal(tree, &layout, epsilon) {
            layout.set_type(ContainerType::Constraint, Alignment::empty())?;
        } else if check_relative_horizontal(tree, &layout) {
            layout.set_type(ContainerType::Relative, Alignment::empty())?;
        } else {
            layout.set_type(ContainerType::Linear, Alignment::empty())?;
            if layout.floated.contains(&Float::Right) {
                sort_floats(tree, &mut layout.children);
            }
        }
        layout.add_align(Alignment::HORIZONTAL);
    } else if layout.linear_y(tree, epsilon) {
        let container = if children.iter().any(|c| c.position_relative()) {
            ContainerType::Relative
        } else {
            ContainerType::Linear
        };
        layout.set_type(container, Alignment::VERTICAL)?;
    } else if children.iter().all(|c| c.inline_flow() || c.floating()) {
        if !layout.floated.is_empty() && check_frame_horizontal(tree, &layout) {
            layout.set_type(ContainerType::Frame, Alignment::FLOAT | Alignment::HORIZONTAL)?;
        } else {
            layout.set_type(ContainerType::Relative, Alignment::HORIZONTAL | Alignment::UNKNOWN)?;
        }
    } else if (1..layout.len()).any(|i| layout.aligned_vertically(tree, i, epsilon)) {
        layout.set_type(ContainerType::Linear, Alignment::VERTICAL | Alignment::UNKNOWN)?;
    } else {
        layout.set_type(ContainerType::Constraint, Alignment::UNKNOWN)?;
    }

    debug!(
        "Classified {} ({} children) as {} {:?}",
        layout.node,
        layout.len(),
        layout.container_type.as_str(),
        layout.alignment
    );
    Ok(ClassifyOutcome::typed(layout))
}

fn classify_single_child(
    tree: &NodeTree,
    config: &LayoutConfig,
    mut layout: Layout,
) -> Result<ClassifyOutcome, LayoutError> {
    let node = tree.node(layout.node);
    let child = tree.node(layout.children[0]);

    if let Some(grandparent) = node.parent.filter(|_| tree.is_targeted(layout.node)) {
        debug!("{} is a data-target, rendering {} in its place", node.id, child.id);
        return Ok(replace_with_child(layout, grandparent, child.id));
    }
    if child.is_plain_text() {
        let edits = vec![StructuralEdit::ConsumeText {
            node: node.id,
            from: child.id,
        }];
        layout.set_type(ContainerType::Text, Alignment::empty())?;
        return Ok(ClassifyOutcome {
            edits,
            ..ClassifyOutcome::typed(layout)
        });
    }
    if config.collapse_unattributed_elements
        && layout.parent.is_some()
        && !node.is_synthetic()
        && !node.has_visual_attributes()
        && let Some(grandparent) = node.parent
    {
        debug!("Collapsing unattributed {} into {}", node.id, child.id);
        return Ok(replace_with_child(layout, grandparent, child.id));
    }

    let baseline_text = layout.parent.is_some_and(|p| {
        let parent = tree.node(p);
        parent.style().display.is_flex()
            && parent.style().align_items == AlignItems::Baseline
            && child.text_content().is_some()
    });
    if node.auto_margin().horizontal() || child.auto_margin().horizontal() || baseline_text {
        layout.set_type(ContainerType::Linear, Alignment::HORIZONTAL | Alignment::SINGLE)?;
    } else {
        layout.set_type(ContainerType::Frame, Alignment::SINGLE)?;
    }
    Ok(ClassifyOutcome::typed(layout))
}

fn replace_with_child(layout: Layout, grandparent: NodeId, child: NodeId) -> ClassifyOutcome {
    let parent = layout.node;
    ClassifyOutcome {
        layout,
        next: true,
        render_as: Some(child),
        edits: vec![
            StructuralEdit::Hide(parent),
            StructuralEdit::Reparent {
                node: child,
                parent: grandparent,
                replacing: Some(parent),
            },
            StructuralEdit::Wrap {
                outer: parent,
                inner: child,
            },
        ],
    }
}

/// Classifies a node without flowing children as a widget.
pub fn classify_unknown_child(tree: &NodeTree, mut layout: Layout) -> Result<ClassifyOutcome, LayoutError> {
    let node = tree.node(layout.node);
    if node.tag() == "INPUT" && node.input_type() == "hidden" {
        return Ok(ClassifyOutcome {
            next: true,
            edits: vec![StructuralEdit::Hide(node.id)],
            ..ClassifyOutcome::typed(layout)
        });
    }
    let container = match node.tag() {
        _ if node.is_image() => ContainerType::Image,
        "INPUT" => match node.input_type().as_str() {
            "checkbox" => ContainerType::Checkbox,
            "radio" => ContainerType::Radio,
            "range" => ContainerType::Range,
            "submit" | "reset" | "button" => ContainerType::Button,
            _ => ContainerType::Edit,
        },
        "TEXTAREA" => ContainerType::Edit,
        "SELECT" => ContainerType::Select,
        "BUTTON" => ContainerType::Button,
        "HR" => ContainerType::Line,
        _ if node.text_content().is_some() => ContainerType::Text,
        _ if node.style().has_visual_contribution() || node.has_width() || node.has_height() => {
            ContainerType::Block
        }
        _ => ContainerType::Space,
    };
    if container == ContainerType::Space && node.is_plain_text() {
        return Ok(ClassifyOutcome {
            next: true,
            edits: vec![StructuralEdit::Hide(node.id)],
            ..ClassifyOutcome::typed(layout)
        });
    }
    layout.set_type(container, Alignment::empty())?;
    Ok(ClassifyOutcome::typed(layout))
}

/// Rows which mix floats with flow content, or float to both sides, that
/// anchored containers cannot express.
pub fn check_frame_horizontal(tree: &NodeTree, layout: &Layout) -> bool {
    if layout.floated.len() == 2 || !layout.cleared.is_empty() {
        return true;
    }
    let children: Vec<_> = layout.children.iter().map(|c| tree.node(*c)).collect();
    if children.iter().any(|c| c.page_flow() && c.auto_margin().any_horizontal()) {
        return true;
    }
    let flow: Vec<_> = children.iter().filter(|c| !c.floating()).collect();
    if flow.is_empty() {
        return false;
    }
    if layout.floated.contains(&Float::Right) {
        return true;
    }
    let min_flow = flow.iter().map(|c| c.sibling_index).min().unwrap_or(usize::MAX);
    children
        .iter()
        .any(|c| c.float() == Float::Left && c.sibling_index < min_flow)
}

/// Every child is floated (or pushed by an auto margin) on the positive
/// axis, or every child has a percentage width.
pub fn check_constraint_float(tree: &NodeTree, layout: &Layout, horizontal: bool) -> bool {
    let mut floating = true;
    let mut percent = true;
    for &id in &layout.children {
        let child = tree.node(id);
        let pushed = child.floating() || (horizontal && child.auto_margin().any_horizontal());
        if !((pushed && child.positive_axis()) || layout.cleared.contains_key(&id)) {
            floating = false;
        }
        if !child.percent_width() {
            percent = false;
        }
        if !floating && !percent {
            return false;
        }
    }
    true
}

/// A single aligned row which needs bias or vertical placement.
pub fn check_constraint_horizontal(tree: &NodeTree, layout: &Layout, epsilon: f32) -> bool {
    let node = tree.node(layout.node);
    let children: Vec<_> = layout.children.iter().map(|c| tree.node(*c)).collect();
    let offset = node.style().text_align.is_offset();
    let vertical = !node.has_height()
        && children.iter().any(|c| {
            matches!(
                c.style().vertical_align,
                VerticalAlign::Middle | VerticalAlign::Bottom
            )
        });
    (offset || vertical)
        && layout.single_row_aligned(tree, epsilon)
        && children.iter().all(|c| c.positive_axis())
}

pub fn check_relative_horizontal(tree: &NodeTree, layout: &Layout) -> bool {
    if layout.floated.len() == 2 {
        return false;
    }
    let children: Vec<_> = layout.children.iter().map(|c| tree.node(*c)).collect();
    if children
        .iter()
        .all(|c| c.is_image() && !c.position_relative() && c.has_baseline())
    {
        return false;
    }
    children.iter().any(|c| {
        c.position_relative()
            || c.is_plain_text()
            || c.element.text.is_some()
            || c.is_image()
            || !c.has_baseline()
    })
}

/// Right floats move to the end of a row, nearest the edge last.
fn sort_floats(tree: &NodeTree, children: &mut Vec<NodeId>) {
    let (right, mut rest): (Vec<NodeId>, Vec<NodeId>) = children
        .iter()
        .partition(|c| tree.node(**c).float() == Float::Right);
    rest.extend(right.into_iter().rev());
    *children = rest;
}

/// Splits a float frame into a left float group, a flow group and a right
/// float group. Partitions with one item stay as they are.
pub fn group_float_horizontal(tree: &NodeTree, layout: &Layout) -> Vec<StructuralEdit> {
    let mut left = Vec::new();
    let mut flow = Vec::new();
    let mut right = Vec::new();
    for &id in &layout.children {
        match tree.node(id).float() {
            Float::Left => left.push(id),
            Float::Right => right.push(id),
            Float::None => flow.push(id),
        }
    }
    let partitions = [
        (left, Alignment::HORIZONTAL | Alignment::FLOAT),
        (flow, Alignment::empty()),
        (right, Alignment::HORIZONTAL | Alignment::FLOAT | Alignment::RIGHT),
    ];
    partitions
        .into_iter()
        .filter(|(ids, _)| ids.len() > 1 && ids.len() < layout.len())
        .map(|(children, alignment)| StructuralEdit::InsertGroup {
            parent: layout.node,
            children,
            alignment,
        })
        .collect()
}

/// Groups each line of a vertical layout that holds several items.
pub fn group_traverse_vertical(tree: &NodeTree, layout: &Layout, epsilon: f32) -> Vec<StructuralEdit> {
    let rows = partition_lines(tree, &layout.children, epsilon);
    if rows.len() <= 1 {
        return Vec::new();
    }
    rows.into_iter()
        .filter(|row| row.len() > 1)
        .map(|children| StructuralEdit::InsertGroup {
            parent: layout.node,
            children,
            alignment: Alignment::HORIZONTAL,
        })
        .collect()
}

/// Splits children into visual lines. Block boxes and forced breaks start a
/// new line, as does an item below everything on the current line.
pub fn partition_lines(tree: &NodeTree, children: &[NodeId], epsilon: f32) -> Vec<Vec<NodeId>> {
    let mut rows: Vec<Vec<NodeId>> = Vec::new();
    let mut bottom = f32::MIN;
    for &id in children {
        let node = tree.node(id);
        let starts_row = match rows.last() {
            None => true,
            Some(row) => {
                let previous = tree.node(row[row.len() - 1]);
                node.element.line_break
                    || node.block_statically()
                    || previous.block_statically()
                    || node.bounds().top >= bottom - epsilon
            }
        };
        if starts_row {
            rows.push(vec![id]);
            bottom = node.bounds().bottom;
        } else if let Some(row) = rows.last_mut() {
            row.push(id);
            bottom = bottom.max(node.bounds().bottom);
        }
    }
    rows
}
