use crate::attributes::{AttributeKey, ConstraintRelation};
use crate::config::LayoutConfig;
use crate::controller::{Controller, RenderOutput};
use crate::node_kind::ContainerType;
use crate::test_utils::{block, floated, inline, text, TreeBuilder};
use crate::tree::NodeTree;
use anchorage_style::dimension::Dimension;
use anchorage_style::{Display, Float, JustifyContent, Position};
use anchorage_traits::{InMemoryResources, StackedFlowMeasure};
use anchorage_types::{Axis, NodeId};

fn convert(tree: NodeTree) -> RenderOutput {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut resources = InMemoryResources::new();
    let measure = StackedFlowMeasure;
    Controller::new(tree, LayoutConfig::default(), &mut resources, &measure)
        .convert()
        .unwrap()
}

fn control(output: &RenderOutput, parent: NodeId, child: NodeId) -> &str {
    output
        .children(parent)
        .iter()
        .find(|t| t.node == child)
        .map(|t| t.control_name.as_str())
        .unwrap()
}

fn rendered(output: &RenderOutput) -> Vec<NodeId> {
    output
        .tree()
        .iter()
        .filter(|n| n.view.rendered && !n.view.hidden)
        .map(|n| n.id)
        .collect()
}

fn card_list() -> NodeTree {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    let header = builder.child(root, block(0.0, 0.0, 400.0, 40.0));
    builder.child(header, text("Inbox", 10.0, 10.0, 80.0, 20.0));
    builder.child(root, floated(Float::Left, 0.0, 40.0, 100.0, 100.0));
    builder.child(root, block(100.0, 40.0, 300.0, 60.0));
    let mut footer = block(0.0, 260.0, 120.0, 40.0);
    footer.style.position = Position::Absolute;
    footer.style.bottom = Dimension::Px(0.0);
    builder.child(root, footer);
    builder.build()
}

#[test]
fn floats_around_flow_content_render_in_a_frame() {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    let left = builder.child(root, floated(Float::Left, 0.0, 0.0, 100.0, 40.0));
    builder.child(root, inline(100.0, 0.0, 200.0, 40.0));
    let right = builder.child(root, floated(Float::Right, 300.0, 0.0, 100.0, 40.0));
    let output = convert(builder.build());
    assert_eq!(output.root_template().unwrap().control_name, "FrameLayout");
    assert_eq!(output.attr(right, AttributeKey::LayoutGravity), Some("right"));
    assert!(output.attr(left, AttributeKey::LayoutGravity).is_none());
}

#[test]
fn unattributed_single_child_parent_collapses() {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    let outer = builder.child(root, block(0.0, 0.0, 400.0, 20.0));
    let inner = builder.child(outer, block(0.0, 0.0, 400.0, 20.0));
    builder.child(inner, text("Hello", 0.0, 0.0, 40.0, 20.0));
    let output = convert(builder.build());

    let tree = output.tree();
    assert!(tree.node(outer).view.hidden);
    assert_eq!(tree.parent(inner), Some(root));
    assert_eq!(tree.node(outer).view.inner_wrapped, Some(inner));
    assert_eq!(tree.node(inner).view.outer_wrapper, Some(outer));
    assert_eq!(control(&output, root, inner), "TextView");
    assert_eq!(output.children(root).len(), 1);
}

#[test]
fn percentage_children_of_an_unsized_parent() {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    let mut ids = Vec::new();
    for left in [0.0, 200.0] {
        let mut half = block(left, 0.0, 200.0, 40.0);
        half.style.width = Dimension::Percent(50.0);
        ids.push(builder.child(root, half));
    }
    let output = convert(builder.build());
    assert_eq!(
        output.root_template().unwrap().control_name,
        ContainerType::Constraint.control_name()
    );
    for id in ids {
        assert_eq!(output.attr(id, AttributeKey::LayoutWidth), Some("0px"));
        assert_eq!(
            output.attr(id, AttributeKey::DimensionPercent(Axis::Horizontal)),
            Some("0.5")
        );
    }
}

#[test]
fn static_absolute_child_uses_the_parent_edge_and_one_guideline() {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    let mut overlay = block(0.0, 30.0, 100.0, 40.0);
    overlay.style.position = Position::Absolute;
    let overlay = builder.child(root, overlay);
    let output = convert(builder.build());

    assert_eq!(
        output.attr(overlay, AttributeKey::Constraint(ConstraintRelation::LeftToLeftOf)),
        Some("parent")
    );
    let guidelines: Vec<NodeId> = output
        .children(root)
        .iter()
        .filter(|t| t.control_name == ContainerType::Guideline.control_name())
        .map(|t| t.node)
        .collect();
    assert_eq!(guidelines.len(), 1);
    assert_eq!(output.attr(guidelines[0], AttributeKey::GuideBegin), Some("30px"));
    assert_eq!(output.attr(guidelines[0], AttributeKey::Orientation), Some("horizontal"));
    assert_eq!(
        output.attr(overlay, AttributeKey::Constraint(ConstraintRelation::TopToTopOf)),
        Some("@id/guideline_1")
    );
}

#[test]
fn conversion_is_deterministic() {
    let first = convert(card_list());
    let second = convert(card_list());
    let ids = rendered(&first);
    assert_eq!(ids, rendered(&second));
    for id in ids {
        assert_eq!(first.attributes(id), second.attributes(id), "attributes of {}", id);
        assert_eq!(first.tree().document_id(id), second.tree().document_id(id));
    }
}

#[test]
fn constraint_targets_stay_within_the_render_parent() {
    let output = convert(card_list());
    let tree = output.tree();
    for id in rendered(&output) {
        let node = tree.node(id);
        for (key, value) in node.view.attributes.iter() {
            if !matches!(key, AttributeKey::Constraint(_)) || value == "parent" {
                continue;
            }
            let target = value.trim_start_matches("@id/");
            let target = output
                .find(target)
                .unwrap_or_else(|| panic!("{} targets missing {}", id, value));
            assert_eq!(
                tree.node(target).view.render_parent,
                node.view.render_parent,
                "{} anchors outside its container",
                id
            );
        }
    }
}

#[test]
fn every_rendered_node_has_a_unique_document_id() {
    let output = convert(card_list());
    let mut ids: Vec<String> = rendered(&output)
        .into_iter()
        .filter_map(|id| output.tree().document_id(id).map(|d| d.to_string()))
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, rendered(&output).len());
}

fn toolbar_page() -> NodeTree {
    let mut builder = TreeBuilder::new(400.0, 300.0);
    let root = builder.root();
    builder.child(root, block(0.0, 0.0, 400.0, 40.0));
    let mut row = block(0.0, 40.0, 400.0, 40.0);
    row.style.display = Display::Flex;
    row.style.justify_content = JustifyContent::Center;
    let row = builder.child(root, row);
    for left in [100.0, 200.0, 300.0] {
        builder.child(row, block(left, 40.0, 60.0, 40.0));
    }
    let mut badge = block(360.0, 260.0, 40.0, 40.0);
    badge.style.position = Position::Absolute;
    badge.style.right = Dimension::Px(0.0);
    badge.style.bottom = Dimension::Px(0.0);
    builder.child(root, badge);
    builder.build()
}

fn sibling_references(value: &str) -> Vec<&str> {
    match value.strip_prefix("@id/") {
        Some(id) => vec![id],
        None => Vec::new(),
    }
}

#[test]
fn anchors_reference_only_rendered_siblings() {
    for tree in [card_list(), toolbar_page()] {
        let output = convert(tree);
        let tree = output.tree();
        for container in output.templates().parents() {
            let siblings: Vec<String> = output
                .children(container)
                .iter()
                .filter_map(|t| tree.document_id(t.node).map(|d| d.to_string()))
                .collect();
            for template in output.children(container) {
                for (key, value) in output.attributes(template.node).iter() {
                    let targets = match key {
                        AttributeKey::Constraint(_) | AttributeKey::Relative(_) => sibling_references(value),
                        AttributeKey::ReferencedIds => value.split(',').collect(),
                        _ => continue,
                    };
                    for target in targets {
                        assert!(
                            siblings.iter().any(|s| s == target),
                            "{} of {} targets {} outside {}",
                            key.qualified_name(),
                            template.node,
                            target,
                            container
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn chain_links_are_paired() {
    let output = convert(toolbar_page());
    let tree = output.tree();
    let reference = |id: NodeId| tree.document_id(id).map(|d| format!("@id/{}", d));
    let mut links = 0;
    for container in output.templates().parents() {
        for template in output.children(container) {
            let node = template.node;
            let right_left = output.attr(node, AttributeKey::Constraint(ConstraintRelation::RightToLeftOf));
            let Some(target) = right_left.and_then(|v| output.find(v.trim_start_matches("@id/"))) else {
                continue;
            };
            links += 1;
            let back = output.attr(target, AttributeKey::Constraint(ConstraintRelation::LeftToRightOf));
            let pinned_left = output
                .attr(node, AttributeKey::Constraint(ConstraintRelation::LeftToLeftOf))
                .is_some();
            assert!(
                back.map(str::to_string) == reference(node) || pinned_left,
                "{} links right to {} without a link back",
                node,
                target
            );
        }
    }
    assert!(links >= 2, "expected the flex row to be chained");
}
