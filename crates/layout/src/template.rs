//! Render templates: the ordered output records consumed by serialization.

use crate::LayoutError;
use crate::tree::NodeTree;
use anchorage_types::NodeId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// An element written in place.
    Xml,
    /// An element written to its own layout file and referenced by name.
    Include,
    /// The children of an included element, without the element itself.
    Merge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderTemplate {
    pub kind: TemplateKind,
    pub node: NodeId,
    pub control_name: String,
}

impl RenderTemplate {
    pub fn xml(node: NodeId, control_name: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::Xml,
            node,
            control_name: control_name.into(),
        }
    }
}

/// Templates per render parent, in output order.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    root: Option<RenderTemplate>,
    children: BTreeMap<NodeId, Vec<RenderTemplate>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<NodeId>, template: RenderTemplate) -> Result<(), LayoutError> {
        match parent {
            None => {
                if self.root.is_some() {
                    return Err(LayoutError::Generic(format!(
                        "Root template already set, cannot add {}",
                        template.node
                    )));
                }
                self.root = Some(template);
            }
            Some(parent) => self.children.entry(parent).or_default().push(template),
        }
        Ok(())
    }

    pub fn root(&self) -> Option<&RenderTemplate> {
        self.root.as_ref()
    }

    pub fn children(&self, parent: NodeId) -> &[RenderTemplate] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child_nodes(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).iter().map(|t| t.node).collect()
    }

    pub fn parents(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.keys().copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.root.as_ref().is_some_and(|t| t.node == node)
            || self.children.values().flatten().any(|t| t.node == node)
    }

    pub fn len(&self) -> usize {
        self.root.iter().count() + self.children.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn children_mut(&mut self, parent: NodeId) -> Option<&mut Vec<RenderTemplate>> {
        self.children.get_mut(&parent)
    }
}

/// Reorders templates by stacking order: negative `z-index` first, positioned
/// items with a positive `z-index` last. The sort is stable.
pub fn sort_render_position(tree: &NodeTree, templates: &mut [RenderTemplate]) {
    templates.sort_by_key(|template| {
        let node = tree.node(template.node);
        let style = node.style();
        let positioned = style.position != anchorage_style::Position::Static;
        match style.z_index {
            Some(z) if z < 0 => (0, z),
            Some(z) if z > 0 && positioned => (2, z),
            _ => (1, 0),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, TreeBuilder};
    use anchorage_style::Position;

    #[test]
    fn z_index_orders_stably() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut raised = block(0.0, 0.0, 10.0, 10.0);
        raised.style.position = Position::Absolute;
        raised.style.z_index = Some(2);
        let raised = builder.child(root, raised);
        let plain = builder.child(root, block(0.0, 10.0, 10.0, 10.0));
        let mut sunk = block(0.0, 20.0, 10.0, 10.0);
        sunk.style.z_index = Some(-1);
        let sunk = builder.child(root, sunk);
        let mut unpositioned = block(0.0, 30.0, 10.0, 10.0);
        unpositioned.style.z_index = Some(5);
        let unpositioned = builder.child(root, unpositioned);
        let tree = builder.build();

        let mut templates: Vec<_> = [raised, plain, sunk, unpositioned]
            .into_iter()
            .map(|n| RenderTemplate::xml(n, "View"))
            .collect();
        sort_render_position(&tree, &mut templates);
        let order: Vec<_> = templates.iter().map(|t| t.node).collect();
        assert_eq!(order, vec![sunk, plain, unpositioned, raised]);
    }

    #[test]
    fn root_is_set_once() {
        let mut store = TemplateStore::new();
        store.push(None, RenderTemplate::xml(NodeId(0), "FrameLayout")).unwrap();
        assert!(store.push(None, RenderTemplate::xml(NodeId(1), "View")).is_err());
        store.push(Some(NodeId(0)), RenderTemplate::xml(NodeId(1), "View")).unwrap();
        assert_eq!(store.child_nodes(NodeId(0)), vec![NodeId(1)]);
        assert_eq!(store.len(), 2);
        assert!(store.contains(NodeId(1)));
    }
}
