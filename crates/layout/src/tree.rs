//! The arena holding every node of one conversion run.

use crate::LayoutError;
use crate::edit::StructuralEdit;
use crate::flags::Alignment;
use crate::node::{Element, Node, SyntheticKind, ViewState};
use anchorage_style::{ComputedStyle, Display};
use anchorage_types::{BoxRect, DocumentId, NodeId};
use log::{debug, trace};

#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl NodeTree {
    pub fn new(mut root: Element) -> Self {
        root.resolve_boxes(None);
        let node = Node {
            id: NodeId(0),
            element: root,
            parent: None,
            children: Vec::new(),
            sibling_index: 0,
            depth: 0,
            synthetic: None,
            view: ViewState::default(),
        };
        Self {
            nodes: vec![node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Panics when `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Adds a measured element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> Result<NodeId, LayoutError> {
        let container = self
            .get(parent)
            .map(|p| p.element.content)
            .ok_or(LayoutError::UnknownNode(parent))?;
        let inherited = self.relative_shift(parent);
        element.remove_relative_offset(Some(&container), inherited);
        element.resolve_boxes(Some(&container));
        let id = NodeId(self.nodes.len());
        let parent_node = self.node(parent);
        let node = Node {
            id,
            element,
            parent: Some(parent),
            children: Vec::new(),
            sibling_index: parent_node.children.len(),
            depth: parent_node.depth + 1,
            synthetic: None,
            view: ViewState::default(),
        };
        self.nodes.push(node);
        self.node_mut(parent).children.push(id);
        Ok(id)
    }

    /// Sum of the relative offsets of `id` and its ancestors.
    pub fn relative_shift(&self, id: NodeId) -> (f32, f32) {
        let mut shift = (0.0, 0.0);
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.get(c)) {
            shift.0 += node.element.offset.0;
            shift.1 += node.element.offset.1;
            current = node.parent;
        }
        shift
    }

    /// Creates a node which is not part of any child list.
    pub fn push_synthetic(
        &mut self,
        kind: SyntheticKind,
        tag: &str,
        parent: Option<NodeId>,
        bounds: BoxRect,
        style: ComputedStyle,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = parent.map(|p| self.node(p).depth + 1).unwrap_or(0);
        let mut element = Element::new(tag, style, bounds);
        element.lines = 0;
        self.nodes.push(Node {
            id,
            element,
            parent,
            children: Vec::new(),
            sibling_index: 0,
            depth,
            synthetic: Some(kind),
            view: ViewState::default(),
        });
        trace!("Created synthetic {:?} node {}", kind, id);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Children taking part in layout: displayed, not hidden and not excluded.
    pub fn flowing_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| {
                let child = self.node(c);
                child.visible() && !child.excluded()
            })
            .collect()
    }

    /// Siblings preceding `id` in document order, nearest last.
    pub fn previous_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        self.children(parent)
            .iter()
            .copied()
            .take_while(|&c| c != id)
            .collect()
    }

    pub fn document_id(&self, id: NodeId) -> Option<&DocumentId> {
        self.node(id).view.document_id.as_ref()
    }

    pub fn find_by_document_id(&self, document_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.view.document_id.as_ref().is_some_and(|d| d.as_str() == document_id))
            .map(|n| n.id)
    }

    /// Whether another element names this one in its `data-target` attribute.
    pub fn is_targeted(&self, id: NodeId) -> bool {
        let Some(element_id) = self.node(id).element.element_id.as_deref() else {
            return false;
        };
        self.nodes
            .iter()
            .any(|n| n.id != id && n.attribute("data-target") == Some(element_id))
    }

    /// Applies `edits` in order and returns the ids of created nodes.
    ///
    /// Every referenced node is checked before anything changes, so a failed
    /// batch leaves the tree untouched.
    pub fn apply_edits(&mut self, edits: Vec<StructuralEdit>) -> Result<Vec<NodeId>, LayoutError> {
        for edit in &edits {
            if let Some(missing) = edit.nodes().into_iter().find(|id| !self.contains(*id)) {
                return Err(LayoutError::UnknownNode(missing));
            }
            if let StructuralEdit::InsertGroup {
                parent, children, ..
            } = edit
            {
                if children.is_empty() {
                    return Err(LayoutError::EmptyLayout);
                }
                if let Some(stray) = children.iter().find(|c| self.node(**c).parent != Some(*parent)) {
                    return Err(LayoutError::Generic(format!(
                        "Node {} is not a child of {}",
                        stray, parent
                    )));
                }
            }
        }
        let mut created = Vec::new();
        for edit in edits {
            trace!("Applying {:?}", edit);
            match edit {
                StructuralEdit::Hide(id) => self.node_mut(id).view.hidden = true,
                StructuralEdit::Reparent {
                    node,
                    parent,
                    replacing,
                } => self.reparent(node, parent, replacing),
                StructuralEdit::Wrap { outer, inner } => {
                    self.node_mut(outer).view.inner_wrapped = Some(inner);
                    self.node_mut(inner).view.outer_wrapper = Some(outer);
                }
                StructuralEdit::ConsumeText { node, from } => {
                    let text = self.node(from).element.text.clone();
                    self.node_mut(node).view.inline_text = text;
                    self.node_mut(from).view.hidden = true;
                }
                StructuralEdit::InsertGroup {
                    parent,
                    children,
                    alignment,
                } => created.push(self.insert_group(parent, &children, alignment)),
                StructuralEdit::InsertWrapper {
                    node,
                    bounds,
                    alignment,
                } => created.push(self.insert_wrapper(node, bounds, alignment)),
            }
        }
        Ok(created)
    }

    fn detach(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        let siblings = &mut self.node_mut(parent).children;
        let index = siblings.iter().position(|c| *c == id)?;
        siblings.remove(index);
        Some(index)
    }

    fn reparent(&mut self, node: NodeId, parent: NodeId, replacing: Option<NodeId>) {
        self.detach(node);
        let slot = replacing.and_then(|r| self.children(parent).iter().position(|c| *c == r));
        match slot {
            Some(index) => self.node_mut(parent).children.insert(index, node),
            None => self.node_mut(parent).children.push(node),
        }
        if let Some(replaced) = replacing {
            self.node_mut(node).sibling_index = self.node(replaced).sibling_index;
        }
        self.node_mut(node).parent = Some(parent);
        let depth = self.node(parent).depth + 1;
        self.set_depth(node, depth);
    }

    fn insert_group(&mut self, parent: NodeId, children: &[NodeId], alignment: Alignment) -> NodeId {
        let first = children[0];
        let parent_style = self.node(parent).element.style.clone();
        let linear = children
            .iter()
            .map(|c| self.node(*c).element.linear)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let style = ComputedStyle {
            display: Display::Block,
            text_align: parent_style.text_align,
            direction: parent_style.direction,
            ..Default::default()
        };
        let group = self.push_synthetic(SyntheticKind::Group, "#group", Some(parent), linear, style);
        let slot = self.children(parent).iter().position(|c| *c == first).unwrap_or(0);
        let sibling_index = self.node(first).sibling_index;
        let lines = children.iter().map(|c| self.node(*c).element.lines).max().unwrap_or(1);
        for child in children {
            self.detach(*child);
            self.node_mut(*child).parent = Some(group);
            self.node_mut(group).children.push(*child);
        }
        {
            let node = self.node_mut(group);
            node.sibling_index = sibling_index;
            node.element.lines = lines;
            node.view.hint = alignment;
        }
        let depth = self.node(parent).depth + 1;
        self.set_depth(group, depth);
        let siblings = &mut self.node_mut(parent).children;
        let slot = slot.min(siblings.len());
        siblings.insert(slot, group);
        debug!(
            "Grouped {} children of {} into {} ({:?})",
            children.len(),
            parent,
            group,
            alignment
        );
        group
    }

    fn insert_wrapper(&mut self, node: NodeId, bounds: BoxRect, alignment: Alignment) -> NodeId {
        let parent = self.node(node).parent;
        let wrapper = self.push_synthetic(
            SyntheticKind::Wrapper,
            "#wrapper",
            parent,
            bounds,
            ComputedStyle::default(),
        );
        let sibling_index = self.node(node).sibling_index;
        let slot = self.detach(node);
        if let (Some(parent), Some(slot)) = (parent, slot) {
            self.node_mut(parent).children.insert(slot, wrapper);
        }
        {
            let w = self.node_mut(wrapper);
            w.sibling_index = sibling_index;
            w.children.push(node);
            w.view.hint = alignment;
            w.view.inner_wrapped = Some(node);
        }
        {
            let n = self.node_mut(node);
            n.parent = Some(wrapper);
            n.sibling_index = 0;
            n.view.outer_wrapper = Some(wrapper);
        }
        let depth = self.node(wrapper).depth;
        self.set_depth(wrapper, depth);
        debug!("Wrapped {} in {}", node, wrapper);
        wrapper
    }

    fn set_depth(&mut self, id: NodeId, depth: usize) {
        let mut stack = vec![(id, depth)];
        while let Some((current, depth)) = stack.pop() {
            self.node_mut(current).depth = depth;
            for child in self.node(current).children.clone() {
                stack.push((child, depth + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, text, TreeBuilder};
    use anchorage_style::Position;
    use anchorage_style::dimension::Dimension;

    #[test]
    fn append_assigns_sibling_index_and_depth() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let a = builder.child(builder.root(), block(0.0, 0.0, 400.0, 20.0));
        let b = builder.child(builder.root(), block(0.0, 20.0, 400.0, 20.0));
        let t = builder.child(b, text("hi", 0.0, 20.0, 20.0, 20.0));
        let tree = builder.build();
        assert_eq!(tree.node(a).sibling_index, 0);
        assert_eq!(tree.node(b).sibling_index, 1);
        assert_eq!(tree.node(t).depth, 2);
        assert_eq!(tree.previous_siblings(b), vec![a]);
    }

    #[test]
    fn insert_group_takes_slot_of_first_child() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let a = builder.child(root, block(0.0, 0.0, 400.0, 20.0));
        let b = builder.child(root, block(0.0, 20.0, 100.0, 20.0));
        let c = builder.child(root, block(100.0, 20.0, 100.0, 20.0));
        let mut tree = builder.build();

        let created = tree
            .apply_edits(vec![StructuralEdit::InsertGroup {
                parent: root,
                children: vec![b, c],
                alignment: Alignment::HORIZONTAL,
            }])
            .unwrap();
        let group = created[0];
        assert_eq!(tree.children(root), &[a, group]);
        assert_eq!(tree.children(group), &[b, c]);
        assert_eq!(tree.node(group).sibling_index, 1);
        assert_eq!(tree.node(group).element.bounds, BoxRect::new(0.0, 20.0, 200.0, 20.0));
        assert_eq!(tree.node(c).depth, 2);
        assert!(tree.node(group).is_group());
    }

    #[test]
    fn invalid_batch_leaves_tree_untouched() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let a = builder.child(root, block(0.0, 0.0, 400.0, 20.0));
        let mut tree = builder.build();

        let result = tree.apply_edits(vec![
            StructuralEdit::Hide(a),
            StructuralEdit::Hide(NodeId(42)),
        ]);
        assert!(matches!(result, Err(LayoutError::UnknownNode(NodeId(42)))));
        assert!(!tree.node(a).view.hidden);
    }

    #[test]
    fn reparent_replaces_collapsed_parent() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let wrapper = builder.child(root, block(0.0, 0.0, 400.0, 20.0));
        let inner = builder.child(wrapper, text("x", 0.0, 0.0, 10.0, 20.0));
        let mut tree = builder.build();

        tree.apply_edits(vec![
            StructuralEdit::Hide(wrapper),
            StructuralEdit::Reparent {
                node: inner,
                parent: root,
                replacing: Some(wrapper),
            },
            StructuralEdit::Wrap {
                outer: wrapper,
                inner,
            },
        ])
        .unwrap();
        assert_eq!(tree.children(root), &[inner, wrapper]);
        assert_eq!(tree.flowing_children(root), vec![inner]);
        assert_eq!(tree.node(inner).depth, 1);
        assert_eq!(tree.node(wrapper).view.inner_wrapped, Some(inner));
        assert_eq!(tree.node(inner).view.outer_wrapper, Some(wrapper));
    }

    #[test]
    fn relative_offsets_are_removed_from_descendants() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let mut shifted = block(10.0, 20.0, 100.0, 50.0);
        shifted.style.position = Position::Relative;
        shifted.style.left = Dimension::Px(10.0);
        shifted.style.top = Dimension::Px(20.0);
        let shifted = builder.child(builder.root(), shifted);
        let inner = builder.child(shifted, block(10.0, 20.0, 50.0, 10.0));
        let tree = builder.build();
        assert_eq!(tree.node(shifted).element.bounds, BoxRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(tree.node(shifted).element.offset, (10.0, 20.0));
        assert_eq!(tree.node(inner).element.bounds, BoxRect::new(0.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn targeted_by_data_attribute() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let mut target = block(0.0, 0.0, 400.0, 20.0);
        target.element_id = Some("menu".into());
        let target = builder.child(root, target);
        let mut toggle = block(0.0, 20.0, 400.0, 20.0);
        toggle.attributes.insert("data-target".into(), "menu".into());
        builder.child(root, toggle);
        let tree = builder.build();
        assert!(tree.is_targeted(target));
        assert!(!tree.is_targeted(root));
    }
}
