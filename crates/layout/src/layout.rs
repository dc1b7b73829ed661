use crate::LayoutError;
use crate::flags::Alignment;
use crate::node_kind::ContainerType;
use crate::tree::NodeTree;
use anchorage_style::{Clear, Float};
use anchorage_types::NodeId;
use std::collections::{BTreeMap, BTreeSet};

/// A parent and its flowing children, as seen by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// The render parent, `None` for the root.
    pub parent: Option<NodeId>,
    pub node: NodeId,
    pub container_type: ContainerType,
    pub alignment: Alignment,
    pub children: Vec<NodeId>,
    /// Float directions present among the children.
    pub floated: BTreeSet<Float>,
    /// Children whose `clear` applies to an earlier float.
    pub cleared: BTreeMap<NodeId, Clear>,
}

impl Layout {
    pub fn new(tree: &NodeTree, parent: Option<NodeId>, node: NodeId, children: Vec<NodeId>) -> Self {
        let mut floated = BTreeSet::new();
        let mut cleared = BTreeMap::new();
        for &child in &children {
            let item = tree.node(child);
            let clear = item.style().clear;
            if floated.iter().any(|f| clear.clears(*f)) {
                cleared.insert(child, clear);
            }
            let float = item.float();
            if float != Float::None {
                floated.insert(float);
            }
        }
        Self {
            parent,
            node,
            container_type: ContainerType::Unknown,
            alignment: Alignment::empty(),
            children,
            floated,
            cleared,
        }
    }

    /// Sets the container type. A layout is typed exactly once.
    pub fn set_type(&mut self, container_type: ContainerType, alignment: Alignment) -> Result<(), LayoutError> {
        if self.container_type != ContainerType::Unknown {
            return Err(LayoutError::ContainerTypeReassigned(self.node));
        }
        if container_type == ContainerType::Unknown {
            return Err(LayoutError::ContainerTypeUnset(self.node));
        }
        self.container_type = container_type;
        self.alignment |= alignment;
        Ok(())
    }

    pub fn add_align(&mut self, alignment: Alignment) {
        self.alignment |= alignment;
    }

    pub fn has_align(&self, alignment: Alignment) -> bool {
        self.alignment.has_all(alignment)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_typed(&self) -> bool {
        self.container_type != ContainerType::Unknown
    }

    /// The children share one line: no forced break, no block box, and
    /// every pair overlaps vertically.
    pub fn linear_x(&self, tree: &NodeTree, epsilon: f32) -> bool {
        if self.children.len() <= 1 {
            return true;
        }
        let nodes: Vec<_> = self.children.iter().map(|c| tree.node(*c)).collect();
        if nodes.iter().skip(1).any(|n| n.element.line_break) {
            return false;
        }
        if nodes.iter().any(|n| n.block_statically()) {
            return false;
        }
        nodes.iter().enumerate().all(|(i, a)| {
            nodes.iter().skip(i + 1).all(|b| {
                a.bounds().top < b.bounds().bottom - epsilon && b.bounds().top < a.bounds().bottom - epsilon
            })
        })
    }

    /// Every child starts below the previous one.
    pub fn linear_y(&self, tree: &NodeTree, epsilon: f32) -> bool {
        if self.children.len() <= 1 {
            return true;
        }
        self.children.windows(2).all(|pair| {
            let previous = tree.node(pair[0]);
            let current = tree.node(pair[1]);
            current.linear().top >= previous.linear().bottom - epsilon
                || (previous.block_statically() && current.block_statically())
        })
    }

    /// Whether the child at `index` starts below all earlier siblings.
    pub fn aligned_vertically(&self, tree: &NodeTree, index: usize, epsilon: f32) -> bool {
        if index == 0 || index >= self.children.len() {
            return false;
        }
        let current = tree.node(self.children[index]);
        if current.element.line_break {
            return true;
        }
        let lowest = self.children[..index]
            .iter()
            .map(|c| tree.node(*c).bounds().bottom)
            .fold(f32::MIN, f32::max);
        current.bounds().top >= lowest - epsilon
    }

    /// One line of single-line children.
    pub fn single_row_aligned(&self, tree: &NodeTree, epsilon: f32) -> bool {
        self.linear_x(tree, epsilon) && self.children.iter().all(|c| !tree.node(*c).multiline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, floated, inline, TreeBuilder};

    #[test]
    fn floats_and_clears_are_collected() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let a = builder.child(root, floated(Float::Left, 0.0, 0.0, 100.0, 20.0));
        let mut cleared = block(0.0, 20.0, 400.0, 20.0);
        cleared.style.clear = Clear::Both;
        let b = builder.child(root, cleared);
        let tree = builder.build();
        let layout = Layout::new(&tree, None, root, vec![a, b]);
        assert!(layout.floated.contains(&Float::Left));
        assert_eq!(layout.cleared.get(&b), Some(&Clear::Both));
        assert_eq!(layout.cleared.len(), 1);
    }

    #[test]
    fn type_is_set_exactly_once() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let a = builder.child(root, block(0.0, 0.0, 400.0, 20.0));
        let tree = builder.build();
        let mut layout = Layout::new(&tree, None, root, vec![a]);
        layout.set_type(ContainerType::Frame, Alignment::SINGLE).unwrap();
        assert!(matches!(
            layout.set_type(ContainerType::Linear, Alignment::empty()),
            Err(LayoutError::ContainerTypeReassigned(_))
        ));
        assert_eq!(layout.container_type, ContainerType::Frame);
        assert!(layout.has_align(Alignment::SINGLE));
    }

    #[test]
    fn row_and_stack_detection() {
        let mut builder = TreeBuilder::new(400.0, 300.0);
        let root = builder.root();
        let a = builder.child(root, inline(0.0, 0.0, 100.0, 20.0));
        let b = builder.child(root, inline(100.0, 0.0, 100.0, 20.0));
        let c = builder.child(root, block(0.0, 20.0, 400.0, 20.0));
        let d = builder.child(root, block(0.0, 40.0, 400.0, 20.0));
        let tree = builder.build();

        let row = Layout::new(&tree, None, root, vec![a, b]);
        assert!(row.linear_x(&tree, 0.5));
        assert!(!row.linear_y(&tree, 0.5));

        let stack = Layout::new(&tree, None, root, vec![c, d]);
        assert!(stack.linear_y(&tree, 0.5));
        assert!(!stack.linear_x(&tree, 0.5));

        let mixed = Layout::new(&tree, None, root, vec![a, b, c]);
        assert!(!mixed.aligned_vertically(&tree, 1, 0.5));
        assert!(mixed.aligned_vertically(&tree, 2, 0.5));
    }
}
