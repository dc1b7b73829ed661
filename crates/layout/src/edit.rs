use crate::flags::Alignment;
use anchorage_types::{BoxRect, NodeId};

/// A change to the tree topology requested by classification or
/// materialization, applied by [`crate::tree::NodeTree::apply_edits`].
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralEdit {
    /// Stop rendering the node.
    Hide(NodeId),
    /// Move `node` under `parent`, taking the slot of `replacing` when given.
    Reparent {
        node: NodeId,
        parent: NodeId,
        replacing: Option<NodeId>,
    },
    /// Record that `outer` was collapsed into `inner`.
    Wrap { outer: NodeId, inner: NodeId },
    /// `node` renders the text of `from`, which is no longer rendered itself.
    ConsumeText { node: NodeId, from: NodeId },
    /// Move consecutive `children` of `parent` under a new synthetic group.
    InsertGroup {
        parent: NodeId,
        children: Vec<NodeId>,
        alignment: Alignment,
    },
    /// Put a synthetic container with the given border box around `node`.
    InsertWrapper {
        node: NodeId,
        bounds: BoxRect,
        alignment: Alignment,
    },
}

impl StructuralEdit {
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            StructuralEdit::Hide(id) => vec![*id],
            StructuralEdit::Reparent {
                node,
                parent,
                replacing,
            } => {
                let mut ids = vec![*node, *parent];
                ids.extend(replacing);
                ids
            }
            StructuralEdit::Wrap { outer, inner } => vec![*outer, *inner],
            StructuralEdit::ConsumeText { node, from } => vec![*node, *from],
            StructuralEdit::InsertGroup {
                parent, children, ..
            } => {
                let mut ids = vec![*parent];
                ids.extend(children.iter().copied());
                ids
            }
            StructuralEdit::InsertWrapper { node, .. } => vec![*node],
        }
    }
}
