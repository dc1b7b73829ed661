//! Drives a conversion: classification and materialization in breadth-first
//! order, then anchoring of every anchored container, then finalization.

use crate::LayoutError;
use crate::attributes::{AttributeBag, AttributeKey};
use crate::classifier::{
    ClassifyOutcome, classify_unknown_child, classify_unknown_parent, group_float_horizontal,
    group_traverse_vertical,
};
use crate::config::LayoutConfig;
use crate::constraint::set_constraints;
use crate::context::LayoutContext;
use crate::finalize::finalize;
use crate::flags::Alignment;
use crate::layout::Layout;
use crate::materialize::{image_wrapper_edit, materialize_group, materialize_leaf, size_wrapper};
use crate::node::SyntheticKind;
use crate::node_kind::ContainerType;
use crate::template::{RenderTemplate, TemplateStore};
use crate::tree::NodeTree;
use anchorage_traits::{ContentMeasure, ResourceSink};
use anchorage_types::NodeId;
use log::{debug, info, trace};
use std::collections::VecDeque;

/// The converted tree with its render templates.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    tree: NodeTree,
    templates: TemplateStore,
}

impl RenderOutput {
    pub fn root(&self) -> Option<NodeId> {
        self.templates.root().map(|t| t.node)
    }

    pub fn root_template(&self) -> Option<&RenderTemplate> {
        self.templates.root()
    }

    /// Templates of the render children of `parent`, in output order.
    pub fn children(&self, parent: NodeId) -> &[RenderTemplate] {
        self.templates.children(parent)
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn attributes(&self, id: NodeId) -> &AttributeBag {
        &self.tree.node(id).view.attributes
    }

    pub fn attr(&self, id: NodeId, key: AttributeKey) -> Option<&str> {
        self.attributes(id).get(key)
    }

    /// Looks a rendered node up by its document id, without the `@+id/` prefix.
    pub fn find(&self, document_id: &str) -> Option<NodeId> {
        self.tree.find_by_document_id(document_id)
    }
}

pub struct Controller<'a> {
    ctx: LayoutContext<'a>,
}

impl<'a> Controller<'a> {
    pub fn new(
        tree: NodeTree,
        config: LayoutConfig,
        resources: &'a mut dyn ResourceSink,
        measure: &'a dyn ContentMeasure,
    ) -> Self {
        Self {
            ctx: LayoutContext::new(tree, config, resources, measure),
        }
    }

    /// Converts the whole tree.
    pub fn convert(mut self) -> Result<RenderOutput, LayoutError> {
        let root = self.ctx.tree.root();
        let mut queue: VecDeque<(Option<NodeId>, NodeId)> = VecDeque::from([(None, root)]);
        let mut order = Vec::new();
        let mut containers = Vec::new();

        while let Some((parent, id)) = queue.pop_front() {
            let node = self.ctx.node(id);
            if node.view.hidden || node.view.rendered {
                continue;
            }
            let children = self.ctx.tree.flowing_children(id);
            if children.is_empty() {
                if let Some(edit) = image_wrapper_edit(&self.ctx.tree, id) {
                    let created = self.ctx.tree.apply_edits(vec![edit])?;
                    if let Some(&wrapper) = created.first() {
                        queue.push_front((parent, wrapper));
                        continue;
                    }
                }
                if self.render_leaf(parent, id)? {
                    order.push(id);
                }
                continue;
            }

            let layout = Layout::new(&self.ctx.tree, parent, id, children);
            let outcome = classify_unknown_parent(&self.ctx.tree, &self.ctx.config, layout)?;
            let Some(layout) = self.apply_outcome(parent, outcome, &mut queue)? else {
                continue;
            };
            let layout = self.group(layout)?;
            materialize_group(&mut self.ctx, &layout)?;
            if self.ctx.node(id).synthetic == Some(SyntheticKind::Wrapper) {
                size_wrapper(&mut self.ctx, id);
            }
            order.push(id);
            if layout.container_type.is_anchored() {
                containers.push(id);
            }
            for child in self.ctx.tree.flowing_children(id) {
                queue.push_back((Some(id), child));
            }
        }

        info!(
            "Rendered {} nodes, anchoring {} containers",
            order.len(),
            containers.len()
        );
        set_constraints(&mut self.ctx, &containers)?;
        finalize(&mut self.ctx, &order)?;
        let (tree, templates) = self.ctx.into_parts();
        Ok(RenderOutput { tree, templates })
    }

    /// Applies the edits of a classification. Returns the layout to render,
    /// or `None` when the node is skipped or replaced.
    fn apply_outcome(
        &mut self,
        parent: Option<NodeId>,
        outcome: ClassifyOutcome,
        queue: &mut VecDeque<(Option<NodeId>, NodeId)>,
    ) -> Result<Option<Layout>, LayoutError> {
        self.ctx.tree.apply_edits(outcome.edits)?;
        if let Some(replacement) = outcome.render_as {
            trace!("{} renders in place of {}", replacement, outcome.layout.node);
            queue.push_front((parent, replacement));
            return Ok(None);
        }
        if outcome.next {
            return Ok(None);
        }
        Ok(Some(outcome.layout))
    }

    /// Splits float frames and mixed vertical layouts into row groups.
    fn group(&mut self, mut layout: Layout) -> Result<Layout, LayoutError> {
        let tree = &self.ctx.tree;
        let edits = match layout.container_type {
            ContainerType::Frame if layout.has_align(Alignment::FLOAT) => group_float_horizontal(tree, &layout),
            ContainerType::Linear if layout.has_align(Alignment::VERTICAL | Alignment::UNKNOWN) => {
                group_traverse_vertical(tree, &layout, self.ctx.epsilon())
            }
            _ => Vec::new(),
        };
        if !edits.is_empty() {
            let created = self.ctx.tree.apply_edits(edits)?;
            debug!("Grouped children of {} into {} groups", layout.node, created.len());
            layout.children = self.ctx.tree.flowing_children(layout.node);
        }
        Ok(layout)
    }

    fn render_leaf(&mut self, parent: Option<NodeId>, id: NodeId) -> Result<bool, LayoutError> {
        let layout = Layout::new(&self.ctx.tree, parent, id, Vec::new());
        let outcome = classify_unknown_child(&self.ctx.tree, layout)?;
        self.ctx.tree.apply_edits(outcome.edits)?;
        if outcome.next {
            return Ok(false);
        }
        materialize_leaf(&mut self.ctx, &outcome.layout)?;
        Ok(true)
    }
}
