//! Conversion state shared by every pass, and the view operations that
//! write anchors and attributes onto nodes.

use crate::anchor::{AnchorPosition, AnchorTarget, ChainStyle};
use crate::attributes::AttributeKey;
use crate::config::LayoutConfig;
use crate::node::{Node, ViewState};
use crate::node_kind::ContainerType;
use crate::template::TemplateStore;
use crate::tree::NodeTree;
use crate::util::truncate;
use anchorage_traits::{ContentMeasure, ResourceKind, ResourceSink};
use anchorage_types::{Axis, DocumentId, Edge, NodeId};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

pub struct LayoutContext<'a> {
    pub tree: NodeTree,
    pub config: LayoutConfig,
    pub templates: TemplateStore,
    pub resources: &'a mut dyn ResourceSink,
    pub measure: &'a dyn ContentMeasure,
    id_counters: BTreeMap<String, usize>,
    used_ids: BTreeSet<String>,
}

fn sanitize_id(value: &str) -> Option<String> {
    let mut id: String = value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    id = id.trim_matches('_').to_string();
    if id.is_empty() {
        return None;
    }
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert_str(0, "id_");
    }
    Some(id)
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        tree: NodeTree,
        config: LayoutConfig,
        resources: &'a mut dyn ResourceSink,
        measure: &'a dyn ContentMeasure,
    ) -> Self {
        Self {
            tree,
            config,
            templates: TemplateStore::new(),
            resources,
            measure,
            id_counters: BTreeMap::new(),
            used_ids: BTreeSet::new(),
        }
    }

    /// Ends the run, handing back the tree and the collected templates.
    pub fn into_parts(self) -> (NodeTree, TemplateStore) {
        (self.tree, self.templates)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.tree.node(id)
    }

    pub fn view_mut(&mut self, id: NodeId) -> &mut ViewState {
        &mut self.tree.node_mut(id).view
    }

    pub fn epsilon(&self) -> f32 {
        self.config.relative_epsilon
    }

    /// Gives the node its output id: the element id when usable, otherwise
    /// the control prefix with a running number.
    pub fn assign_document_id(&mut self, id: NodeId, container: ContainerType) -> DocumentId {
        if let Some(existing) = self.tree.document_id(id) {
            return existing.clone();
        }
        let preferred = self
            .node(id)
            .element
            .element_id
            .as_deref()
            .and_then(sanitize_id)
            .filter(|name| !self.used_ids.contains(name));
        let name = match preferred {
            Some(name) => name,
            None => loop {
                let prefix = container.id_prefix();
                let counter = self.id_counters.entry(prefix.clone()).or_insert(0);
                *counter += 1;
                let candidate = format!("{}_{}", prefix, counter);
                if !self.used_ids.contains(&candidate) {
                    break candidate;
                }
            },
        };
        self.used_ids.insert(name.clone());
        let document_id = DocumentId::new(name);
        self.view_mut(id).document_id = Some(document_id.clone());
        self.view_mut(id)
            .attributes
            .put(AttributeKey::Id, format!("@+id/{}", document_id));
        document_id
    }

    pub fn attr(&self, id: NodeId, key: AttributeKey) -> Option<&str> {
        self.node(id).view.attributes.get(key)
    }

    pub fn set_attr(&mut self, id: NodeId, key: AttributeKey, value: impl Into<String>, overwrite: bool) -> bool {
        self.view_mut(id).attributes.set(key, value, overwrite)
    }

    pub fn remove_attr(&mut self, id: NodeId, key: AttributeKey) -> Option<String> {
        self.view_mut(id).attributes.remove(key)
    }

    pub fn render_parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).view.render_parent
    }

    /// The container type of the node's render parent.
    pub fn parent_container(&self, id: NodeId) -> ContainerType {
        self.render_parent(id)
            .map(|p| self.node(p).view.container_type)
            .unwrap_or_default()
    }

    /// Left/right names are written as start/end of a right-to-left container.
    fn mirrored(&self, id: NodeId) -> bool {
        self.config.supports_rtl && self.render_parent(id).is_some_and(|p| self.node(p).rtl())
    }

    fn target_value(&self, target: AnchorTarget) -> Option<String> {
        match target {
            AnchorTarget::Parent => Some("parent".to_string()),
            AnchorTarget::Node(t) => self.tree.document_id(t).map(|d| format!("@id/{}", d)),
        }
    }

    fn anchor_key(&self, id: NodeId, position: AnchorPosition, to_parent: bool) -> Option<AttributeKey> {
        let position = if self.mirrored(id) { position.mirrored() } else { position };
        match self.parent_container(id) {
            ContainerType::Constraint => {
                let relation = position.constraint_relation()?;
                Some(AttributeKey::Constraint(if self.config.supports_rtl {
                    relation.to_directional()
                } else {
                    relation
                }))
            }
            ContainerType::Relative => {
                let rule = position.relative_rule(to_parent)?;
                Some(AttributeKey::Relative(if self.config.supports_rtl {
                    rule.to_directional()
                } else {
                    rule
                }))
            }
            _ => None,
        }
    }

    /// Anchors `position` of the node to `target`.
    ///
    /// An existing sibling anchor is kept unless `overwrite` is set. Returns
    /// whether the anchor was written.
    pub fn anchor(&mut self, id: NodeId, position: AnchorPosition, target: AnchorTarget, overwrite: bool) -> bool {
        if target == AnchorTarget::Node(id) {
            return false;
        }
        let to_parent = target == AnchorTarget::Parent;
        if !to_parent
            && let AnchorTarget::Node(t) = target
            && self.render_parent(t) != self.render_parent(id)
        {
            debug!("Skipping anchor of {} to {} outside its container", id, t);
            return false;
        }
        let Some(key) = self.anchor_key(id, position, to_parent) else {
            debug!(
                "No {:?} anchor in a {} container for {}",
                position,
                self.parent_container(id).as_str(),
                id
            );
            return false;
        };
        let value = if matches!(key, AttributeKey::Relative(rule) if rule.targets_parent()) {
            Some("true".to_string())
        } else {
            self.target_value(target)
        };
        let Some(value) = value else {
            debug!("Anchor target of {} has no document id", id);
            return false;
        };
        if !self.view_mut(id).constraint.insert(position, target, overwrite) {
            return false;
        }
        self.set_attr(id, key, value, true);
        true
    }

    /// Centers the node between both parent edges on `axis`.
    pub fn anchor_parent(&mut self, id: NodeId, axis: Axis, bias: Option<f32>, overwrite: bool) {
        match self.parent_container(id) {
            ContainerType::Relative => {
                let position = if axis.is_horizontal() {
                    AnchorPosition::CenterHorizontal
                } else {
                    AnchorPosition::CenterVertical
                };
                self.anchor(id, position, AnchorTarget::Parent, overwrite);
            }
            _ => {
                let (near, far) = axis.edges();
                self.anchor(id, AnchorPosition::aligned(near), AnchorTarget::Parent, overwrite);
                self.anchor(id, AnchorPosition::aligned(far), AnchorTarget::Parent, overwrite);
                if let Some(bias) = bias {
                    self.anchor_bias(id, axis, bias, overwrite);
                }
            }
        }
    }

    pub fn anchor_bias(&mut self, id: NodeId, axis: Axis, bias: f32, overwrite: bool) {
        let bias = if axis.is_horizontal() && self.mirrored(id) { 1.0 - bias } else { bias };
        let value = truncate(bias, self.config.decimal_places);
        self.set_attr(id, AttributeKey::Bias(axis), value, overwrite);
    }

    /// Marks the node as the head of a chain on `axis`.
    pub fn anchor_style(&mut self, id: NodeId, axis: Axis, style: ChainStyle, bias: f32, overwrite: bool) {
        self.set_attr(id, AttributeKey::ChainStyle(axis), style.as_str(), overwrite);
        self.anchor_bias(id, axis, bias, overwrite);
    }

    pub fn delete_chain_style(&mut self, id: NodeId, axis: Axis) {
        self.remove_attr(id, AttributeKey::ChainStyle(axis));
        self.remove_attr(id, AttributeKey::Bias(axis));
    }

    pub fn anchor_delete(&mut self, id: NodeId, positions: &[AnchorPosition]) {
        for &position in positions {
            let record = self.view_mut(id).constraint.remove(position);
            for candidate in [position, position.mirrored()] {
                if let Some(relation) = candidate.constraint_relation() {
                    self.remove_attr(id, AttributeKey::Constraint(relation));
                    self.remove_attr(id, AttributeKey::Constraint(relation.to_directional()));
                }
                for to_parent in [true, false] {
                    if let Some(rule) = candidate.relative_rule(to_parent) {
                        self.remove_attr(id, AttributeKey::Relative(rule));
                        self.remove_attr(id, AttributeKey::Relative(rule.to_directional()));
                    }
                }
            }
            if record.is_some() {
                debug!("Removed {:?} anchor of {}", position, id);
            }
        }
    }

    pub fn anchor_clear(&mut self, id: NodeId, axis: Option<Axis>) {
        let positions: Vec<AnchorPosition> = self
            .node(id)
            .view
            .constraint
            .iter()
            .map(|(p, _)| p)
            .filter(|p| axis.is_none_or(|a| p.axis() == a))
            .collect();
        self.anchor_delete(id, &positions);
    }

    pub fn anchor_target(&self, id: NodeId, position: AnchorPosition) -> Option<AnchorTarget> {
        self.node(id).view.constraint.get(position).map(|r| r.target)
    }

    pub fn adjust_margin(&mut self, id: NodeId, edge: Edge, delta: f32) {
        *self.view_mut(id).box_adjustment.margin.get_mut(edge) += delta;
    }

    pub fn adjust_padding(&mut self, id: NodeId, edge: Edge, delta: f32) {
        *self.view_mut(id).box_adjustment.padding.get_mut(edge) += delta;
    }

    /// The margin written for `edge` after adjustments.
    pub fn final_margin(&self, id: NodeId, edge: Edge) -> f32 {
        let node = self.node(id);
        node.element.margin.get(edge) + node.view.box_adjustment.margin.get(edge)
    }

    /// Adjusts the margin so that the written value becomes `value`.
    pub fn set_margin_to(&mut self, id: NodeId, edge: Edge, value: f32) {
        let current = self.final_margin(id, edge);
        self.adjust_margin(id, edge, value - current);
    }

    /// Registers a resource and returns its reference, or `None` when the sink rejects it.
    pub fn add_resource(&mut self, kind: ResourceKind, hint: &str, value: &str) -> Option<String> {
        match self.resources.add(kind, hint, value) {
            Ok(reference) => Some(reference),
            Err(e) => {
                warn!("Resource '{}' not registered: {}", hint, e);
                None
            }
        }
    }
}
