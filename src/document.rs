//! The measured document: the JSON form of a rendered HTML page, with the
//! computed style and border box of every element.

use crate::error::PipelineError;
use anchorage_layout::node::TEXT_TAG;
use anchorage_layout::{Element, NodeTree};
use anchorage_style::ComputedStyle;
use anchorage_types::{BoxRect, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Bounds> for BoxRect {
    fn from(bounds: Bounds) -> Self {
        BoxRect::new(bounds.left, bounds.top, bounds.width, bounds.height)
    }
}

fn default_lines() -> u32 {
    1
}

/// One element or text run of the measured document.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Element attributes, `data-*` entries included.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
    /// Border box.
    pub bounds: Bounds,
    /// Distance from the top of the border box to the first text baseline.
    #[serde(default)]
    pub baseline: Option<f32>,
    #[serde(default = "default_lines")]
    pub lines: u32,
    /// Preceded by an explicit `<br>`.
    #[serde(default)]
    pub line_break: bool,
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let source = fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read document from '{}': {}", path.as_ref().display(), e),
            ))
        })?;
        Self::from_json(&source)
    }

    fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    fn to_element(&self) -> Result<Element, PipelineError> {
        let bounds = self.bounds;
        if !(bounds.width.is_finite() && bounds.height.is_finite()) || bounds.width < 0.0 || bounds.height < 0.0 {
            return Err(PipelineError::Document(format!(
                "<{}> has invalid bounds {:?}",
                self.tag, bounds
            )));
        }
        let mut element = if self.is_text() {
            Element::text(self.text.clone().unwrap_or_default(), self.style.clone(), bounds.into())
        } else {
            let mut element = Element::new(&self.tag, self.style.clone(), bounds.into());
            element.text = self.text.clone();
            element
        };
        element.element_id = self.id.clone();
        element.attributes = self.attributes.clone();
        element.baseline = self.baseline;
        element.lines = self.lines;
        element.line_break = self.line_break;
        Ok(element)
    }

    /// Builds the arena tree. Margin and content boxes are derived from the
    /// border box and the style while appending.
    pub fn into_tree(&self) -> Result<NodeTree, PipelineError> {
        if self.is_text() {
            return Err(PipelineError::Document("The root cannot be a text run".to_string()));
        }
        let mut tree = NodeTree::new(self.to_element()?);
        let root = tree.root();
        let mut pending: Vec<(NodeId, &DocumentNode)> =
            self.children.iter().rev().map(|c| (root, c)).collect();
        while let Some((parent, node)) = pending.pop() {
            if tree.node(parent).is_plain_text() {
                return Err(PipelineError::Document("Text runs cannot have children".to_string()));
            }
            let id = tree.append(parent, node.to_element()?)?;
            pending.extend(node.children.iter().rev().map(|c| (id, c)));
        }
        log::debug!("Loaded document with {} nodes", tree.len());
        Ok(tree)
    }
}
