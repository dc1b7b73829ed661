pub mod fixtures;

use anchorage::{Conversion, DocumentNode, PipelineBuilder, PipelineError, RenderOutput};
use anchorage_types::NodeId;
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Converts a JSON document with the default pipeline.
pub fn convert(document: &Value) -> Result<Conversion, PipelineError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let document: DocumentNode = serde_json::from_value(document.clone())?;
    PipelineBuilder::new().build()?.convert(&document)
}

/// Finds a rendered node by the element id given in the document.
pub fn by_id(output: &RenderOutput, id: &str) -> NodeId {
    output
        .find(id)
        .unwrap_or_else(|| panic!("no rendered node with id '{}'", id))
}

/// Attribute value by its qualified name, e.g. `app:layout_constraintTop_toTopOf`.
pub fn attr<'a>(output: &'a RenderOutput, id: &str, name: &str) -> Option<&'a str> {
    let node = by_id(output, id);
    output
        .attributes(node)
        .iter()
        .find(|(key, _)| key.qualified_name() == name)
        .map(|(_, value)| value)
}

/// Control name the node was rendered as.
pub fn control_name(output: &RenderOutput, id: &str) -> String {
    let node = by_id(output, id);
    if output.root() == Some(node) {
        return output.root_template().map(|t| t.control_name.clone()).unwrap_or_default();
    }
    let parent = output
        .tree()
        .node(node)
        .view
        .render_parent
        .unwrap_or_else(|| panic!("'{}' has no render parent", id));
    output
        .children(parent)
        .iter()
        .find(|t| t.node == node)
        .map(|t| t.control_name.clone())
        .unwrap_or_default()
}

/// Ids of the rendered children of `id`, in output order.
pub fn child_ids(output: &RenderOutput, id: &str) -> Vec<String> {
    let node = by_id(output, id);
    output
        .children(node)
        .iter()
        .filter_map(|t| output.tree().document_id(t.node).map(|d| d.to_string()))
        .collect()
}
