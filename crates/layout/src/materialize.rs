//! Turns classified layouts into render templates.
//!
//! Materializing a node fixes its control, output id and render parent, and
//! writes every attribute that depends only on the element itself: text,
//! images, form control state, visibility and backgrounds. Placement is left
//! to the container passes.

use crate::LayoutError;
use crate::attributes::AttributeKey;
use crate::context::LayoutContext;
use crate::edit::StructuralEdit;
use crate::flags::Alignment;
use crate::layout::Layout;
use crate::node::{Node, SyntheticKind};
use crate::node_kind::ContainerType;
use crate::template::{RenderTemplate, TemplateKind};
use crate::tree::NodeTree;
use crate::util::{format_px, truncate};
use anchorage_style::{ComputedStyle, ObjectFit, Visibility, parse_text_shadow};
use anchorage_traits::ResourceKind;
use anchorage_types::{BoxRect, Edge, NodeId};
use log::{debug, warn};

/// Materializes a container. A layout left without children renders as a
/// plain widget.
pub fn materialize_group(ctx: &mut LayoutContext<'_>, layout: &Layout) -> Result<RenderTemplate, LayoutError> {
    if layout.is_empty() {
        return materialize_leaf(ctx, layout);
    }
    let template = render(ctx, layout)?;
    let id = layout.node;
    match layout.container_type {
        ContainerType::Linear => {
            let orientation = if layout.has_align(Alignment::HORIZONTAL) {
                "horizontal"
            } else {
                "vertical"
            };
            ctx.set_attr(id, AttributeKey::Orientation, orientation, true);
        }
        ContainerType::Grid => {
            if let Some(count) = ctx.node(id).style().grid_column_count() {
                ctx.set_attr(id, AttributeKey::ColumnCount, count.to_string(), true);
            }
        }
        ContainerType::Text => apply_text(ctx, id),
        _ => {}
    }
    Ok(template)
}

/// Materializes a widget.
pub fn materialize_leaf(ctx: &mut LayoutContext<'_>, layout: &Layout) -> Result<RenderTemplate, LayoutError> {
    let template = render(ctx, layout)?;
    let id = layout.node;
    match layout.container_type {
        ContainerType::Text => apply_text(ctx, id),
        ContainerType::Image => apply_image(ctx, id),
        ContainerType::Edit => apply_edit(ctx, id),
        ContainerType::Checkbox | ContainerType::Radio => {
            if ctx.node(id).attribute("checked").is_some() {
                ctx.set_attr(id, AttributeKey::Checked, "true", true);
            }
        }
        ContainerType::Button => {
            let label = ctx
                .node(id)
                .attribute("value")
                .map(str::to_string)
                .or_else(|| ctx.node(id).text_content().map(str::to_string));
            if let Some(label) = label {
                set_string(ctx, id, AttributeKey::Text, &label);
            }
        }
        _ => {}
    }
    Ok(template)
}

fn render(ctx: &mut LayoutContext<'_>, layout: &Layout) -> Result<RenderTemplate, LayoutError> {
    if !layout.is_typed() {
        return Err(LayoutError::ContainerTypeUnset(layout.node));
    }
    let id = layout.node;
    let container = layout.container_type;
    {
        let view = ctx.view_mut(id);
        view.container_type = container;
        view.alignment = layout.alignment | view.hint;
        view.render_parent = layout.parent;
        view.rendered = true;
    }
    let document_id = ctx.assign_document_id(id, container);
    apply_common(ctx, id);
    let template = RenderTemplate {
        kind: template_kind(ctx.node(id)),
        node: id,
        control_name: container.control_name().to_string(),
    };
    ctx.templates.push(layout.parent, template.clone())?;
    debug!(
        "Rendered {} as {} '{}' under {:?}",
        id, template.control_name, document_id, layout.parent
    );
    Ok(template)
}

/// `data-include` moves the element into its own layout file;
/// `data-include-merge="true"` writes only its children there.
fn template_kind(node: &Node) -> TemplateKind {
    let mut include = false;
    let mut merge = false;
    for (name, value) in node.dataset() {
        match name {
            "include" => include = !value.trim().is_empty(),
            "include-merge" => merge = value.trim() == "true",
            _ => {}
        }
    }
    match (include, merge) {
        (true, true) => TemplateKind::Merge,
        (true, false) => TemplateKind::Include,
        _ => TemplateKind::Xml,
    }
}

fn apply_common(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let style = ctx.node(id).style().clone();
    if style.visibility != Visibility::Visible {
        ctx.set_attr(id, AttributeKey::Visibility, "invisible", true);
    }
    if let Some(color) = style.background_color.filter(|c| !c.is_transparent()) {
        let hex = color.to_hex();
        let hint = format!("color_{}", hex.trim_start_matches('#'));
        if let Some(reference) = ctx.add_resource(ResourceKind::Color, &hint, &hex) {
            ctx.set_attr(id, AttributeKey::Background, reference, true);
        }
    } else if let Some(image) = style.background_image.as_deref().and_then(image_url) {
        let hint = file_stem(image);
        if let Some(reference) = ctx.add_resource(ResourceKind::Drawable, &hint, image) {
            ctx.set_attr(id, AttributeKey::Background, reference, true);
        }
    }
    let legend_offset = {
        let node = ctx.node(id);
        node.parent
            .map(|p| ctx.node(p))
            .filter(|p| node.tag() == "LEGEND" && p.tag() == "FIELDSET")
            .map(|p| p.style().padding.top)
    };
    if let Some(offset) = legend_offset {
        ctx.adjust_margin(id, Edge::Bottom, offset);
    }
}

fn set_string(ctx: &mut LayoutContext<'_>, id: NodeId, key: AttributeKey, value: &str) {
    if let Some(reference) = ctx.add_resource(ResourceKind::String, value, value) {
        ctx.set_attr(id, key, reference, true);
    }
}

fn apply_text(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let Some(text) = ctx.node(id).text_content().map(|t| t.trim().to_string()) else {
        return;
    };
    set_string(ctx, id, AttributeKey::Text, &text);
    let Some(declaration) = ctx.node(id).style().text_shadow.clone() else {
        return;
    };
    match parse_text_shadow(&declaration) {
        Ok(Some(shadow)) => {
            let decimals = ctx.config.decimal_places;
            ctx.set_attr(id, AttributeKey::ShadowColor, shadow.color.to_hex(), true);
            ctx.set_attr(id, AttributeKey::ShadowDx, truncate(shadow.offset_x, decimals), true);
            ctx.set_attr(id, AttributeKey::ShadowDy, truncate(shadow.offset_y, decimals), true);
            // A zero radius disables the shadow on the target platform.
            let radius = if shadow.blur > 0.0 { shadow.blur } else { 0.01 };
            ctx.set_attr(id, AttributeKey::ShadowRadius, truncate(radius, decimals), true);
        }
        Ok(None) => {}
        Err(e) => warn!("Ignoring text-shadow '{}' of {}: {}", declaration, id, e),
    }
}

fn scale_type(fit: ObjectFit) -> &'static str {
    match fit {
        ObjectFit::Fill => "fitXY",
        ObjectFit::Contain => "fitCenter",
        ObjectFit::Cover => "centerCrop",
        ObjectFit::None => "center",
        ObjectFit::ScaleDown => "centerInside",
    }
}

fn apply_image(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let node = ctx.node(id);
    let src = node.attribute("src").map(str::to_string);
    let alt = node.attribute("alt").map(str::to_string);
    let fit = node.style().object_fit;
    let keeps_ratio = node.has_width() != node.has_height();
    if let Some(src) = src.filter(|s| !s.trim().is_empty()) {
        let hint = file_stem(&src);
        if let Some(reference) = ctx.add_resource(ResourceKind::Drawable, &hint, &src) {
            ctx.set_attr(id, AttributeKey::Src, reference, true);
        }
    }
    ctx.set_attr(id, AttributeKey::ScaleType, scale_type(fit), true);
    if keeps_ratio {
        ctx.set_attr(id, AttributeKey::AdjustViewBounds, "true", true);
    }
    if let Some(alt) = alt.filter(|a| !a.trim().is_empty()) {
        set_string(ctx, id, AttributeKey::ContentDescription, &alt);
    }
}

fn input_type(html: &str) -> &'static str {
    match html {
        "password" => "textPassword",
        "email" => "textEmailAddress",
        "number" => "number",
        "tel" => "phone",
        "url" => "textUri",
        "date" => "date",
        "time" => "time",
        "datetime-local" => "datetime",
        _ => "text",
    }
}

fn apply_edit(ctx: &mut LayoutContext<'_>, id: NodeId) {
    let node = ctx.node(id);
    let textarea = node.tag() == "TEXTAREA";
    let kind = if textarea {
        "textMultiLine"
    } else {
        input_type(&node.input_type())
    };
    let rows = node
        .attribute("rows")
        .and_then(|r| r.trim().parse::<u32>().ok())
        .unwrap_or(2);
    let placeholder = node.attribute("placeholder").map(str::to_string);
    let value = node
        .attribute("value")
        .map(str::to_string)
        .or_else(|| node.text_content().map(str::to_string));
    ctx.set_attr(id, AttributeKey::InputType, kind, true);
    if textarea {
        ctx.set_attr(id, AttributeKey::MinLines, rows.to_string(), true);
    }
    if let Some(placeholder) = placeholder.filter(|p| !p.trim().is_empty()) {
        set_string(ctx, id, AttributeKey::Hint, &placeholder);
    }
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        set_string(ctx, id, AttributeKey::Text, &value);
    }
}

fn image_url(value: &str) -> Option<&str> {
    let value = value.trim();
    let inner = value.strip_prefix("url(")?.strip_suffix(')')?;
    let inner = inner.trim().trim_matches(|c| c == '"' || c == '\'');
    (!inner.is_empty()).then_some(inner)
}

fn file_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = name.split(['.', '?', '#']).next().unwrap_or(name);
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem.to_string()
    }
}

/// An image shifted out of the top or left of a clipping parent is wrapped in
/// a frame the size of its visible part.
pub fn image_wrapper_edit(tree: &NodeTree, id: NodeId) -> Option<StructuralEdit> {
    let node = tree.node(id);
    if !node.is_image() || node.view.outer_wrapper.is_some() {
        return None;
    }
    let parent = tree.node(node.parent?);
    if !parent.style().overflow.clips() {
        return None;
    }
    let clip = parent.bounds().shrink(&parent.style().border_width);
    let bounds = node.bounds();
    if bounds.left >= clip.left && bounds.top >= clip.top {
        return None;
    }
    let visible = bounds.intersection(&clip)?;
    Some(StructuralEdit::InsertWrapper {
        node: id,
        bounds: visible,
        alignment: Alignment::SINGLE,
    })
}

/// Gives a wrapper frame the fixed size of the visible area it shows.
pub fn size_wrapper(ctx: &mut LayoutContext<'_>, wrapper: NodeId) {
    let bounds = *ctx.node(wrapper).bounds();
    ctx.set_attr(wrapper, AttributeKey::LayoutWidth, format_px(bounds.width), true);
    ctx.set_attr(wrapper, AttributeKey::LayoutHeight, format_px(bounds.height), true);
}

/// A helper view created by a placement pass rather than by the document.
#[derive(Debug, Clone)]
pub struct StaticNode {
    pub container: ContainerType,
    pub bounds: BoxRect,
    pub width: String,
    pub height: String,
    pub attributes: Vec<(AttributeKey, String)>,
}

impl StaticNode {
    pub fn new(container: ContainerType, bounds: BoxRect) -> Self {
        Self {
            container,
            bounds,
            width: "wrap_content".to_string(),
            height: "wrap_content".to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }
}

/// Renders a helper view as the last child of `parent`.
pub fn render_node_static(
    ctx: &mut LayoutContext<'_>,
    parent: NodeId,
    helper: StaticNode,
) -> Result<NodeId, LayoutError> {
    let kind = match helper.container {
        ContainerType::Guideline => SyntheticKind::Guideline,
        ContainerType::Barrier => SyntheticKind::Barrier,
        _ => SyntheticKind::Space,
    };
    let tag = format!("#{}", helper.container.as_str());
    let id = ctx
        .tree
        .push_synthetic(kind, &tag, Some(parent), helper.bounds, ComputedStyle::default());
    {
        let view = ctx.view_mut(id);
        view.container_type = helper.container;
        view.render_parent = Some(parent);
        view.rendered = true;
    }
    ctx.assign_document_id(id, helper.container);
    ctx.set_attr(id, AttributeKey::LayoutWidth, helper.width, true);
    ctx.set_attr(id, AttributeKey::LayoutHeight, helper.height, true);
    for (key, value) in helper.attributes {
        ctx.set_attr(id, key, value, true);
    }
    ctx.templates.push(
        Some(parent),
        RenderTemplate::xml(id, helper.container.control_name()),
    )?;
    Ok(id)
}
