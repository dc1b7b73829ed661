//! Measured elements and the mutable view state the engine attaches to them.

use crate::anchor::AnchorState;
use crate::attributes::AttributeBag;
use crate::flags::Alignment;
use crate::node_kind::ContainerType;
use anchorage_style::{ComputedStyle, Display, Float, Position, TextAlign, VerticalAlign};
use anchorage_style::dimension::Dimension;
use anchorage_types::{BoxRect, DocumentId, Edge, Edges, NodeId};
use std::collections::BTreeMap;

/// Tag given to text runs.
pub const TEXT_TAG: &str = "#text";

/// One measured box of the source document.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Upper-case element name, or `#text` for text runs.
    pub tag: String,
    pub element_id: Option<String>,
    pub text: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: ComputedStyle,
    /// Border box.
    pub bounds: BoxRect,
    /// Margin box.
    pub linear: BoxRect,
    /// Content box.
    pub content: BoxRect,
    /// Margins resolved to px. Auto margins take the space they occupy.
    pub margin: Edges,
    /// Distance from the top of the border box to the first baseline.
    pub baseline: Option<f32>,
    pub lines: u32,
    /// Preceded by an explicit line break.
    pub line_break: bool,
    /// Own `position: relative` shift, removed from the measured boxes.
    pub offset: (f32, f32),
}

impl Element {
    pub fn new(tag: impl Into<String>, style: ComputedStyle, bounds: BoxRect) -> Self {
        Self {
            tag: tag.into().to_ascii_uppercase(),
            style,
            bounds,
            linear: bounds,
            content: bounds,
            lines: 1,
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>, style: ComputedStyle, bounds: BoxRect) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text.into()),
            style: ComputedStyle {
                display: Display::Inline,
                ..style
            },
            bounds,
            linear: bounds,
            content: bounds,
            lines: 1,
            ..Default::default()
        }
    }

    /// Moves the border box back to its static position.
    ///
    /// `inherited` is the shift of the ancestors, which the measured bounds
    /// already contain.
    pub fn remove_relative_offset(&mut self, container: Option<&BoxRect>, inherited: (f32, f32)) {
        let style = &self.style;
        let mut own = (0.0, 0.0);
        if style.position == Position::Relative {
            let width = container.map(|c| c.width).unwrap_or(0.0);
            let height = container.map(|c| c.height).unwrap_or(0.0);
            own.0 = match (style.left.resolve(width), style.right.resolve(width)) {
                (Some(left), _) => left,
                (None, Some(right)) => -right,
                _ => 0.0,
            };
            own.1 = match (style.top.resolve(height), style.bottom.resolve(height)) {
                (Some(top), _) => top,
                (None, Some(bottom)) => -bottom,
                _ => 0.0,
            };
        }
        self.offset = own;
        let (dx, dy) = (own.0 + inherited.0, own.1 + inherited.1);
        if dx != 0.0 || dy != 0.0 {
            self.bounds = self.bounds.translate(-dx, -dy);
        }
    }

    /// Derives the margin and content boxes from the border box.
    ///
    /// `container` is the content box of the parent, used to resolve
    /// percentage and auto margins.
    pub fn resolve_boxes(&mut self, container: Option<&BoxRect>) {
        let base = container.map(|c| c.width).unwrap_or(self.bounds.width);
        let style_margin = self.style.margin;
        let resolve = |dimension: Dimension, edge: Edge| -> f32 {
            match dimension {
                Dimension::Px(v) => v,
                Dimension::Percent(_) => dimension.resolve(base).unwrap_or(0.0),
                Dimension::Auto => match (container, edge) {
                    (Some(c), Edge::Left) => (self.bounds.left - c.left).max(0.0),
                    (Some(c), Edge::Right) => (c.right - self.bounds.right).max(0.0),
                    _ => 0.0,
                },
            }
        };
        self.margin = Edges::new(
            resolve(style_margin.top, Edge::Top),
            resolve(style_margin.right, Edge::Right),
            resolve(style_margin.bottom, Edge::Bottom),
            resolve(style_margin.left, Edge::Left),
        );
        self.linear = self.bounds.expand(&self.margin);
        let mut inset = self.style.padding;
        inset.top += self.style.border_width.top;
        inset.right += self.style.border_width.right;
        inset.bottom += self.style.border_width.bottom;
        inset.left += self.style.border_width.left;
        self.content = self.bounds.shrink(&inset);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticKind {
    Group,
    Wrapper,
    Guideline,
    Barrier,
    Space,
}

/// Spacing deltas applied on top of the measured box model when the final
/// margin and padding attributes are written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxAdjustment {
    pub margin: Edges,
    pub padding: Edges,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub document_id: Option<DocumentId>,
    pub container_type: ContainerType,
    pub alignment: Alignment,
    /// Alignment a synthetic group was created with.
    pub hint: Alignment,
    pub render_parent: Option<NodeId>,
    pub rendered: bool,
    pub hidden: bool,
    /// Placed by the absolute pass; skipped by the flow pass.
    pub positioned: bool,
    pub inner_wrapped: Option<NodeId>,
    pub outer_wrapper: Option<NodeId>,
    /// Text taken over from a consumed child.
    pub inline_text: Option<String>,
    pub attributes: AttributeBag,
    pub constraint: AnchorState,
    pub box_adjustment: BoxAdjustment,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub element: Element,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Document order among siblings.
    pub sibling_index: usize,
    pub depth: usize,
    pub synthetic: Option<SyntheticKind>,
    pub view: ViewState,
}

/// Which margins of a node are `auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoMargin {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl AutoMargin {
    pub fn horizontal(&self) -> bool {
        self.left && self.right
    }

    pub fn left_only(&self) -> bool {
        self.left && !self.right
    }

    pub fn right_only(&self) -> bool {
        self.right && !self.left
    }

    pub fn any_horizontal(&self) -> bool {
        self.left || self.right
    }
}

impl Node {
    pub fn style(&self) -> &ComputedStyle {
        &self.element.style
    }

    pub fn bounds(&self) -> &BoxRect {
        &self.element.bounds
    }

    pub fn linear(&self) -> &BoxRect {
        &self.element.linear
    }

    pub fn content_box(&self) -> &BoxRect {
        &self.element.content
    }

    pub fn tag(&self) -> &str {
        &self.element.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element.attributes.get(name).map(String::as_str)
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic.is_some()
    }

    pub fn is_group(&self) -> bool {
        self.synthetic == Some(SyntheticKind::Group)
    }

    /// A run of text without element wrapping.
    pub fn is_plain_text(&self) -> bool {
        self.element.tag == TEXT_TAG
    }

    /// Text content, either measured or taken over from a consumed child.
    pub fn text_content(&self) -> Option<&str> {
        self.view
            .inline_text
            .as_deref()
            .or(self.element.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_image(&self) -> bool {
        match self.tag() {
            "IMG" | "SVG" | "PICTURE" => true,
            "INPUT" => self.input_type() == "image",
            _ => false,
        }
    }

    /// Form controls rendered as native input widgets.
    pub fn is_input(&self) -> bool {
        matches!(self.tag(), "INPUT" | "SELECT" | "TEXTAREA" | "BUTTON")
    }

    pub fn input_type(&self) -> String {
        self.attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    }

    pub fn is_heading(&self) -> bool {
        let tag = self.tag().as_bytes();
        tag.len() == 2 && tag[0] == b'H' && (b'1'..=b'6').contains(&tag[1])
    }

    /// Removed from rendering while still signalling a flow break.
    pub fn excluded(&self) -> bool {
        matches!(self.tag(), "BR" | "WBR")
    }

    pub fn visible(&self) -> bool {
        self.element.style.display != Display::None && !self.view.hidden
    }

    pub fn page_flow(&self) -> bool {
        !self.element.style.position.is_out_of_flow()
    }

    pub fn floating(&self) -> bool {
        self.page_flow() && self.element.style.is_floating()
    }

    pub fn float(&self) -> Float {
        if self.page_flow() {
            self.element.style.float
        } else {
            Float::None
        }
    }

    pub fn block_statically(&self) -> bool {
        self.page_flow()
            && !self.floating()
            && (self.element.style.display.is_block_level() || self.is_group())
    }

    pub fn inline_flow(&self) -> bool {
        self.page_flow()
            && !self.floating()
            && (self.is_plain_text() || self.element.style.display.is_inline_level())
    }

    pub fn position_relative(&self) -> bool {
        self.element.style.position == Position::Relative && self.element.style.has_offsets()
    }

    pub fn auto_margin(&self) -> AutoMargin {
        let margin = &self.element.style.margin;
        AutoMargin {
            left: margin.left.is_auto(),
            right: margin.right.is_auto(),
            top: margin.top.is_auto(),
            bottom: margin.bottom.is_auto(),
        }
    }

    pub fn has_width(&self) -> bool {
        !self.element.style.width.is_auto()
    }

    pub fn has_height(&self) -> bool {
        !self.element.style.height.is_auto()
    }

    pub fn percent_width(&self) -> bool {
        self.element.style.width.is_percent()
    }

    /// Sits on the line's baseline.
    pub fn has_baseline(&self) -> bool {
        self.element.baseline.is_some()
            && self.element.style.vertical_align == VerticalAlign::Baseline
            && !self.floating()
    }

    /// Absolute distance from the document top to the first baseline.
    pub fn baseline_position(&self) -> Option<f32> {
        self.element.baseline.map(|b| self.element.bounds.top + b)
    }

    pub fn multiline(&self) -> bool {
        self.element.lines > 1
    }

    /// Not shifted towards negative coordinates by offsets or margins.
    pub fn positive_axis(&self) -> bool {
        let style = &self.element.style;
        let offsets_positive = !self.position_relative()
            || (style.top.px().is_none_or(|v| v >= 0.0) && style.left.px().is_none_or(|v| v >= 0.0));
        offsets_positive && self.element.margin.top >= 0.0 && self.element.margin.left >= 0.0
    }

    pub fn dataset(&self) -> impl Iterator<Item = (&str, &str)> {
        self.element
            .attributes
            .iter()
            .filter_map(|(k, v)| k.strip_prefix("data-").map(|name| (name, v.as_str())))
    }

    /// Whether removing the element would change what is drawn or where.
    pub fn has_visual_attributes(&self) -> bool {
        let style = &self.element.style;
        !self.element.margin.is_zero()
            || style.has_visual_contribution()
            || self.has_width()
            || self.has_height()
            || style.text_align.is_offset()
            || style.text_align == TextAlign::Justify
            || self.position_relative()
            || self.dataset().next().is_some()
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.view.document_id.as_ref()
    }

    pub fn container_type(&self) -> ContainerType {
        self.view.container_type
    }

    /// The text direction of the element is right-to-left.
    pub fn rtl(&self) -> bool {
        self.element.style.direction == anchorage_style::Direction::Rtl
    }
}
