//! The resolved style of one measured element.
//!
//! Values arrive already cascaded; only keywords and lengths the layout
//! translation needs are kept.

use crate::dimension::{edges_shorthand, Dimension, MarginSides};
use crate::flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
use crate::parsers::parse_grid_column_count;
use crate::position::{
    Clear, ColumnSpan, Direction, Display, Float, ObjectFit, Overflow, Position, Visibility,
};
use crate::text::{TextAlign, VerticalAlign};
use anchorage_types::{Color, Edges};
use serde::{Deserialize, Serialize};

fn default_font_size() -> f32 {
    16.0
}

fn default_shrink() -> f32 {
    1.0
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ComputedStyle {
    // Box placement
    pub display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub top: Dimension,
    pub right: Dimension,
    pub bottom: Dimension,
    pub left: Dimension,
    pub z_index: Option<i32>,
    pub visibility: Visibility,
    pub overflow: Overflow,
    pub direction: Direction,

    // Box model
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,
    pub margin: MarginSides,
    #[serde(deserialize_with = "edges_shorthand")]
    pub padding: Edges,
    #[serde(deserialize_with = "edges_shorthand")]
    pub border_width: Edges,
    pub background_color: Option<Color>,
    pub background_image: Option<String>,

    // Inline formatting
    pub vertical_align: VerticalAlign,
    pub text_align: TextAlign,
    pub text_indent: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    pub line_height: Option<f32>,
    pub text_shadow: Option<String>,
    pub object_fit: ObjectFit,

    // Multi-column
    pub column_count: Option<u32>,
    pub column_width: Option<f32>,
    pub column_gap: Option<f32>,
    pub column_span: ColumnSpan,

    // Flexbox
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    pub align_self: AlignSelf,
    pub flex_grow: f32,
    #[serde(default = "default_shrink")]
    pub flex_shrink: f32,
    pub flex_basis: Dimension,
    pub order: i32,

    // Grid
    pub grid_template_columns: Option<String>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            position: Position::default(),
            float: Float::default(),
            clear: Clear::default(),
            top: Dimension::Auto,
            right: Dimension::Auto,
            bottom: Dimension::Auto,
            left: Dimension::Auto,
            z_index: None,
            visibility: Visibility::default(),
            overflow: Overflow::default(),
            direction: Direction::default(),
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_width: Dimension::Auto,
            max_height: Dimension::Auto,
            margin: MarginSides::all(Dimension::Px(0.0)),
            padding: Edges::default(),
            border_width: Edges::default(),
            background_color: None,
            background_image: None,
            vertical_align: VerticalAlign::default(),
            text_align: TextAlign::default(),
            text_indent: 0.0,
            font_size: default_font_size(),
            line_height: None,
            text_shadow: None,
            object_fit: ObjectFit::default(),
            column_count: None,
            column_width: None,
            column_gap: None,
            column_span: ColumnSpan::default(),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            align_self: AlignSelf::default(),
            flex_grow: 0.0,
            flex_shrink: default_shrink(),
            flex_basis: Dimension::Auto,
            order: 0,
            grid_template_columns: None,
        }
    }
}

impl ComputedStyle {
    pub fn is_floating(&self) -> bool {
        self.float != Float::None
    }

    pub fn is_multi_column(&self) -> bool {
        self.column_count.is_some_and(|c| c > 1) || self.column_width.is_some_and(|w| w > 0.0)
    }

    pub fn grid_column_count(&self) -> Option<u32> {
        self.grid_template_columns
            .as_deref()
            .and_then(parse_grid_column_count)
    }

    /// `line-height`, falling back to the conventional 1.2em.
    pub fn resolved_line_height(&self) -> f32 {
        self.line_height.unwrap_or(self.font_size * 1.2)
    }

    pub fn has_offsets(&self) -> bool {
        !(self.top.is_auto() && self.right.is_auto() && self.bottom.is_auto() && self.left.is_auto())
    }

    /// A background, border or box spacing makes an element visible on its own.
    pub fn has_visual_contribution(&self) -> bool {
        self.background_color
            .as_ref()
            .is_some_and(|c| !c.is_transparent())
            || self.background_image.is_some()
            || !self.border_width.is_zero()
            || !self.padding.is_zero()
    }
}
