pub mod computed;
pub mod dimension;
pub mod flex;
pub mod parsers;
pub mod position;
pub mod text;

pub use computed::ComputedStyle;
pub use dimension::{Dimension, MarginSides};
pub use flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
pub use parsers::{StyleParseError, parse_text_shadow};
pub use position::{
    Clear, ColumnSpan, Direction, Display, Float, ObjectFit, Overflow, Position, Visibility,
};
pub use text::{TextAlign, TextShadow, VerticalAlign};
