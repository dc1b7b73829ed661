//! Defines enums for CSS Flexbox layout properties.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    #[default]
    #[serde(alias = "no-wrap")]
    Nowrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn wraps(self) -> bool {
        !matches!(self, FlexWrap::Nowrap)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    #[serde(alias = "start", alias = "normal", alias = "left")]
    FlexStart,
    #[serde(alias = "end", alias = "right")]
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    #[default]
    #[serde(alias = "normal")]
    Stretch,
    #[serde(alias = "start")]
    FlexStart,
    #[serde(alias = "end")]
    FlexEnd,
    Center,
    Baseline,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlignSelf {
    #[default]
    Auto,
    Stretch,
    #[serde(alias = "start")]
    FlexStart,
    #[serde(alias = "end")]
    FlexEnd,
    Center,
    Baseline,
}

impl AlignSelf {
    /// Resolves `auto` against the container's `align-items`.
    pub fn resolve(self, align_items: AlignItems) -> AlignItems {
        match self {
            AlignSelf::Auto => align_items,
            AlignSelf::Stretch => AlignItems::Stretch,
            AlignSelf::FlexStart => AlignItems::FlexStart,
            AlignSelf::FlexEnd => AlignItems::FlexEnd,
            AlignSelf::Center => AlignItems::Center,
            AlignSelf::Baseline => AlignItems::Baseline,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlignContent {
    #[default]
    #[serde(alias = "normal")]
    Stretch,
    #[serde(alias = "start")]
    FlexStart,
    #[serde(alias = "end")]
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_self_auto_inherits_container_alignment() {
        assert_eq!(AlignSelf::Auto.resolve(AlignItems::Center), AlignItems::Center);
        assert_eq!(AlignSelf::FlexEnd.resolve(AlignItems::Center), AlignItems::FlexEnd);
    }

    #[test]
    fn keywords_deserialize_in_kebab_case() {
        let wrap: FlexWrap = serde_json::from_str("\"wrap-reverse\"").unwrap();
        assert_eq!(wrap, FlexWrap::WrapReverse);
        let justify: JustifyContent = serde_json::from_str("\"space-between\"").unwrap();
        assert_eq!(justify, JustifyContent::SpaceBetween);
        assert!(FlexDirection::ColumnReverse.is_reverse());
        assert!(!FlexDirection::ColumnReverse.is_row());
    }
}
