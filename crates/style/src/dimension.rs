//! Defines primitives for lengths, percentages and box-edge shorthands.
use crate::parsers::{parse_dimension, parse_shorthand_lengths, run_parser};
use anchorage_types::Edges;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Px(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Dimension::Px(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Percent(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Auto => {
                2u8.hash(state);
            }
        }
    }
}

impl Eq for Dimension {}

impl Dimension {
    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Dimension::Percent(_))
    }

    pub fn is_length(&self) -> bool {
        matches!(self, Dimension::Px(_))
    }

    pub fn px(&self) -> Option<f32> {
        match self {
            Dimension::Px(v) => Some(*v),
            _ => None,
        }
    }

    /// Fraction in `0..=1` for percentage values.
    pub fn fraction(&self) -> Option<f32> {
        match self {
            Dimension::Percent(v) => Some(*v / 100.0),
            _ => None,
        }
    }

    /// Resolves against a containing block size. `auto` resolves to `None`.
    pub fn resolve(&self, base: f32) -> Option<f32> {
        match self {
            Dimension::Px(v) => Some(*v),
            Dimension::Percent(v) => Some(base * *v / 100.0),
            Dimension::Auto => None,
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DimensionDef {
            Str(String),
            Num(f32),
        }

        match DimensionDef::deserialize(deserializer)? {
            DimensionDef::Str(s) => {
                run_parser(parse_dimension, &s).map_err(de::Error::custom)
            }
            DimensionDef::Num(n) => Ok(Dimension::Px(n)),
        }
    }
}

/// Margins keep their `auto` keyword; resolved pixel values live on the node.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarginSides {
    pub top: Dimension,
    pub right: Dimension,
    pub bottom: Dimension,
    pub left: Dimension,
}

impl MarginSides {
    pub fn all(value: Dimension) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn auto_horizontal(&self) -> bool {
        self.left.is_auto() && self.right.is_auto()
    }

    pub fn auto_vertical(&self) -> bool {
        self.top.is_auto() && self.bottom.is_auto()
    }

    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let mut values = Vec::new();
        for part in input.split_whitespace() {
            values.push(run_parser(parse_dimension, part).map_err(|e| e.to_string())?);
        }
        match values.as_slice() {
            [all] => Ok(Self::all(*all)),
            [y, x] => Ok(Self {
                top: *y,
                right: *x,
                bottom: *y,
                left: *x,
            }),
            [top, x, bottom] => Ok(Self {
                top: *top,
                right: *x,
                bottom: *bottom,
                left: *x,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1 to 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for MarginSides {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginDef {
            Str(String),
            Num(f32),
            Map {
                #[serde(default)]
                top: Dimension,
                #[serde(default)]
                right: Dimension,
                #[serde(default)]
                bottom: Dimension,
                #[serde(default)]
                left: Dimension,
            },
        }

        match MarginDef::deserialize(deserializer)? {
            MarginDef::Str(s) => Self::parse_shorthand(&s).map_err(de::Error::custom),
            MarginDef::Num(n) => Ok(Self::all(Dimension::Px(n))),
            MarginDef::Map {
                top,
                right,
                bottom,
                left,
            } => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
        }
    }
}

/// `deserialize_with` helper accepting `"4px 8px"`, a number, or an edge map.
pub fn edges_shorthand<'de, D>(deserializer: D) -> Result<Edges, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EdgesDef {
        Str(String),
        Num(f32),
        Map(Edges),
    }

    match EdgesDef::deserialize(deserializer)? {
        EdgesDef::Str(s) => parse_shorthand_lengths(&s).map_err(de::Error::custom),
        EdgesDef::Num(n) => Ok(Edges::all(n)),
        EdgesDef::Map(edges) => Ok(edges),
    }
}
