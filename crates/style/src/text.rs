use crate::parsers::parse_length;
use anchorage_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
    Justify,
}

impl TextAlign {
    /// Whether the alignment pushes inline content away from the start edge.
    pub fn is_offset(self) -> bool {
        matches!(self, TextAlign::Center | TextAlign::End | TextAlign::Right)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Top,
    Middle,
    Bottom,
    TextTop,
    TextBottom,
    Sub,
    Super,
    Length(f32),
}

impl VerticalAlign {
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "baseline" => Ok(VerticalAlign::Baseline),
            "top" => Ok(VerticalAlign::Top),
            "middle" => Ok(VerticalAlign::Middle),
            "bottom" => Ok(VerticalAlign::Bottom),
            "text-top" => Ok(VerticalAlign::TextTop),
            "text-bottom" => Ok(VerticalAlign::TextBottom),
            "sub" => Ok(VerticalAlign::Sub),
            "super" => Ok(VerticalAlign::Super),
            _ => match parse_length(value) {
                Ok(("", length)) => Ok(VerticalAlign::Length(length)),
                _ => Err(format!("Invalid vertical-align value: {}", value)),
            },
        }
    }

    /// Alignments which shift the box away from the line's baseline.
    pub fn is_shifted(self) -> bool {
        matches!(
            self,
            VerticalAlign::Sub | VerticalAlign::Super | VerticalAlign::Length(_)
        )
    }
}

impl<'de> Deserialize<'de> for VerticalAlign {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum VerticalAlignDef {
            Str(String),
            Num(f32),
        }

        match VerticalAlignDef::deserialize(deserializer)? {
            VerticalAlignDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            VerticalAlignDef::Num(n) => Ok(VerticalAlign::Length(n)),
        }
    }
}

/// A single parsed `text-shadow` layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_align_accepts_keywords_and_lengths() {
        let keyword: VerticalAlign = serde_json::from_str("\"text-bottom\"").unwrap();
        assert_eq!(keyword, VerticalAlign::TextBottom);
        let length: VerticalAlign = serde_json::from_str("\"-4px\"").unwrap();
        assert_eq!(length, VerticalAlign::Length(-4.0));
        assert!(length.is_shifted());
        assert!(serde_json::from_str::<VerticalAlign>("\"sideways\"").is_err());
    }

    #[test]
    fn offset_alignments() {
        assert!(TextAlign::Center.is_offset());
        assert!(TextAlign::Right.is_offset());
        assert!(!TextAlign::Justify.is_offset());
    }
}
