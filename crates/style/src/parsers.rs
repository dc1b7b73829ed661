//! Low-level nom parser functions for CSS-like style values.
//!
//! This module provides composable parser functions for parsing style values
//! like lengths, dimensions, colors and text shadows.

use crate::dimension::Dimension;
use crate::text::TextShadow;
use anchorage_types::{Color, Edges};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::error::Error as NomError;
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((
                    take_while_m_n(1, 10, |c: char| c.is_ascii_digit()),
                    opt((
                        char('.'),
                        take_while_m_n(1, 10, |c: char| c.is_ascii_digit()),
                    )),
                )),
                recognize((
                    char('.'),
                    take_while_m_n(1, 10, |c: char| c.is_ascii_digit()),
                )),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    ).parse(input)
}

// --- Unit & Dimension Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("pt"), |_| 96.0 / 72.0),
        map(tag_no_case("in"), |_| 96.0),
        map(tag_no_case("cm"), |_| 96.0 / 2.54),
        map(tag_no_case("mm"), |_| 96.0 / 25.4),
    )).parse(input)
}

/// Parses a length value with optional unit (e.g., "12px", "1in", "10mm") into pixels.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, value * unit_multiplier.unwrap_or(1.0)))
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        map(tag_no_case("auto"), |_| Dimension::Auto),
        map(pair(parse_f32, char('%')), |(val, _)| Dimension::Percent(val)),
        map(parse_length, Dimension::Px),
    )).parse(input)
}

/// Parses CSS shorthand box edges (1 to 4 lengths).
pub fn parse_shorthand_lengths(input: &str) -> Result<Edges, StyleParseError> {
    let parts_res = separated_list1(space1, parse_length).parse(input.trim());

    match parts_res {
        Ok(("", parts)) => match parts.as_slice() {
            [all] => Ok(Edges::all(*all)),
            [y, x] => Ok(Edges::new(*y, *x, *y, *x)),
            [top, x, bottom] => Ok(Edges::new(*top, *x, *bottom, *x)),
            [top, right, bottom, left] => Ok(Edges::new(*top, *right, *bottom, *left)),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for box shorthand: got {}, expected 1 to 4.",
                parts.len()
            ))),
        },
        _ => Err(StyleParseError::Parse(format!(
            "Failed to parse box shorthand value: '{}'",
            input
        ))),
    }
}

// --- Color Parsers ---

fn from_hex(input: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(input, 16)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_primary(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), from_hex).parse(input)
}

fn hex_short(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |s: &str| {
        from_hex(&s.repeat(2))
    }).parse(input)
}

fn hex_color_6(input: &str) -> IResult<&str, Color> {
    map(
        (hex_primary, hex_primary, hex_primary),
        |(r, g, b)| Color { r, g, b, a: 1.0 },
    ).parse(input)
}

fn hex_color_3(input: &str) -> IResult<&str, Color> {
    map((hex_short, hex_short, hex_short), |(r, g, b)| Color {
        r,
        g,
        b,
        a: 1.0,
    }).parse(input)
}

fn rgb_color(input: &str) -> IResult<&str, Color> {
    map_res(
        delimited(
            alt((tag_no_case("rgba("), tag_no_case("rgb("))),
            separated_list1(char(','), ws(parse_f32)),
            char(')'),
        ),
        |channels: Vec<f32>| match channels.as_slice() {
            [r, g, b] => Ok(Color::rgba(*r as u8, *g as u8, *b as u8, 1.0)),
            [r, g, b, a] => Ok(Color::rgba(*r as u8, *g as u8, *b as u8, *a)),
            _ => Err(StyleParseError::Parse(format!(
                "rgb() expects 3 or 4 channels, got {}",
                channels.len()
            ))),
        },
    ).parse(input)
}

fn named_color(input: &str) -> IResult<&str, Color> {
    alt((
        map(tag_no_case("transparent"), |_| Color::rgba(0, 0, 0, 0.0)),
        map(tag_no_case("black"), |_| Color::gray(0)),
        map(tag_no_case("white"), |_| Color::gray(255)),
        map(tag_no_case("gray"), |_| Color::gray(128)),
        map(tag_no_case("red"), |_| Color::rgba(255, 0, 0, 1.0)),
        map(tag_no_case("green"), |_| Color::rgba(0, 128, 0, 1.0)),
        map(tag_no_case("blue"), |_| Color::rgba(0, 0, 255, 1.0)),
    )).parse(input)
}

/// Parses a color: `#RRGGBB`, `#RGB`, `rgb()/rgba()` or a basic color keyword.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((
        preceded(char('#'), alt((hex_color_6, hex_color_3))),
        rgb_color,
        named_color,
    )).parse(input)
}

// --- Text Shadow ---

/// Parses one `text-shadow` layer: `<color>? <x> <y> <blur>? <color>?`.
pub fn parse_shadow_layer(input: &str) -> IResult<&str, TextShadow> {
    let (input, leading) = opt(terminated(parse_color, space1)).parse(input)?;
    let (input, offset_x) = preceded(space0, parse_length).parse(input)?;
    let (input, offset_y) = preceded(space1, parse_length).parse(input)?;
    let (input, blur) = opt(preceded(space1, parse_length)).parse(input)?;
    let (input, trailing) = opt(preceded(space1, parse_color)).parse(input)?;
    let (input, _) = space0(input)?;
    Ok((
        input,
        TextShadow {
            color: leading.or(trailing).unwrap_or_default(),
            offset_x,
            offset_y,
            blur: blur.unwrap_or(0.0),
        },
    ))
}

/// Parses the first layer of a `text-shadow` declaration. `none` yields `None`.
pub fn parse_text_shadow(value: &str) -> Result<Option<TextShadow>, StyleParseError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let mut depth = 0usize;
    let mut end = value.len();
    for (index, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                end = index;
                break;
            }
            _ => {}
        }
    }
    run_parser(parse_shadow_layer, &value[..end]).map(Some)
}

// --- Grid ---

fn grid_repeat(input: &str) -> IResult<&str, u32> {
    preceded(
        tag_no_case("repeat("),
        map_res(ws(digit1), |s: &str| s.parse::<u32>()),
    ).parse(input)
}

/// Counts the tracks of a `grid-template-columns` value.
pub fn parse_grid_column_count(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return None;
    }
    if let Ok((_, count)) = grid_repeat(value) {
        return Some(count).filter(|c| *c > 0);
    }
    let mut depth = 0usize;
    let mut tracks = 0u32;
    let mut in_token = false;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                in_token = false;
                continue;
            }
            _ => {}
        }
        if !in_token {
            tracks += 1;
            in_token = true;
        }
    }
    Some(tracks).filter(|c| *c > 0)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("12px"), Ok(("", 12.0)));
        assert_eq!(parse_length("-3.5"), Ok(("", -3.5)));
        assert_eq!(parse_length("1in"), Ok(("", 96.0)));
        let (_, pt) = parse_length("12pt").unwrap();
        assert!((pt - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("auto"), Ok(("", Dimension::Auto)));
        assert_eq!(parse_dimension("50%"), Ok(("", Dimension::Percent(50.0))));
        assert_eq!(parse_dimension("20px"), Ok(("", Dimension::Px(20.0))));
    }

    #[test]
    fn test_parse_shorthand_lengths() {
        assert_eq!(parse_shorthand_lengths("4px").unwrap(), Edges::all(4.0));
        assert_eq!(
            parse_shorthand_lengths("1px 2px 3px").unwrap(),
            Edges::new(1.0, 2.0, 3.0, 2.0)
        );
        assert!(parse_shorthand_lengths("1px 2px 3px 4px 5px").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0000"), Ok(("", Color::rgba(255, 0, 0, 1.0))));
        assert_eq!(parse_color("#0f0"), Ok(("", Color::rgba(0, 255, 0, 1.0))));
        assert_eq!(
            parse_color("rgba(0, 0, 255, 0.5)"),
            Ok(("", Color::rgba(0, 0, 255, 0.5)))
        );
        assert!(parse_color("#GG0000").is_err());
    }

    #[test]
    fn test_text_shadow_with_leading_color() {
        let shadow = parse_text_shadow("#333 1px 2px 3px").unwrap().unwrap();
        assert_eq!(shadow.color, Color::gray(0x33));
        assert_eq!(shadow.offset_x, 1.0);
        assert_eq!(shadow.offset_y, 2.0);
        assert_eq!(shadow.blur, 3.0);
    }

    #[test]
    fn test_text_shadow_trailing_color_and_layers() {
        let shadow = parse_text_shadow("2px -1px rgb(10, 20, 30), 1px 1px red")
            .unwrap()
            .unwrap();
        assert_eq!(shadow.color, Color::rgba(10, 20, 30, 1.0));
        assert_eq!(shadow.offset_y, -1.0);
        assert_eq!(shadow.blur, 0.0);
        assert!(parse_text_shadow("none").unwrap().is_none());
        assert!(parse_text_shadow("big shadow").is_err());
    }

    #[test]
    fn test_grid_column_count() {
        assert_eq!(parse_grid_column_count("repeat(3, 1fr)"), Some(3));
        assert_eq!(parse_grid_column_count("100px minmax(10px, 1fr) auto"), Some(3));
        assert_eq!(parse_grid_column_count("none"), None);
    }
}
