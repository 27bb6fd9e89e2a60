//! Hold-color decoding.
//!
//! Route exports describe the paint marking a route as a comma separated list
//! such as `"#ff0000, #00ff00"`. Only the first two entries matter for the
//! printed topo: the first fills the cell, the second is drawn as a diagonal.

use std::fmt;

use crate::error::{Result, ToolError};
use crate::model::ColorSpec;

const NAMED_COLORS: [(&str, u32); 17] = [
    ("black", 0x000000),
    ("blue", 0x0000FF),
    ("brown", 0x800000),
    ("cyan", 0x00FFFF),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("magenta", 0xFF00FF),
    ("navy", 0x000080),
    ("orange", 0xFF6600),
    ("pink", 0xFF00FF),
    ("purple", 0x800080),
    ("red", 0xFF0000),
    ("silver", 0xC0C0C0),
    ("white", 0xFFFFFF),
    ("yellow", 0xFFFF00),
];

/// A validated RGB cell color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoldColor(u32);

impl HoldColor {
    /// Parses `#RRGGBB`, `RRGGBB` or one of the basic color names
    /// (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let hex = token.strip_prefix('#').unwrap_or(token);
        if hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().map(HoldColor);
        }

        let lowered = token.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, rgb)| HoldColor(*rgb))
    }

    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HoldColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Splits a raw encoding into its primary and optional secondary color.
///
/// Tokens are trimmed. An empty first token is replaced by `default_color`.
/// The secondary is present as soon as a second token exists, even an empty
/// one; anything after the second token is ignored.
pub fn decode(raw: &str, default_color: &str) -> ColorSpec {
    let mut tokens = raw.split(',').map(str::trim);

    let primary = match tokens.next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => default_color.to_string(),
    };
    let secondary = tokens.next().map(str::to_string);

    ColorSpec { primary, secondary }
}

/// Converts a decoded spec into cell colors.
///
/// `row` is the 1-based source row, reported when a token is not a color.
pub fn resolve(spec: &ColorSpec, row: usize) -> Result<(HoldColor, Option<HoldColor>)> {
    let background = parse_token(&spec.primary, row)?;
    let diagonal = spec
        .diagonal()
        .map(|token| parse_token(token, row))
        .transpose()?;
    Ok((background, diagonal))
}

fn parse_token(token: &str, row: usize) -> Result<HoldColor> {
    HoldColor::parse(token).ok_or_else(|| ToolError::InvalidEncoding {
        row,
        token: token.to_string(),
    })
}
