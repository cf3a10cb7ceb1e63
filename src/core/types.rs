//! Value types shared by the fetch, compose, and execution stages.

use crate::core::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The placeholder substituted with an item identifier.
pub const PLACEHOLDER: &str = "{name}";

/// One entry of a batch: the identifier substituted into the URL template
/// and used as the output file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRequest {
    identifier: String,
}

impl ItemRequest {
    /// Create a request for the given identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// The identifier as supplied by the caller.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for ItemRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl From<&str> for ItemRequest {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<String> for ItemRequest {
    fn from(identifier: String) -> Self {
        Self::new(identifier)
    }
}

/// Parse free-form text into item requests.
///
/// One identifier per line; surrounding whitespace is trimmed and blank
/// lines are dropped. Order and duplicates are preserved.
pub fn parse_item_list(text: &str) -> Vec<ItemRequest> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ItemRequest::new)
        .collect()
}

/// A URL with a single `{name}` placeholder for the item identifier.
///
/// The template is stored as given; placeholder problems surface when a URL
/// is rendered, so one bad template fails each item instead of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Wrap a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of `{name}` placeholders in the template.
    pub fn placeholder_count(&self) -> usize {
        self.0.matches(PLACEHOLDER).count()
    }

    /// Check that the template has exactly one placeholder.
    pub fn check(&self) -> Result<(), TemplateError> {
        match self.placeholder_count() {
            0 => Err(TemplateError::MissingPlaceholder),
            1 => Ok(()),
            n => Err(TemplateError::MultiplePlaceholders(n)),
        }
    }

    /// Substitute `identifier` into the placeholder.
    ///
    /// Pure string substitution: the identifier is inserted verbatim with no
    /// percent-encoding. A blank identifier is rejected.
    pub fn render(&self, identifier: &str) -> Result<String, TemplateError> {
        self.check()?;
        if identifier.trim().is_empty() {
            return Err(TemplateError::EmptyIdentifier);
        }
        Ok(self.0.replacen(PLACEHOLDER, identifier, 1))
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square size.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Whether either axis is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether this size fits inside `other` on both axes.
    pub fn fits_within(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = String;

    /// Parse `WxH`, e.g. `350x350`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid size '{}': expected WxH", s))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("Invalid width in '{}'", s))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("Invalid height in '{}'", s))?;
        Ok(Self::new(width, height))
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha channel (0 = fully transparent, 255 = fully opaque).
    pub a: u8,
}

impl Color {
    /// Create a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB components (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex color string.
    ///
    /// Supports formats: "#RGB", "#RGBA", "#RRGGBB", "#RRGGBBAA"
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim_start_matches('#');
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|e| e.to_string())
        };
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());

        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: {}", hex));
        }

        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(format!(
                "Invalid hex color format: expected 3, 4, 6, or 8 characters, got {}",
                hex.len()
            )),
        }
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to image crate's Rgba type.
    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent black, the default padding.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse `#RRGGBBAA`-style hex or a comma separated `r,g,b[,a]` list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }

        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<u8>()
                    .map_err(|_| format!("Invalid color component '{}' (expected 0-255)", p.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
            _ => Err(format!(
                "Invalid color '{}': expected r,g,b or r,g,b,a or a hex color",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_identifier() {
        let template = UrlTemplate::new("https://cdn.example.com/png/{name}.png");
        assert_eq!(
            template.render("25").unwrap(),
            "https://cdn.example.com/png/25.png"
        );
    }

    #[test]
    fn test_render_does_not_escape() {
        let template = UrlTemplate::new("https://cdn.example.com/{name}.png");
        assert_eq!(
            template.render("a b/c").unwrap(),
            "https://cdn.example.com/a b/c.png"
        );
    }

    #[test]
    fn test_render_placeholder_errors() {
        let missing = UrlTemplate::new("https://cdn.example.com/static.png");
        assert_eq!(missing.render("1"), Err(TemplateError::MissingPlaceholder));

        let double = UrlTemplate::new("https://{name}.example.com/{name}.png");
        assert_eq!(double.render("1"), Err(TemplateError::MultiplePlaceholders(2)));
    }

    #[test]
    fn test_render_rejects_blank_identifier() {
        let template = UrlTemplate::new("https://cdn.example.com/{name}.png");
        assert_eq!(template.render(""), Err(TemplateError::EmptyIdentifier));
        assert_eq!(template.render("  \t"), Err(TemplateError::EmptyIdentifier));
    }

    #[test]
    fn test_parse_item_list() {
        let items = parse_item_list("  1\n\n4 \n\t7\n   \n25\n4");
        let ids: Vec<_> = items.iter().map(|i| i.identifier()).collect();
        assert_eq!(ids, vec!["1", "4", "7", "25", "4"]);
        assert!(parse_item_list("\n  \n").is_empty());
    }

    #[test]
    fn test_size_parsing() {
        assert_eq!("350x350".parse::<Size>().unwrap(), Size::square(350));
        assert_eq!("640X480".parse::<Size>().unwrap(), Size::new(640, 480));
        assert!("350".parse::<Size>().is_err());
        assert!("ax1".parse::<Size>().is_err());
        assert!(Size::new(0, 4).is_empty());
        assert!(Size::square(250).fits_within(Size::square(350)));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("0,0,0,0".parse::<Color>().unwrap(), Color::TRANSPARENT);
        assert_eq!("255, 0, 0".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            "#FF000080".parse::<Color>().unwrap(),
            Color::new(255, 0, 0, 128)
        );
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert!("256,0,0".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert_eq!(Color::new(255, 0, 0, 128).to_hex(), "#FF000080");
    }
}
