//! Colors for QR rendering.
//!
//! Accepts the notations people type at a prompt: `#FF0000`, `ff0000`,
//! `rgb(255, 0, 0)` and a handful of common names.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

static NAMED_COLORS: [(&str, Color); 18] = [
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xFF, 0xFF, 0xFF)),
    ("red", Color::rgb(0xFF, 0x00, 0x00)),
    ("green", Color::rgb(0x00, 0xFF, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xFF)),
    ("yellow", Color::rgb(0xFF, 0xFF, 0x00)),
    ("cyan", Color::rgb(0x00, 0xFF, 0xFF)),
    ("magenta", Color::rgb(0xFF, 0x00, 0xFF)),
    ("orange", Color::rgb(0xFF, 0xA5, 0x00)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
    ("pink", Color::rgb(0xFF, 0xC0, 0xCB)),
    ("brown", Color::rgb(0xA5, 0x2A, 0x2A)),
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("grey", Color::rgb(0x80, 0x80, 0x80)),
    ("navy", Color::rgb(0x00, 0x00, 0x80)),
    ("darkblue", Color::rgb(0x00, 0x00, 0x8B)),
    ("darkgreen", Color::rgb(0x00, 0x64, 0x00)),
    ("darkred", Color::rgb(0x8B, 0x00, 0x00)),
];

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, as used in SVG `fill` attributes.
    pub fn to_css_rgb(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// True when the channel sum is below half of the maximum (384).
    pub fn is_dark(self) -> bool {
        (self.r as u16 + self.g as u16 + self.b as u16) < 384
    }

    pub fn to_image_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    fn parse_hex(digits: &str, original: &str) -> Result<Self, ColorError> {
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(original.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(original.to_string()))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn parse_rgb(lower: &str, original: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidRgb(original.to_string());
        let inner = lower
            .strip_prefix("rgb")
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix('('))
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let mut channels = [0u8; 3];
        let mut parts = inner.split(',');
        for channel in channels.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *channel = part.parse::<u8>().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Color::rgb(channels[0], channels[1], channels[2]))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(digits) = trimmed.strip_prefix('#') {
            return Color::parse_hex(digits, s);
        }
        if trimmed.len() == 6 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Color::parse_hex(trimmed, s);
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return Color::parse_rgb(&lower, s);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
