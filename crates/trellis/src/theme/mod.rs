//! Colors and the theme lookup used by the draw pass.

/// Gruvbox-based dark palette.
pub mod gruvbox;
/// Solarized-based light palette.
pub mod solarized;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Construct a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parse "#RRGGBB" or "RRGGBB".
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::Invalid(format!("hex color {hex:?}")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::Invalid(format!("hex color {hex:?}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Color lookups by nesting level. Implementations are pure: the same level
/// always yields the same color.
pub trait Theme: Send + Sync {
    /// Border color for widgets at `level`.
    fn border_color(&self, level: i32) -> Color;
    /// Fill color for widgets at `level`.
    fn fill_color(&self, level: i32) -> Color;
    /// Border color for the focused widget.
    fn accent_color(&self) -> Color;
}

/// A theme backed by per-level color ramps. Levels outside the ramp clamp to
/// its ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Border colors, level 0 first.
    borders: Vec<Color>,
    /// Fill colors, level 0 first.
    fills: Vec<Color>,
    /// Focus accent.
    accent: Color,
}

impl Palette {
    /// Construct a palette. Ramps must not be empty.
    pub fn new(borders: Vec<Color>, fills: Vec<Color>, accent: Color) -> Result<Self> {
        if borders.is_empty() || fills.is_empty() {
            return Err(Error::Invalid("palette ramps must not be empty".into()));
        }
        Ok(Self {
            borders,
            fills,
            accent,
        })
    }

    /// Replace the accent color.
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    /// The dark palette.
    pub fn dark() -> Self {
        gruvbox::palette()
    }

    /// The light palette.
    pub fn light() -> Self {
        solarized::palette()
    }

    /// Clamp a level into a ramp.
    fn lookup(ramp: &[Color], level: i32) -> Color {
        let last = ramp.len().saturating_sub(1);
        let i = usize::try_from(level.max(0)).map_or(last, |l| l.min(last));
        ramp[i]
    }
}

impl Theme for Palette {
    fn border_color(&self, level: i32) -> Color {
        Self::lookup(&self.borders, level)
    }

    fn fill_color(&self, level: i32) -> Color {
        Self::lookup(&self.fills, level)
    }

    fn accent_color(&self) -> Color {
        self.accent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() -> Result<()> {
        assert_eq!(Color::from_hex("#ff8000")?, Color::new(255, 128, 0));
        assert_eq!(Color::from_hex("0a0B0c")?, Color::new(10, 11, 12));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert_eq!(Color::new(1, 2, 255).to_string(), "#0102ff");
        assert_eq!(Color::hex(0x102030), Color::new(16, 32, 48));
        assert_eq!(Color::hex(0xff8019), Color::from_hex("#ff8019")?);
        Ok(())
    }

    #[test]
    fn palette_clamps() -> Result<()> {
        let a = Color::new(1, 1, 1);
        let b = Color::new(2, 2, 2);
        let p = Palette::new(vec![a, b], vec![b, a], a)?;
        assert_eq!(p.border_color(-1), a);
        assert_eq!(p.border_color(0), a);
        assert_eq!(p.border_color(1), b);
        assert_eq!(p.border_color(99), b);
        assert_eq!(p.fill_color(0), b);
        assert!(Palette::new(vec![], vec![a], a).is_err());
        Ok(())
    }

    #[test]
    fn presets_brighten_with_level() {
        for p in [Palette::dark(), Palette::light()] {
            assert_ne!(p.fill_color(0), p.fill_color(1));
            assert_ne!(p.border_color(1), p.border_color(2));
        }
    }
}
