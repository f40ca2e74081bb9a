//! Window configuration.
//!
//! ```toml
//! extent = { w = 1024.0, h = 768.0 }
//! theme = "light"
//! accent = "#ff8800"
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    geom::Extent,
    theme::{Color, Palette},
};

/// Built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// [`Palette::dark`]
    #[default]
    Dark,
    /// [`Palette::light`]
    Light,
}

/// Startup settings for a [`Window`](crate::Window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Initial window size.
    pub extent: Extent,
    /// Palette to draw with.
    pub theme: ThemeName,
    /// Overrides the palette's focus accent.
    pub accent: Option<Color>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            extent: Extent::new(800.0, 600.0),
            theme: ThemeName::Dark,
            accent: None,
        }
    }
}

impl WindowConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults; an
    /// invalid window extent is a geometry error.
    pub fn from_toml(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        Extent::checked(config.extent.w, config.extent.h)?;
        Ok(config)
    }

    /// Build the configured palette.
    pub fn theme(&self) -> Palette {
        let palette = match self.theme {
            ThemeName::Dark => Palette::dark(),
            ThemeName::Light => Palette::light(),
        };
        match self.accent {
            Some(accent) => palette.with_accent(accent),
            None => palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::Error, theme::Theme};

    #[test]
    fn defaults() -> Result<()> {
        assert_eq!(WindowConfig::from_toml("")?, WindowConfig::default());
        Ok(())
    }

    #[test]
    fn parse() -> Result<()> {
        let c = WindowConfig::from_toml(
            r##"
                extent = { w = 1024.0, h = 768.0 }
                theme = "light"
                accent = "#ff8800"
            "##,
        )?;
        assert_eq!(c.extent, Extent::new(1024.0, 768.0));
        assert_eq!(c.theme, ThemeName::Light);
        let accent = Color::new(0xff, 0x88, 0x00);
        assert_eq!(c.accent, Some(accent));
        assert_eq!(c.theme().accent_color(), accent);
        assert_eq!(c.theme().fill_color(0), Palette::light().fill_color(0));
        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            WindowConfig::from_toml("theme = \"neon\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WindowConfig::from_toml("accent = \"#12\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WindowConfig::from_toml("extent = { w = -1.0, h = 10.0 }"),
            Err(Error::Geometry(_))
        ));
        assert!(matches!(
            WindowConfig::from_toml("colour = 1"),
            Err(Error::Config(_))
        ));
    }
}
