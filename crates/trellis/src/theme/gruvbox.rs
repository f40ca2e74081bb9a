//! Gruvbox dark: fills climb from the hard background towards the lighter
//! greys, borders from grey towards the light foreground.
//!
//! Based on the Gruvbox theme: <https://github.com/morhetz/gruvbox>

use super::{Color, Palette};

/// Hardest background.
pub const DARK0_HARD: Color = Color::hex(0x1d2021);
/// Background.
pub const DARK0: Color = Color::hex(0x282828);
/// Background 1.
pub const DARK1: Color = Color::hex(0x3c3836);
/// Background 2.
pub const DARK2: Color = Color::hex(0x504945);
/// Background 3.
pub const DARK3: Color = Color::hex(0x665c54);
/// Background 4.
pub const DARK4: Color = Color::hex(0x7c6f64);
/// Grey.
pub const GRAY: Color = Color::hex(0x928374);
/// Foreground 4.
pub const LIGHT4: Color = Color::hex(0xa89984);
/// Foreground 3.
pub const LIGHT3: Color = Color::hex(0xbdae93);
/// Foreground 2.
pub const LIGHT2: Color = Color::hex(0xd5c4a1);
/// Foreground 1.
pub const LIGHT1: Color = Color::hex(0xebdbb2);
/// Bright orange, used as the focus accent.
pub const ORANGE: Color = Color::hex(0xfe8019);

/// Build the dark palette.
pub fn palette() -> Palette {
    Palette {
        borders: vec![DARK4, GRAY, LIGHT4, LIGHT3, LIGHT2, LIGHT1],
        fills: vec![DARK0_HARD, DARK0, DARK1, DARK2, DARK3, DARK4],
        accent: ORANGE,
    }
}
