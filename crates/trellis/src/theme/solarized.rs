//! Solarized light: fills darken from the paper background, borders darken
//! towards the emphasized content tones.
//!
//! Based on the Solarized theme: <https://ethanschoonover.com/solarized/>

use super::{Color, Palette};

/// Light background.
pub const BASE3: Color = Color::hex(0xfdf6e3);
/// Light background highlights.
pub const BASE2: Color = Color::hex(0xeee8d5);
/// Body text on dark backgrounds.
pub const BASE1: Color = Color::hex(0x93a1a1);
/// Secondary content.
pub const BASE0: Color = Color::hex(0x839496);
/// Body text.
pub const BASE00: Color = Color::hex(0x657b83);
/// Emphasized content.
pub const BASE01: Color = Color::hex(0x586e75);
/// Dark background highlights.
pub const BASE02: Color = Color::hex(0x073642);
/// Blue, used as the focus accent.
pub const BLUE: Color = Color::hex(0x268bd2);

/// Build the light palette.
pub fn palette() -> Palette {
    Palette {
        borders: vec![BASE1, BASE0, BASE00, BASE01, BASE02],
        fills: vec![BASE3, BASE2, BASE1, BASE0],
        accent: BLUE,
    }
}
