use serde::{Deserialize, Serialize};

use super::{Point, Rect};

/// A pure 3D translation. Widgets carry one into window space and its inverse
/// out of it; `z` is the widget's elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
    /// Depth offset.
    pub z: f32,
}

impl Translation {
    /// Construct a translation.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The translation that undoes this one. Zero offsets stay positive
    /// zeros.
    pub fn inverse(&self) -> Self {
        Self::new(0.0 - self.x, 0.0 - self.y, 0.0 - self.z)
    }

    /// Translate a rectangle. Depth is ignored.
    pub fn apply_rect(&self, r: Rect) -> Rect {
        r.shift(Point::new(self.x, self.y))
    }
}
