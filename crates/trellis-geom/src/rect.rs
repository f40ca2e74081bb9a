use serde::{Deserialize, Serialize};

use super::{Extent, Point};

/// An axis-aligned rectangle. `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a rectangle from its bottom-left corner and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle from an offset and an extent.
    pub fn from_parts(offset: Point, extent: Extent) -> Self {
        Self::new(offset.x, offset.y, extent.w, extent.h)
    }

    /// The bottom-left corner.
    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The size of the rectangle.
    pub fn extent(&self) -> Extent {
        Extent::new(self.w, self.h)
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge (exclusive).
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Does the rectangle contain the point? Left and bottom edges are
    /// inclusive, right and top edges exclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.bottom() && p.y < self.top()
    }

    /// The overlap between two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let bottom = self.bottom().max(other.bottom());
        let top = self.top().min(other.top());
        if right <= left || top <= bottom {
            None
        } else {
            Some(Self::new(left, bottom, right - left, top - bottom))
        }
    }

    /// Shift the rectangle by an offset.
    pub fn shift(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    /// Round every component to the nearest device unit. Negative zeros
    /// come out as positive zeros.
    pub fn round(&self) -> Self {
        // Adding 0.0 turns -0.0 into 0.0 and leaves every other value alone.
        Self::new(
            self.x.round() + 0.0,
            self.y.round() + 0.0,
            self.w.round() + 0.0,
            self.h.round() + 0.0,
        )
    }
}
