use serde::{Deserialize, Serialize};

use super::{Axis, Error, Point, Rect, Result};

/// An `Extent` is a size with a width and height but no location. Widgets use
/// extents to express minimum, preferred and fixed sizing intent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// Width in device units.
    pub w: f32,
    /// Height in device units.
    pub h: f32,
}

impl Extent {
    /// Construct an extent. No validation is performed, see [`Self::checked`].
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// The zero extent.
    pub const fn zero() -> Self {
        Self { w: 0.0, h: 0.0 }
    }

    /// Construct an extent, failing if either dimension is negative or not
    /// finite.
    pub fn checked(w: f32, h: f32) -> Result<Self> {
        let e = Self { w, h };
        if e.is_valid() {
            Ok(e)
        } else {
            Err(Error::Geometry(format!("invalid extent {w}x{h}")))
        }
    }

    /// True if both dimensions are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w >= 0.0 && self.h >= 0.0
    }

    /// The dimension along an axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Width => self.w,
            Axis::Height => self.h,
        }
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect::from_parts(Point::zero(), *self)
    }
}
