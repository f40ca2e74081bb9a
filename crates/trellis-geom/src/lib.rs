//! Geometry primitives used by the trellis layout engine.
//!
//! Coordinates are window-space floats with the y axis pointing up, so a
//! rectangle's origin is its bottom-left corner.

#![warn(missing_docs)]

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod extent;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Translation transforms.
mod transform;

pub use error::{Error, Result};
pub use extent::Extent;
pub use point::Point;
pub use rect::Rect;
pub use transform::Translation;

/// The two layout axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis.
    Width,
    /// Vertical axis.
    Height,
}

impl Axis {
    /// Both axes, width first.
    pub const ALL: [Self; 2] = [Self::Width, Self::Height];
}
