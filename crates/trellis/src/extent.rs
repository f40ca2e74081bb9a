//! The extent model: a widget's semantic sizing intent.

use crate::geom::{Axis, Extent};

/// The three sizing intents of a widget.
///
/// A zero `fixed` dimension means the widget is unconstrained on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    /// The widget is never smaller than this.
    pub minimum: Extent,
    /// The widget would like to be at least this large.
    pub preferred: Extent,
    /// Exact size on each axis with a non-zero value.
    pub fixed: Extent,
}

impl Extents {
    /// Extents for a newly created widget: minimum and preferred both set to
    /// the default extent, no fixed size.
    ///
    /// # Panics
    ///
    /// If `default` has a negative or non-finite dimension.
    pub fn new(default: Extent) -> Self {
        check_extent(default);
        Self {
            minimum: default,
            preferred: default,
            fixed: Extent::zero(),
        }
    }

    /// Check that `fixed` may be installed alongside the current minimum.
    ///
    /// # Panics
    ///
    /// If a non-zero fixed dimension is smaller than the minimum.
    pub(crate) fn check_fixed(&self, fixed: Extent) {
        check_extent(fixed);
        for axis in Axis::ALL {
            let f = fixed.get(axis);
            assert!(
                f == 0.0 || f >= self.minimum.get(axis),
                "fixed {axis:?} {f} is below the minimum {}",
                self.minimum.get(axis)
            );
        }
    }

    /// Check that `minimum` may be installed alongside the current fixed
    /// extent.
    ///
    /// # Panics
    ///
    /// If `minimum` is invalid or exceeds a non-zero fixed dimension.
    pub(crate) fn check_minimum(&self, minimum: Extent) {
        check_extent(minimum);
        for axis in Axis::ALL {
            let f = self.fixed.get(axis);
            assert!(
                f == 0.0 || f >= minimum.get(axis),
                "fixed {axis:?} {f} is below the minimum {}",
                minimum.get(axis)
            );
        }
    }

    /// True if the fixed extent constrains `axis`.
    pub fn is_fixed(&self, axis: Axis) -> bool {
        self.fixed.get(axis) != 0.0
    }
}

/// Assert that an extent is usable as a sizing intent.
///
/// # Panics
///
/// If either dimension is negative or not finite.
pub(crate) fn check_extent(e: Extent) {
    assert!(e.is_valid(), "extent {}x{} must be finite and non-negative", e.w, e.h);
}
