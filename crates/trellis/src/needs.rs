//! Per-widget dirty tracking.
//!
//! Each widget carries two sticky flags. Mutations set them from any thread;
//! the layout pass consumes both exactly once per frame through
//! [`NeedsFlags::take`]. A flag set concurrently with a frame is either
//! consumed by that frame or by the next one, never lost.

use std::sync::atomic::{AtomicBool, Ordering};

use bitflags::bitflags;

use crate::geom::Rect;

bitflags! {
    /// Pending work for a widget or subtree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Need: u8 {
        /// The widget must be drawn again.
        const REDRAW = 0b01;
        /// The widget's rectangle must be recomputed. Implies `REDRAW`.
        const LAYOUT = 0b10;
    }
}

impl Need {
    /// Layout is pending.
    pub fn needs_layout(&self) -> bool {
        self.contains(Self::LAYOUT)
    }

    /// Redraw is pending.
    pub fn needs_redraw(&self) -> bool {
        self.contains(Self::REDRAW)
    }
}

/// The sticky layout and redraw signals of one widget.
#[derive(Debug, Default)]
pub struct NeedsFlags {
    /// Set by geometry-relevant mutations.
    layout: AtomicBool,
    /// Set by visual-state mutations and forced invalidation.
    redraw: AtomicBool,
}

impl NeedsFlags {
    /// Flags for a new widget: layout pending.
    pub fn new() -> Self {
        Self {
            layout: AtomicBool::new(true),
            redraw: AtomicBool::new(true),
        }
    }

    /// Mark layout pending.
    pub fn request_layout(&self) {
        self.layout.store(true, Ordering::Relaxed);
    }

    /// Mark redraw pending.
    pub fn request_redraw(&self) {
        self.redraw.store(true, Ordering::Relaxed);
    }

    /// Consume both flags. `geometry_changed` is the result of solved-value
    /// change detection and counts as a layout request.
    pub fn take(&self, geometry_changed: bool) -> Need {
        let layout = self.layout.swap(false, Ordering::Relaxed) | geometry_changed;
        let redraw = self.redraw.swap(false, Ordering::Relaxed) | layout;
        let mut need = Need::empty();
        need.set(Need::LAYOUT, layout);
        need.set(Need::REDRAW, redraw);
        need
    }

    /// Peek at the flags without consuming them.
    pub fn pending(&self) -> Need {
        let mut need = Need::empty();
        need.set(Need::LAYOUT, self.layout.load(Ordering::Relaxed));
        need.set(Need::REDRAW, self.redraw.load(Ordering::Relaxed));
        need
    }
}

/// Change detection on solved geometry. Compares rounded rectangles only, so
/// sub-unit jitter in the solver never triggers a layout.
#[derive(Debug, Default)]
pub(crate) struct GeometryWatch {
    /// The rounded rectangle seen at the previous check.
    observed: Option<Rect>,
}

impl GeometryWatch {
    /// Record `rect` and report whether it differs from the previous one.
    /// The first observation always counts as a change.
    pub(crate) fn observe(&mut self, rect: Rect) -> bool {
        let rect = rect.round();
        let changed = self.observed != Some(rect);
        self.observed = Some(rect);
        changed
    }
}
