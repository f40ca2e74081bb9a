use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use crate::{
    draw::{DrawCommand, DrawContext, DrawList},
    frame::Frame,
    geom::Extent,
    name::WidgetName,
    node::Geometry,
    widget::Widget,
};

/// Shared counters for a [`Probe`]. Clones observe the same probe.
#[derive(Debug, Default, Clone)]
pub struct ProbeLog {
    /// Layout hook calls.
    layouts: Arc<AtomicUsize>,
    /// Draw hook calls.
    draws: Arc<AtomicUsize>,
    /// Number of the last frame the probe was laid out in.
    last_layout: Arc<AtomicU64>,
}

impl ProbeLog {
    /// How many times the probe has been laid out.
    pub fn layouts(&self) -> usize {
        self.layouts.load(Ordering::Relaxed)
    }

    /// How many times the probe has been drawn.
    pub fn draws(&self) -> usize {
        self.draws.load(Ordering::Relaxed)
    }

    /// The frame number of the most recent layout, 0 if never laid out.
    pub fn last_layout(&self) -> u64 {
        self.last_layout.load(Ordering::Relaxed)
    }

    /// Zero the counters.
    pub fn reset(&self) {
        self.layouts.store(0, Ordering::Relaxed);
        self.draws.store(0, Ordering::Relaxed);
    }
}

/// A box widget that counts its layout and draw calls.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Default extent.
    extent: Extent,
    /// Counters.
    log: ProbeLog,
}

impl Probe {
    /// A probe with the given default extent. Returns the widget and a handle
    /// on its counters.
    pub fn new(w: f32, h: f32) -> (Self, ProbeLog) {
        let log = ProbeLog::default();
        (
            Self {
                extent: Extent::new(w, h),
                log: log.clone(),
            },
            log,
        )
    }
}

impl Widget for Probe {
    fn name(&self) -> WidgetName {
        WidgetName::convert("probe")
    }

    fn default_extent(&self) -> Extent {
        self.extent
    }

    fn layout(&mut self, _geometry: &Geometry, frame: &Frame) {
        self.log.layouts.fetch_add(1, Ordering::Relaxed);
        self.log.last_layout.store(frame.number, Ordering::Relaxed);
    }

    fn draw(&self, ctx: &DrawContext, geometry: &Geometry, out: &mut DrawList, _frame: &Frame) {
        self.log.draws.fetch_add(1, Ordering::Relaxed);
        out.push(DrawCommand::new(ctx, geometry.local_rect()));
    }
}
