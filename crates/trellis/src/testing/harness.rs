use std::time::{Duration, Instant};

use super::{CountingSolver, Probe, ProbeLog};
use crate::{
    NodeId, Window,
    draw::DrawList,
    error::Result,
    geom::Extent,
    solver::CassowarySolver,
    theme::Palette,
};

/// The solver used by [`Harness`].
pub type TestSolver = CountingSolver<CassowarySolver>;

/// A window over a counting cassowary solver, with a fake clock. Tests drive
/// it by mutating widgets and calling [`Harness::render`].
pub struct Harness {
    /// The window under test.
    pub window: Window<TestSolver>,
    /// Time of frame 0.
    start: Instant,
}

impl Harness {
    /// A harness with a window of the given size and the dark palette.
    pub fn new(w: f32, h: f32) -> Result<Self> {
        Ok(Self {
            window: Window::new(
                CountingSolver::new(CassowarySolver::new()),
                Box::new(Palette::dark()),
                Extent::new(w, h),
            )?,
            start: Instant::now(),
        })
    }

    /// The root widget.
    pub fn root(&self) -> NodeId {
        self.window.root()
    }

    /// Add a [`Probe`] with the given default extent under `parent`.
    pub fn probe(&self, parent: NodeId, w: f32, h: f32) -> Result<(NodeId, ProbeLog)> {
        let (probe, log) = Probe::new(w, h);
        Ok((self.window.add(parent, probe)?, log))
    }

    /// Render the next frame, at 60 frames per second of fake time.
    pub fn render(&self) -> Result<Option<DrawList>> {
        let n = u32::try_from(self.window.frame_count() + 1).unwrap_or(u32::MAX);
        self.window
            .render(self.start + Duration::from_micros(16_667) * n)
    }

    /// Render until a frame has nothing to draw. Returns the number of frames
    /// that drew.
    pub fn settle(&self) -> Result<usize> {
        let mut drawn = 0;
        while self.render()?.is_some() {
            drawn += 1;
            assert!(drawn < 16, "window did not settle");
        }
        Ok(drawn)
    }

    /// Live constraint handles in the solver.
    pub fn live_handles(&self) -> usize {
        self.window.with_solver(CountingSolver::live)
    }

    /// Is the handle with this raw id still registered?
    pub fn is_live(&self, raw: u64) -> bool {
        self.window.with_solver(|s| s.is_live(raw))
    }
}
