use std::time::Instant;

/// Identifies one pass of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic frame counter, starting at 1.
    pub number: u64,
    /// The display time the frame is being produced for.
    pub time: Instant,
}

impl Frame {
    /// Construct a frame.
    pub fn new(number: u64, time: Instant) -> Self {
        Self { number, time }
    }
}
