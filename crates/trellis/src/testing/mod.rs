//! Helpers for testing code built on trellis.

/// A solver wrapper that counts constraint traffic.
pub mod counting;
/// A window preloaded with a test solver.
pub mod harness;
/// Widgets that record how they are driven.
pub mod probe;

use tracing::{Level, trace};
use tracing_subscriber::fmt;

pub use counting::CountingSolver;
pub use harness::{Harness, TestSolver};
pub use probe::{Probe, ProbeLog};

/// Install a `tracing` subscriber that writes through the test harness's
/// captured output. Safe to call from every test.
pub fn init_tracing() {
    let format = fmt::format()
        .with_level(true)
        .with_line_number(true)
        .with_ansi(false)
        .without_time()
        .compact();
    if let Err(e) = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .event_format(format)
        .try_init()
    {
        trace!("subscriber already installed: {e}");
    }
}
