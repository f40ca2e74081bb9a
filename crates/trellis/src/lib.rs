//! Trellis: an incremental layout and invalidation engine for widget trees.
//!
//! Widgets declare their sizes as linear constraints in a shared solver.
//! Each frame, trellis detects which widgets' solved geometry changed, lays
//! out only those, draws the tree with inherited clip, transform and colors,
//! and answers pointer hit tests against the latest rectangles.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Window`] - The widget tree, its solver and the frame driver
//! - [`Widget`] - The trait implemented by all widget kinds
//! - [`solver::Solver`] - The constraint solver interface
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Extent, Translation)
//! - [`solver`] - Constraint expressions and the cassowary adapter
//! - [`theme`] - Colors and palettes

#![warn(missing_docs)]

/// Widget variables and constraint registration.
pub mod binding;
/// Window configuration.
pub mod config;
/// The draw pass and its output.
pub mod draw;
/// Tree dumps for debugging.
mod dump;
/// Error types.
pub mod error;
/// Minimum, preferred and fixed extents.
pub mod extent;
/// Frame identity.
pub mod frame;
/// Pointer hit testing.
pub mod hit;
/// Node identifiers.
mod id;
/// The layout pass.
mod layout;
/// Widget names.
pub mod name;
/// Dirty tracking.
pub mod needs;
/// Arena node records.
mod node;
/// The constraint solver interface.
pub mod solver;
/// Colors and themes.
pub mod theme;
/// The widget trait.
pub mod widget;
/// The window and frame driver.
mod window;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use trellis_geom as geom;

pub use error::{Error, Result};
pub use id::NodeId;
pub use node::{Geometry, VisualState};
pub use widget::{Container, Widget};
pub use window::Window;
