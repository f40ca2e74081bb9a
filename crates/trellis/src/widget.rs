//! The per-kind capability interface.
//!
//! The window's generic traversals handle constraints, invalidation and
//! geometry. A [`Widget`] only adds what is specific to its kind: its default
//! size, what it draws and which of its points respond to the pointer.

use crate::{
    draw::{DrawCommand, DrawContext, DrawList},
    frame::Frame,
    geom::{Extent, Point},
    name::WidgetName,
    node::Geometry,
};

/// The trait implemented by all widget kinds.
pub trait Widget: Send + 'static {
    /// Kind name for logs and dumps.
    fn name(&self) -> WidgetName {
        WidgetName::convert("widget")
    }

    /// The initial minimum and preferred extent.
    fn default_extent(&self) -> Extent {
        Extent::zero()
    }

    /// Called after the layout pass has stored new geometry for the widget.
    fn layout(&mut self, _geometry: &Geometry, _frame: &Frame) {}

    /// Emit draw commands. `ctx` already carries the widget's clip, transform
    /// and resolved colors. The default draws the widget's box.
    fn draw(&self, ctx: &DrawContext, geometry: &Geometry, out: &mut DrawList, _frame: &Frame) {
        out.push(DrawCommand::new(ctx, geometry.local_rect()));
    }

    /// Does the point, in local coordinates, hit this widget?
    fn hit_test(&self, point: Point, geometry: &Geometry) -> bool {
        geometry.local_rect().contains(point)
    }
}

/// A plain box that groups its children. Used for the window root.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container {
    /// Initial extent.
    extent: Extent,
}

impl Container {
    /// A container with a zero default extent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A container with the given default extent.
    pub fn with_extent(extent: Extent) -> Self {
        Self { extent }
    }
}

impl Widget for Container {
    fn name(&self) -> WidgetName {
        WidgetName::convert("container")
    }

    fn default_extent(&self) -> Extent {
        self.extent
    }
}
