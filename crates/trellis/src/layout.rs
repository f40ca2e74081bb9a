//! The layout pass: solved values in, window-space geometry out.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    NodeId,
    error::Result,
    frame::Frame,
    geom::{Point, Rect, Translation},
    needs::Need,
    node::{Arena, Geometry, Node, NodeState},
    solver::{Solver, Variable},
};

/// Read a widget's rectangle from the solver. Variables the solver has no
/// value for fall back to the minimum extent for sizes and 0 for positions.
fn solved_rect<S: Solver>(node: &Node, state: &NodeState, solver: &Mutex<S>) -> Rect {
    let solver = solver.lock();
    let value = |v: Variable, default: f32| solver.value(v).map_or(default, |x| x as f32);
    let minimum = state.extents.minimum;
    Rect::new(
        value(node.vars.left, 0.0),
        value(node.vars.bottom, 0.0),
        value(node.vars.width, minimum.w),
        value(node.vars.height, minimum.h),
    )
}

/// Derive the full geometry of a widget from its rounded window rectangle.
pub(crate) fn make_geometry(rect: Rect, parent_offset: Option<Point>, elevation: f32) -> Geometry {
    let window_rectangle = rect.round();
    let offset_from_window = window_rectangle.offset();
    let offset_from_parent = parent_offset.map_or(offset_from_window, |p| offset_from_window - p);
    let to_window = Translation::new(offset_from_window.x, offset_from_window.y, elevation);
    Geometry {
        window_rectangle,
        offset_from_parent,
        offset_from_window,
        to_window,
        from_window: to_window.inverse(),
    }
}

/// One run of the layout pass over a window's tree.
pub(crate) struct LayoutPass<'a, S> {
    /// The tree.
    arena: &'a Arena,
    /// The shared solver.
    solver: &'a Mutex<S>,
    /// The frame being produced.
    frame: &'a Frame,
    /// Lay out every widget regardless of need.
    force: bool,
    /// Widgets laid out so far.
    laid_out: usize,
}

impl<'a, S: Solver> LayoutPass<'a, S> {
    /// Prepare a pass.
    pub(crate) fn new(arena: &'a Arena, solver: &'a Mutex<S>, frame: &'a Frame, force: bool) -> Self {
        Self {
            arena,
            solver,
            frame,
            force,
            laid_out: 0,
        }
    }

    /// Consume a widget's pending flags and check its solved geometry for
    /// changes since the previous check.
    pub(crate) fn compute_need(&self, node: &Node) -> Need {
        let mut state = node.state.lock();
        let rect = solved_rect(node, &state, self.solver);
        let changed = state.watch.observe(rect);
        node.needs.take(changed)
    }

    /// Store fresh geometry for one widget and run its layout hook. Returns
    /// the widget's window offset.
    fn layout_one(&mut self, id: NodeId, node: &Node, parent_offset: Option<Point>) -> Point {
        let mut guard = node.state.lock();
        let state = &mut *guard;
        let rect = solved_rect(node, state, self.solver);
        state.geometry = make_geometry(rect, parent_offset, state.elevation);
        state.widget.layout(&state.geometry, self.frame);
        self.laid_out += 1;
        trace!(?id, name = %state.name, rect = ?state.geometry.window_rectangle, "layout");
        state.geometry.offset_from_window
    }

    /// A widget that was not laid out keeps its rectangle, but its parent may
    /// have moved underneath it.
    fn refresh_offset(node: &Node, parent_offset: Point) -> Point {
        let mut state = node.state.lock();
        let origin = state.geometry.offset_from_window;
        state.geometry.offset_from_parent = origin - parent_offset;
        origin
    }

    /// Run the pass from the root. Returns the combined need of the tree.
    pub(crate) fn run(mut self) -> Result<Need> {
        let root = self.arena.root;
        let node = self.arena.get(root)?;
        let mut need = self.compute_need(node);
        let offset = if self.force || need.needs_layout() {
            self.layout_one(root, node, None)
        } else {
            node.state.lock().geometry.offset_from_window
        };
        need |= self.layout_children(root, offset)?;
        debug!(
            frame = self.frame.number,
            force = self.force,
            laid_out = self.laid_out,
            ?need,
            "layout pass"
        );
        Ok(need)
    }

    /// Compute the need of every child of `id`, lay out those that need it
    /// and recurse. Returns the combined need of the subtree below `id`.
    fn layout_children(&mut self, id: NodeId, parent_offset: Point) -> Result<Need> {
        let arena = self.arena;
        let mut total = Need::empty();
        for &child in &arena.get(id)?.children {
            let node = arena.get(child)?;
            let need = self.compute_need(node);
            total |= need;
            let offset = if self.force || need.needs_layout() {
                self.layout_one(child, node, Some(parent_offset))
            } else {
                Self::refresh_offset(node, parent_offset)
            };
            total |= self.layout_children(child, offset)?;
        }
        Ok(total)
    }
}
