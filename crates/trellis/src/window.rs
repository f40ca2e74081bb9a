use std::{
    mem,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Instant,
};

use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;
use tracing::{debug, debug_span, trace, warn};

use crate::{
    NodeId,
    binding::{ExtentBinding, Placement, Vars},
    config::WindowConfig,
    draw::{DrawList, DrawPass, nesting_level},
    dump,
    error::{Error, Result},
    extent::{Extents, check_extent},
    frame::Frame,
    geom::{Extent, Point, Rect},
    hit::{HitBox, hit_node},
    layout::LayoutPass,
    name::WidgetName,
    needs::Need,
    node::{Arena, Geometry, Node, NodeState, VisualState},
    solver::{Constraint, ConstraintHandle, Expression, Solver, Strength, Variable},
    theme::Theme,
    widget::{Container, Widget},
};

/// Which of a widget's extents an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtentKind {
    /// `Extents::minimum`
    Minimum,
    /// `Extents::preferred`
    Preferred,
    /// `Extents::fixed`
    Fixed,
}

impl ExtentKind {
    /// Read the targeted extent.
    fn get(self, extents: &Extents) -> Extent {
        match self {
            Self::Minimum => extents.minimum,
            Self::Preferred => extents.preferred,
            Self::Fixed => extents.fixed,
        }
    }

    /// Write the targeted extent.
    fn set(self, extents: &mut Extents, value: Extent) {
        match self {
            Self::Minimum => extents.minimum = value,
            Self::Preferred => extents.preferred = value,
            Self::Fixed => extents.fixed = value,
        }
    }
}

/// The constraints pinning the root widget to the window.
struct Pins {
    /// Current window size.
    extent: Extent,
    /// `root.left == 0`
    left: ConstraintHandle,
    /// `root.bottom == 0`
    bottom: ConstraintHandle,
    /// `root.width == extent.w`
    width: ConstraintHandle,
    /// `root.height == extent.h`
    height: ConstraintHandle,
}

/// `var == v`
fn pin(var: Variable, v: f32) -> Constraint {
    Expression::from(var).equal_to(f64::from(v))
}

/// A top-level window: the widget tree, the solver its constraints live in,
/// and the per-frame driver.
///
/// Every method takes `&self`. Input threads may change extents and visual
/// state while a render thread calls [`Window::render`]; locks are always
/// taken in the order arena, hover/focus, widget, solver.
pub struct Window<S: Solver> {
    /// Widget records.
    arena: RwLock<Arena>,
    /// The constraint solver shared by every widget.
    solver: Mutex<S>,
    /// Color lookups for the draw pass.
    theme: Box<dyn Theme>,
    /// Root pins and the window size.
    pins: Mutex<Pins>,
    /// The next frame lays out every widget.
    force_layout: AtomicBool,
    /// Frames rendered so far.
    frame_count: AtomicU64,
    /// Widget under the pointer.
    hovered: Mutex<Option<NodeId>>,
    /// Widget with keyboard focus.
    focused: Mutex<Option<NodeId>>,
}

impl<S: Solver> Window<S> {
    /// Create a window of the given size with an empty root [`Container`].
    ///
    /// # Panics
    ///
    /// If `extent` has a negative or non-finite dimension.
    pub fn new(mut solver: S, theme: Box<dyn Theme>, extent: Extent) -> Result<Self> {
        check_extent(extent);
        let widget = Container::new();
        let extents = Extents::new(widget.default_extent());
        let vars = Vars::new();
        let binding = ExtentBinding::register(&mut solver, &vars, &extents)?;
        let pins = Pins {
            extent,
            left: solver.add_constraint(pin(vars.left, 0.0), Strength::REQUIRED)?,
            bottom: solver.add_constraint(pin(vars.bottom, 0.0), Strength::REQUIRED)?,
            width: solver.add_constraint(pin(vars.width, extent.w), Strength::REQUIRED)?,
            height: solver.add_constraint(pin(vars.height, extent.h), Strength::REQUIRED)?,
        };

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(
            None,
            vars,
            NodeState::new(Box::new(widget), 0.0, extents, binding),
        ));
        debug!(w = extent.w, h = extent.h, "window created");
        Ok(Self {
            arena: RwLock::new(Arena { nodes, root }),
            solver: Mutex::new(solver),
            theme,
            pins: Mutex::new(pins),
            force_layout: AtomicBool::new(true),
            frame_count: AtomicU64::new(0),
            hovered: Mutex::new(None),
            focused: Mutex::new(None),
        })
    }

    /// Create a window from a configuration.
    pub fn from_config(solver: S, config: &WindowConfig) -> Result<Self> {
        Self::new(solver, Box::new(config.theme()), config.extent)
    }

    /// The root widget.
    pub fn root(&self) -> NodeId {
        self.arena.read().root
    }

    /// The current window size.
    pub fn extent(&self) -> Extent {
        self.pins.lock().extent
    }

    /// Resize the window. The root's size constraints are replaced and the
    /// next frame lays out every widget.
    ///
    /// # Panics
    ///
    /// If `extent` has a negative or non-finite dimension.
    pub fn set_extent(&self, extent: Extent) -> Result<()> {
        check_extent(extent);
        let arena = self.arena.read();
        let vars = arena.get(arena.root)?.vars;
        let mut guard = self.pins.lock();
        let pins = &mut *guard;
        if pins.extent == extent {
            return Ok(());
        }
        let mut solver = self.solver.lock();
        let width = solver.replace_constraint(&pins.width, pin(vars.width, extent.w), Strength::REQUIRED);
        let width = width.inspect_err(|e| warn!("resizing window to {extent:?}: {e}"))?;
        match solver.replace_constraint(&pins.height, pin(vars.height, extent.h), Strength::REQUIRED) {
            Ok(height) => {
                pins.width = width;
                pins.height = height;
            }
            Err(e) => {
                warn!("resizing window to {extent:?}: {e}");
                pins.width = solver.replace_constraint(
                    &width,
                    pin(vars.width, pins.extent.w),
                    Strength::REQUIRED,
                )?;
                return Err(e.into());
            }
        }
        pins.extent = extent;
        self.force_layout.store(true, Ordering::Relaxed);
        debug!(w = extent.w, h = extent.h, "window resized");
        Ok(())
    }

    /// Add a widget as the last child of `parent`. The widget starts one
    /// elevation level above its parent, with minimum and preferred extents
    /// set to its default extent.
    ///
    /// # Panics
    ///
    /// If the widget's default extent is negative or non-finite.
    pub fn add<W: Widget>(&self, parent: NodeId, widget: W) -> Result<NodeId> {
        self.add_boxed(parent, Box::new(widget))
    }

    /// Add a boxed widget as the last child of `parent`.
    pub fn add_boxed(&self, parent: NodeId, widget: Box<dyn Widget>) -> Result<NodeId> {
        let extents = Extents::new(widget.default_extent());
        let mut arena = self.arena.write();
        let parent_node = arena.get(parent)?;
        let elevation = parent_node.state.lock().elevation + 1.0;
        parent_node.needs.request_redraw();

        let vars = Vars::new();
        let binding = ExtentBinding::register(&mut *self.solver.lock(), &vars, &extents)
            .inspect_err(|e| warn!("registering constraints for new widget: {e}"))?;
        let state = NodeState::new(widget, elevation, extents, binding);
        let name = state.name.clone();
        let id = arena.nodes.insert(Node::new(Some(parent), vars, state));
        arena.get_mut(parent)?.children.push(id);
        trace!(?id, ?parent, %name, elevation, "add");
        Ok(id)
    }

    /// Remove a widget and its subtree, releasing every constraint the
    /// removed widgets own. Placement handles stay with their owners. The
    /// root cannot be removed.
    pub fn remove(&self, id: NodeId) -> Result<()> {
        let mut arena = self.arena.write();
        if id == arena.root {
            return Err(Error::Invalid("the root widget cannot be removed".into()));
        }
        let parent = arena.get(id)?.parent.ok_or(Error::NoParent(id))?;
        let doomed = arena.preorder(id)?;
        for slot in [&self.hovered, &self.focused] {
            let mut slot = slot.lock();
            if slot.is_some_and(|s| arena.is_within(s, id)) {
                *slot = None;
            }
        }
        let parent_node = arena.get_mut(parent)?;
        parent_node.children.retain(|c| *c != id);
        parent_node.needs.request_redraw();

        let mut solver = self.solver.lock();
        let mut result = Ok(());
        // Children before parents.
        for nid in doomed.iter().rev() {
            let Some(node) = arena.nodes.remove(*nid) else {
                continue;
            };
            if let Some(binding) = node.state.into_inner().binding
                && let Err(e) = binding.release(&mut *solver)
            {
                warn!(id = ?nid, "releasing constraints: {e}");
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }
        debug!(?id, removed = doomed.len(), "remove");
        result
    }

    /// Apply an extent update to a widget's constraints and, on success, to
    /// its stored extents.
    fn update_extents(&self, id: NodeId, kind: ExtentKind, value: Extent) -> Result<()> {
        let arena = self.arena.read();
        let node = arena.get(id)?;
        let mut guard = node.state.lock();
        let state = &mut *guard;
        let old = kind.get(&state.extents);
        if old == value {
            return Ok(());
        }
        match kind {
            ExtentKind::Minimum => state.extents.check_minimum(value),
            ExtentKind::Preferred => check_extent(value),
            ExtentKind::Fixed => state.extents.check_fixed(value),
        }
        let binding = state
            .binding
            .as_mut()
            .ok_or_else(|| Error::Internal(format!("widget {id:?} has no constraints")))?;
        let result = {
            let mut solver = self.solver.lock();
            let solver = &mut *solver;
            match kind {
                ExtentKind::Minimum => binding.update_minimum(solver, &node.vars, old, value),
                ExtentKind::Preferred => binding.update_preferred(solver, &node.vars, old, value),
                ExtentKind::Fixed => binding.update_fixed(solver, &node.vars, old, value),
            }
        };
        if let Err(e) = result {
            warn!(?id, "setting {kind:?} extent to {value:?}: {e}");
            return Err(e.into());
        }
        kind.set(&mut state.extents, value);
        node.needs.request_layout();
        trace!(?id, ?kind, ?value, "extent");
        Ok(())
    }

    /// Set the size below which the widget never shrinks.
    ///
    /// # Panics
    ///
    /// If `minimum` is negative or non-finite, or exceeds a non-zero fixed
    /// dimension.
    pub fn set_minimum_extent(&self, id: NodeId, minimum: Extent) -> Result<()> {
        self.update_extents(id, ExtentKind::Minimum, minimum)
    }

    /// Set the size the widget would like to have. Preferred extents yield to
    /// minimum and fixed extents and to the window size.
    ///
    /// # Panics
    ///
    /// If `preferred` is negative or non-finite.
    pub fn set_preferred_extent(&self, id: NodeId, preferred: Extent) -> Result<()> {
        self.update_extents(id, ExtentKind::Preferred, preferred)
    }

    /// Fix the widget's size on every axis with a non-zero dimension.
    ///
    /// # Panics
    ///
    /// If `fixed` is negative or non-finite, or a non-zero dimension is below
    /// the minimum.
    pub fn set_fixed_extent(&self, id: NodeId, fixed: Extent) -> Result<()> {
        self.update_extents(id, ExtentKind::Fixed, fixed)
    }

    /// Fix the width and free the height.
    pub fn set_fixed_width(&self, id: NodeId, w: f32) -> Result<()> {
        self.set_fixed_extent(id, Extent::new(w, 0.0))
    }

    /// Fix the height and free the width.
    pub fn set_fixed_height(&self, id: NodeId, h: f32) -> Result<()> {
        self.set_fixed_extent(id, Extent::new(0.0, h))
    }

    /// Register a placement constraint between `id` and a sibling, or its
    /// parent when `sibling` is `None`.
    fn place(
        &self,
        id: NodeId,
        placement: Placement,
        sibling: Option<NodeId>,
        margin: f32,
    ) -> Result<ConstraintHandle> {
        assert!(margin.is_finite(), "margin {margin} must be finite");
        let arena = self.arena.read();
        let node = arena.get(id)?;
        let other = match sibling {
            Some(s) if s == id => {
                return Err(Error::Invalid(format!("{id:?} cannot be placed against itself")));
            }
            Some(s) => s,
            None => node.parent.ok_or(Error::NoParent(id))?,
        };
        let other_vars = arena.get(other)?.vars;
        let constraint = placement.constraint(&node.vars, &other_vars, margin);
        let handle = self
            .solver
            .lock()
            .add_constraint(constraint, Strength::REQUIRED)
            .inspect_err(|e| warn!(?id, ?other, "placing {placement:?}: {e}"))?;
        node.needs.request_layout();
        trace!(?id, ?other, ?placement, margin, "place");
        Ok(handle)
    }

    /// Put the top of `id` `margin` below the bottom of `sibling`.
    pub fn place_below(&self, id: NodeId, sibling: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::Below, Some(sibling), margin)
    }

    /// Put the bottom of `id` `margin` above the top of `sibling`.
    pub fn place_above(&self, id: NodeId, sibling: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::Above, Some(sibling), margin)
    }

    /// Put the right edge of `id` `margin` left of `sibling`.
    pub fn place_left_of(
        &self,
        id: NodeId,
        sibling: NodeId,
        margin: f32,
    ) -> Result<ConstraintHandle> {
        self.place(id, Placement::LeftOf, Some(sibling), margin)
    }

    /// Put the left edge of `id` `margin` right of `sibling`.
    pub fn place_right_of(
        &self,
        id: NodeId,
        sibling: NodeId,
        margin: f32,
    ) -> Result<ConstraintHandle> {
        self.place(id, Placement::RightOf, Some(sibling), margin)
    }

    /// Inset the top of `id` by `margin` from its parent's top.
    pub fn place_at_top(&self, id: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::AtTop, None, margin)
    }

    /// Inset the bottom of `id` by `margin` from its parent's bottom.
    pub fn place_at_bottom(&self, id: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::AtBottom, None, margin)
    }

    /// Inset the left edge of `id` by `margin` from its parent's left edge.
    pub fn place_left(&self, id: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::Left, None, margin)
    }

    /// Inset the right edge of `id` by `margin` from its parent's right edge.
    pub fn place_right(&self, id: NodeId, margin: f32) -> Result<ConstraintHandle> {
        self.place(id, Placement::Right, None, margin)
    }

    /// Release a constraint returned by one of the placement methods.
    pub fn remove_constraint(&self, handle: ConstraintHandle) -> Result<()> {
        self.solver
            .lock()
            .remove_constraint(&handle)
            .inspect_err(|e| warn!("removing constraint {}: {e}", handle.raw()))?;
        Ok(())
    }

    /// Change one visual flag of a widget. Requests a redraw if it changed.
    fn update_visual(
        arena: &Arena,
        id: NodeId,
        f: impl FnOnce(&mut VisualState) -> bool,
    ) -> Result<bool> {
        let node = arena.get(id)?;
        let changed = f(&mut node.state.lock().visual);
        if changed {
            node.needs.request_redraw();
        }
        Ok(changed)
    }

    /// Move a single-owner visual flag, such as hover or focus, from the
    /// widget in `slot` to `to`.
    fn move_flag(
        arena: &Arena,
        slot: &mut Option<NodeId>,
        to: Option<NodeId>,
        set: fn(&mut VisualState, bool) -> bool,
    ) -> Result<()> {
        if *slot == to {
            return Ok(());
        }
        if let Some(old) = *slot
            && arena.nodes.contains_key(old)
        {
            Self::update_visual(arena, old, |v| set(v, false))?;
        }
        if let Some(new) = to {
            Self::update_visual(arena, new, |v| set(v, true))?;
        }
        *slot = to;
        Ok(())
    }

    /// Turn a single-owner flag on or off for `id`, keeping `slot` in step.
    fn set_tracked(
        &self,
        slot: &Mutex<Option<NodeId>>,
        id: NodeId,
        on: bool,
        set: fn(&mut VisualState, bool) -> bool,
    ) -> Result<()> {
        let arena = self.arena.read();
        arena.get(id)?;
        let mut slot = slot.lock();
        if on {
            Self::move_flag(&arena, &mut slot, Some(id), set)
        } else if *slot == Some(id) {
            Self::move_flag(&arena, &mut slot, None, set)
        } else {
            Self::update_visual(&arena, id, |v| set(v, false)).map(|_| ())
        }
    }

    /// Enable or disable a widget. Disabled widgets draw one level dimmer and
    /// ignore hover and focus styling.
    pub fn set_enabled(&self, id: NodeId, enabled: bool) -> Result<()> {
        let arena = self.arena.read();
        Self::update_visual(&arena, id, |v| mem::replace(&mut v.enabled, enabled) != enabled)?;
        Ok(())
    }

    /// Set or clear the hover flag. At most one widget is hovered.
    pub fn set_hover(&self, id: NodeId, hover: bool) -> Result<()> {
        self.set_tracked(&self.hovered, id, hover, |v, on| {
            mem::replace(&mut v.hover, on) != on
        })
    }

    /// Set or clear the focus flag. At most one widget is focused.
    pub fn set_focus(&self, id: NodeId, focus: bool) -> Result<()> {
        self.set_tracked(&self.focused, id, focus, |v, on| {
            mem::replace(&mut v.focus, on) != on
        })
    }

    /// Schedule a redraw without touching layout.
    pub fn request_redraw(&self, id: NodeId) -> Result<()> {
        self.arena.read().get(id)?.needs.request_redraw();
        Ok(())
    }

    /// Find the widget under a point in window coordinates.
    pub fn hit_test(&self, point: Point) -> Result<Option<HitBox>> {
        let arena = self.arena.read();
        let offset = arena.get(arena.root)?.state.lock().geometry.offset_from_parent;
        hit_node(&arena, arena.root, point - offset)
    }

    /// The pointer moved to `point`. The widget under it becomes the hovered
    /// widget.
    pub fn pointer_moved(&self, point: Point) -> Result<Option<HitBox>> {
        let arena = self.arena.read();
        let offset = arena.get(arena.root)?.state.lock().geometry.offset_from_parent;
        let hit = hit_node(&arena, arena.root, point - offset)?;
        let mut hovered = self.hovered.lock();
        Self::move_flag(&arena, &mut hovered, hit.map(|h| h.node), |v, on| {
            mem::replace(&mut v.hover, on) != on
        })?;
        Ok(hit)
    }

    /// The hovered widget.
    pub fn hovered(&self) -> Option<NodeId> {
        *self.hovered.lock()
    }

    /// Give keyboard focus to a widget, or to nothing.
    pub fn focus(&self, id: Option<NodeId>) -> Result<()> {
        let arena = self.arena.read();
        if let Some(id) = id {
            arena.get(id)?;
        }
        let mut focused = self.focused.lock();
        Self::move_flag(&arena, &mut focused, id, |v, on| {
            mem::replace(&mut v.focus, on) != on
        })
    }

    /// The focused widget.
    pub fn focused(&self) -> Option<NodeId> {
        *self.focused.lock()
    }

    /// Move focus through the enabled widgets in pre-order, wrapping around.
    fn cycle_focus(&self, forward: bool) -> Result<Option<NodeId>> {
        let arena = self.arena.read();
        let candidates: Vec<NodeId> = arena
            .preorder(arena.root)?
            .into_iter()
            .filter(|id| *id != arena.root)
            .filter(|id| arena.nodes.get(*id).is_some_and(|n| n.state.lock().visual.enabled))
            .collect();
        let mut focused = self.focused.lock();
        let current = focused.and_then(|f| candidates.iter().position(|c| *c == f));
        let n = candidates.len();
        let next = match (current, forward) {
            _ if n == 0 => None,
            (Some(i), true) => Some(candidates[(i + 1) % n]),
            (Some(i), false) => Some(candidates[(i + n - 1) % n]),
            (None, true) => candidates.first().copied(),
            (None, false) => candidates.last().copied(),
        };
        if next.is_some() {
            Self::move_flag(&arena, &mut focused, next, |v, on| {
                mem::replace(&mut v.focus, on) != on
            })?;
        }
        trace!(?next, "focus");
        Ok(next)
    }

    /// Focus the next enabled widget.
    pub fn focus_next(&self) -> Result<Option<NodeId>> {
        self.cycle_focus(true)
    }

    /// Focus the previous enabled widget.
    pub fn focus_prev(&self) -> Result<Option<NodeId>> {
        self.cycle_focus(false)
    }

    /// Move a widget and its subtree to a new elevation. Descendants keep
    /// their distance from the widget.
    ///
    /// # Panics
    ///
    /// If `elevation` is not finite, or not above the parent's elevation.
    pub fn set_elevation(&self, id: NodeId, elevation: f32) -> Result<()> {
        assert!(elevation.is_finite(), "elevation {elevation} must be finite");
        let arena = self.arena.read();
        let node = arena.get(id)?;
        if let Some(parent) = node.parent {
            let floor = arena.get(parent)?.state.lock().elevation;
            assert!(
                elevation > floor,
                "elevation {elevation} must be above the parent's {floor}"
            );
        }
        let delta = elevation - node.state.lock().elevation;
        if delta == 0.0 {
            return Ok(());
        }
        for nid in arena.preorder(id)? {
            let n = arena.get(nid)?;
            n.state.lock().elevation += delta;
            n.needs.request_layout();
        }
        trace!(?id, elevation, "elevation");
        Ok(())
    }

    /// Read a widget's state under its lock.
    fn read<T>(&self, id: NodeId, f: impl FnOnce(&Node, &NodeState) -> T) -> Result<T> {
        let arena = self.arena.read();
        let node = arena.get(id)?;
        let state = node.state.lock();
        Ok(f(node, &state))
    }

    /// Geometry from the most recent layout.
    pub fn geometry(&self, id: NodeId) -> Result<Geometry> {
        self.read(id, |_, s| s.geometry)
    }

    /// The widget's sizing intent.
    pub fn extents(&self, id: NodeId) -> Result<Extents> {
        self.read(id, |_, s| s.extents)
    }

    /// The widget's elevation.
    pub fn elevation(&self, id: NodeId) -> Result<f32> {
        self.read(id, |_, s| s.elevation)
    }

    /// The widget's elevation rounded to a theme level.
    pub fn nesting_level(&self, id: NodeId) -> Result<i32> {
        self.read(id, |_, s| nesting_level(s.elevation))
    }

    /// Enabled, hover and focus flags.
    pub fn visual(&self, id: NodeId) -> Result<VisualState> {
        self.read(id, |_, s| s.visual)
    }

    /// The widget's kind name.
    pub fn name(&self, id: NodeId) -> Result<WidgetName> {
        self.read(id, |_, s| s.name.clone())
    }

    /// Pending layout and redraw flags, without consuming them.
    pub fn needs_pending(&self, id: NodeId) -> Result<Need> {
        self.read(id, |n, _| n.needs.pending())
    }

    /// The widget's parent.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.arena.read().get(id)?.parent)
    }

    /// The widget's children in draw order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.arena.read().get(id)?.children.clone())
    }

    /// Does a widget with this id exist?
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.read().nodes.contains_key(id)
    }

    /// Number of widgets, including the root.
    pub fn widget_count(&self) -> usize {
        self.arena.read().nodes.len()
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Run the layout pass. With `force`, every widget is laid out; otherwise
    /// only those whose flags or solved geometry call for it. Returns the
    /// combined need of the tree.
    pub fn layout(&self, frame: &Frame, force: bool) -> Result<Need> {
        let arena = self.arena.read();
        LayoutPass::new(&arena, &self.solver, frame, force).run()
    }

    /// Run the draw pass over the whole tree.
    pub fn draw(&self, frame: &Frame) -> Result<DrawList> {
        let window = Rect::from_parts(Point::zero(), self.extent());
        let arena = self.arena.read();
        DrawPass::new(&arena, self.theme.as_ref(), frame).run(window)
    }

    /// Produce a frame: lay out what changed, then draw if anything needs
    /// drawing. Returns `None` when the previous frame is still current.
    pub fn render(&self, time: Instant) -> Result<Option<DrawList>> {
        let number = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = Frame::new(number, time);
        let _span = debug_span!("frame", number).entered();
        let force = self.force_layout.swap(false, Ordering::Relaxed);
        let need = self.layout(&frame, force)?;
        if force || need.needs_redraw() {
            Ok(Some(self.draw(&frame)?))
        } else {
            trace!("nothing to draw");
            Ok(None)
        }
    }

    /// Render the widget tree as text for debugging, optionally with ANSI
    /// colors.
    pub fn dump(&self, color: bool) -> Result<String> {
        let arena = self.arena.read();
        dump::dump(&arena, color)
    }

    /// Inspect the solver.
    pub fn with_solver<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.solver.lock())
    }

    /// Tear the window down, releasing every constraint it registered, and
    /// return the solver. Placement handles still held by callers are not
    /// released.
    pub fn into_solver(self) -> Result<S> {
        let arena = self.arena.into_inner();
        let mut solver = self.solver.into_inner();
        let pins = self.pins.into_inner();
        let mut result = Ok(());
        let mut note = |r: Result<()>| {
            if let Err(e) = r {
                warn!("releasing constraints: {e}");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        };
        for h in [pins.left, pins.bottom, pins.width, pins.height] {
            note(solver.remove_constraint(&h).map_err(Error::from));
        }
        for (_, node) in arena.nodes {
            if let Some(binding) = node.state.into_inner().binding {
                note(binding.release(&mut solver).map_err(Error::from));
            }
        }
        result.map(|()| solver)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{Harness, init_tracing};

    #[test]
    fn root_fills_the_window() -> Result<()> {
        init_tracing();
        let h = Harness::new(800.0, 600.0)?;
        assert!(h.render()?.is_some());
        let g = h.window.geometry(h.root())?;
        assert_eq!(g.window_rectangle, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(h.window.elevation(h.root())?, 0.0);
        assert_eq!(h.window.frame_count(), 1);
        assert!(h.render()?.is_none());
        Ok(())
    }

    #[test]
    fn handles_follow_widgets() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        // Four extent constraints and four pins for the root.
        assert_eq!(h.live_handles(), 8);
        let (a, _) = h.probe(h.root(), 10.0, 10.0)?;
        let (b, _) = h.probe(a, 5.0, 5.0)?;
        assert_eq!(h.live_handles(), 16);
        h.window.set_fixed_width(b, 7.0)?;
        assert_eq!(h.live_handles(), 17);
        h.window.remove(a)?;
        assert_eq!(h.live_handles(), 8);
        assert!(!h.window.contains(b));
        assert!(h.window.children(h.root())?.is_empty());
        let solver = h.window.into_solver()?;
        assert_eq!(solver.live(), 0);
        assert!(solver.inner().is_empty());
        Ok(())
    }

    #[test]
    fn extent_updates_replace_constraints() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let (a, _) = h.probe(h.root(), 10.0, 10.0)?;
        h.settle()?;
        let replaced = h.window.with_solver(|s| s.replaced());
        h.window.set_minimum_extent(a, Extent::new(20.0, 10.0))?;
        assert_eq!(h.window.with_solver(|s| s.replaced()), replaced + 1);
        // No change, no traffic, no flags.
        h.window.render(Instant::now())?;
        h.window.set_minimum_extent(a, Extent::new(20.0, 10.0))?;
        assert_eq!(h.window.with_solver(|s| s.replaced()), replaced + 1);
        assert_eq!(h.window.needs_pending(a)?, Need::empty());
        Ok(())
    }

    #[test]
    fn root_is_special() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let root = h.root();
        assert_eq!(h.window.place_left(root, 0.0), Err(Error::NoParent(root)));
        assert!(matches!(h.window.remove(root), Err(Error::Invalid(_))));
        let (a, _) = h.probe(root, 1.0, 1.0)?;
        assert!(matches!(h.window.place_below(a, a, 0.0), Err(Error::Invalid(_))));
        h.window.remove(a)?;
        assert_eq!(h.window.remove(a), Err(Error::NodeNotFound(a)));
        Ok(())
    }

    #[test]
    fn pointer_moves_hover() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let (a, _) = h.probe(h.root(), 10.0, 10.0)?;
        let (b, _) = h.probe(h.root(), 10.0, 10.0)?;
        let _l = h.window.place_left(b, 50.0)?;
        h.settle()?;

        let hit = h.window.pointer_moved(Point::new(5.0, 5.0))?;
        assert_eq!(hit.map(|h| h.node), Some(a));
        assert!(h.window.visual(a)?.hover);

        h.window.pointer_moved(Point::new(55.0, 5.0))?;
        assert_eq!(h.window.hovered(), Some(b));
        assert!(!h.window.visual(a)?.hover);
        assert!(h.window.visual(b)?.hover);

        h.window.pointer_moved(Point::new(95.0, 95.0))?;
        assert_eq!(h.window.hovered(), Some(h.root()));
        assert!(!h.window.visual(b)?.hover);
        Ok(())
    }

    #[test]
    fn focus_cycles_through_enabled_widgets() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let (a, _) = h.probe(h.root(), 1.0, 1.0)?;
        let (b, _) = h.probe(a, 1.0, 1.0)?;
        let (c, _) = h.probe(h.root(), 1.0, 1.0)?;
        h.window.set_enabled(b, false)?;

        assert_eq!(h.window.focus_next()?, Some(a));
        assert_eq!(h.window.focus_next()?, Some(c));
        assert!(!h.window.visual(a)?.focus);
        assert!(h.window.visual(c)?.focus);
        assert_eq!(h.window.focus_next()?, Some(a));
        assert_eq!(h.window.focus_prev()?, Some(c));

        h.window.set_focus(a, true)?;
        assert_eq!(h.window.focused(), Some(a));
        assert!(!h.window.visual(c)?.focus);
        h.window.remove(a)?;
        assert_eq!(h.window.focused(), None);
        assert_eq!(h.window.focus_prev()?, Some(c));
        Ok(())
    }

    #[test]
    fn elevation_moves_subtrees() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let (a, _) = h.probe(h.root(), 1.0, 1.0)?;
        let (b, _) = h.probe(a, 1.0, 1.0)?;
        assert_eq!(h.window.elevation(b)?, 2.0);
        h.settle()?;
        h.window.set_elevation(a, 3.0)?;
        assert_eq!(h.window.elevation(b)?, 4.0);
        assert_eq!(h.window.nesting_level(b)?, 4);
        assert!(h.window.needs_pending(b)?.needs_layout());
        h.render()?;
        assert_eq!(h.window.geometry(b)?.to_window.z, 4.0);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "must be above the parent")]
    fn elevation_below_parent() {
        let h = Harness::new(100.0, 100.0).unwrap();
        let (a, _) = h.probe(h.root(), 1.0, 1.0).unwrap();
        let (b, _) = h.probe(a, 1.0, 1.0).unwrap();
        h.window.set_elevation(b, 0.5).unwrap();
    }

    #[test]
    fn dump_lists_widgets() -> Result<()> {
        let h = Harness::new(100.0, 100.0)?;
        let (a, _) = h.probe(h.root(), 10.0, 10.0)?;
        h.window.set_enabled(a, false)?;
        h.settle()?;
        let out = h.window.dump(false)?;
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("container"));
        assert!(lines.iter().any(|l| l.starts_with("    probe") && l.ends_with("(disabled)")));
        assert!(out.contains("x: 0, y: 0, w: 100, h: 100"));
        assert!(out.contains("x: 0, y: 0, w: 10, h: 10"));
        assert!(h.window.dump(true)?.contains('\u{1b}'));
        Ok(())
    }
}
