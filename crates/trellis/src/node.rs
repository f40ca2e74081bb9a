use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::{
    NodeId,
    binding::{ExtentBinding, Vars},
    error::{Error, Result},
    extent::Extents,
    geom::{Extent, Point, Rect, Translation},
    name::WidgetName,
    needs::{GeometryWatch, NeedsFlags},
    widget::Widget,
};

/// Geometry derived for a widget by the most recent layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Rectangle in window space, rounded to device units.
    pub window_rectangle: Rect,
    /// Origin relative to the parent's origin.
    pub offset_from_parent: Point,
    /// Origin in window space.
    pub offset_from_window: Point,
    /// Local to window coordinates.
    pub to_window: Translation,
    /// Window to local coordinates.
    pub from_window: Translation,
}

impl Geometry {
    /// The widget's size.
    pub fn extent(&self) -> Extent {
        self.window_rectangle.extent()
    }

    /// The widget's rectangle in its own coordinates, `(0, 0, w, h)`.
    pub fn local_rect(&self) -> Rect {
        self.extent().rect()
    }
}

/// Interaction state that affects how a widget is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualState {
    /// Disabled widgets render dimmed and ignore hover and focus styling.
    pub enabled: bool,
    /// The pointer is over the widget.
    pub hover: bool,
    /// The widget has keyboard focus.
    pub focus: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            enabled: true,
            hover: false,
            focus: false,
        }
    }
}

/// Mutable widget state, guarded by the widget's lock.
pub(crate) struct NodeState {
    /// Per-kind behavior.
    pub(crate) widget: Box<dyn Widget>,
    /// Kind name, cached from the widget.
    pub(crate) name: WidgetName,
    /// Z-order and nesting depth.
    pub(crate) elevation: f32,
    /// Sizing intent.
    pub(crate) extents: Extents,
    /// Constraint handles for `extents`. `None` once released.
    pub(crate) binding: Option<ExtentBinding>,
    /// Result of the last layout.
    pub(crate) geometry: Geometry,
    /// Solved-value change detection.
    pub(crate) watch: GeometryWatch,
    /// Enabled/hover/focus.
    pub(crate) visual: VisualState,
}

impl NodeState {
    /// State for a freshly registered widget.
    pub(crate) fn new(
        widget: Box<dyn Widget>,
        elevation: f32,
        extents: Extents,
        binding: ExtentBinding,
    ) -> Self {
        Self {
            name: widget.name(),
            widget,
            elevation,
            extents,
            binding: Some(binding),
            geometry: Geometry::default(),
            watch: GeometryWatch::default(),
            visual: VisualState::default(),
        }
    }
}

/// A widget record in the arena.
pub(crate) struct Node {
    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in draw order.
    pub(crate) children: Vec<NodeId>,
    /// Solver variables for this widget's rectangle.
    pub(crate) vars: Vars,
    /// Pending work.
    pub(crate) needs: NeedsFlags,
    /// Everything else. Lock before the solver, never after.
    pub(crate) state: Mutex<NodeState>,
}

impl Node {
    /// A new node with layout and redraw pending.
    pub(crate) fn new(parent: Option<NodeId>, vars: Vars, state: NodeState) -> Self {
        Self {
            parent,
            children: Vec::new(),
            vars,
            needs: NeedsFlags::new(),
            state: Mutex::new(state),
        }
    }
}

/// Widget storage for one window.
pub(crate) struct Arena {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node id.
    pub(crate) root: NodeId,
}

impl Arena {
    /// Look up a node.
    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// All nodes of the subtree rooted at `id`, parents before children.
    pub(crate) fn preorder(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        Ok(out)
    }

    /// Is `id` equal to or a descendant of `ancestor`?
    pub(crate) fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.nodes.get(c).and_then(|n| n.parent);
        }
        false
    }
}
