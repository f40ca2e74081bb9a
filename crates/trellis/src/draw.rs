//! The draw pass.
//!
//! Drawing is a pre-order walk from the root. Each widget inherits a
//! [`DrawContext`] from its parent, narrows it to its own clip, transform and
//! colors, and appends [`DrawCommand`]s to the frame's [`DrawList`]. Widgets
//! whose clip is empty are skipped along with their subtrees.

use std::{slice, vec};

use tracing::{debug, trace};

use crate::{
    NodeId,
    error::Result,
    frame::Frame,
    geom::{Rect, Translation},
    node::{Arena, VisualState},
    theme::{Color, Theme},
};

/// Drawing state inherited down the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawContext {
    /// The widget being drawn.
    pub node: NodeId,
    /// Window-space clip rectangle.
    pub clip: Rect,
    /// Local to window coordinates.
    pub transform: Translation,
    /// Resolved border color.
    pub border_color: Color,
    /// Resolved fill color.
    pub fill_color: Color,
}

/// A box directive for the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// The widget that emitted the command.
    pub node: NodeId,
    /// Rectangle in the widget's local coordinates.
    pub rect: Rect,
    /// Local to window coordinates.
    pub transform: Translation,
    /// Window-space clip rectangle.
    pub clip: Rect,
    /// Border color.
    pub border_color: Color,
    /// Fill color.
    pub fill_color: Color,
}

impl DrawCommand {
    /// A box covering `rect`, styled from the context.
    pub fn new(ctx: &DrawContext, rect: Rect) -> Self {
        Self {
            node: ctx.node,
            rect,
            transform: ctx.transform,
            clip: ctx.clip,
            border_color: ctx.border_color,
            fill_color: ctx.fill_color,
        }
    }

    /// The rectangle in window space, before clipping.
    pub fn window_rect(&self) -> Rect {
        self.transform.apply_rect(self.rect)
    }
}

/// The draw commands for one frame, in painter's order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    /// Frame number the list was produced for.
    frame: u64,
    /// Commands, back to front.
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// An empty list for a frame.
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            commands: Vec::new(),
        }
    }

    /// The frame this list belongs to.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Append a command.
    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over commands in order.
    pub fn iter(&self) -> slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// The commands emitted by one widget.
    pub fn for_node(&self, node: NodeId) -> Vec<&DrawCommand> {
        self.commands.iter().filter(|c| c.node == node).collect()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for DrawList {
    type Item = DrawCommand;
    type IntoIter = vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// Pick border and fill colors for a widget at `level`.
///
/// Disabled widgets are drawn one level down and ignore hover and focus.
/// Otherwise focus takes the accent border, and hover lifts the colors one
/// level up.
pub fn resolve_colors(theme: &dyn Theme, level: i32, visual: VisualState) -> (Color, Color) {
    if !visual.enabled {
        return (theme.border_color(level - 1), theme.fill_color(level - 1));
    }
    let border = if visual.focus {
        theme.accent_color()
    } else if visual.hover {
        theme.border_color(level + 1)
    } else {
        theme.border_color(level)
    };
    let fill = if visual.hover {
        theme.fill_color(level + 1)
    } else {
        theme.fill_color(level)
    };
    (border, fill)
}

/// The nesting level of a widget at `elevation`.
pub(crate) fn nesting_level(elevation: f32) -> i32 {
    elevation.round() as i32
}

/// One run of the draw pass over a window's tree.
pub(crate) struct DrawPass<'a> {
    /// The tree.
    arena: &'a Arena,
    /// Color lookups.
    theme: &'a dyn Theme,
    /// The frame being produced.
    frame: &'a Frame,
    /// Widgets pruned by clipping.
    clipped: usize,
}

impl<'a> DrawPass<'a> {
    /// Prepare a pass.
    pub(crate) fn new(arena: &'a Arena, theme: &'a dyn Theme, frame: &'a Frame) -> Self {
        Self {
            arena,
            theme,
            frame,
            clipped: 0,
        }
    }

    /// Draw the whole tree, clipped to `window`.
    pub(crate) fn run(mut self, window: Rect) -> Result<DrawList> {
        let root = self.arena.root;
        let ctx = DrawContext {
            node: root,
            clip: window,
            transform: Translation::identity(),
            border_color: self.theme.border_color(0),
            fill_color: self.theme.fill_color(0),
        };
        let mut out = DrawList::new(self.frame.number);
        self.draw_node(root, ctx, &mut out)?;
        debug!(
            frame = self.frame.number,
            commands = out.len(),
            clipped = self.clipped,
            "draw pass"
        );
        Ok(out)
    }

    /// Draw one widget, then its children with the widget's context.
    fn draw_node(&mut self, id: NodeId, parent: DrawContext, out: &mut DrawList) -> Result<()> {
        let node = self.arena.get(id)?;
        let ctx = {
            let state = node.state.lock();
            let Some(clip) = parent.clip.intersect(&state.geometry.window_rectangle) else {
                trace!(?id, "clipped");
                self.clipped += 1;
                return Ok(());
            };
            let (border_color, fill_color) =
                resolve_colors(self.theme, nesting_level(state.elevation), state.visual);
            let ctx = DrawContext {
                node: id,
                clip,
                transform: state.geometry.to_window,
                border_color,
                fill_color,
            };
            state.widget.draw(&ctx, &state.geometry, out, self.frame);
            trace!(?id, name = %state.name, "draw");
            ctx
        };
        for &child in &node.children {
            self.draw_node(child, ctx, out)?;
        }
        Ok(())
    }
}
