//! Pointer hit testing.

use crate::{NodeId, error::Result, geom::Point, node::Arena};

/// The widget under a point and its elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    /// The widget that was hit.
    pub node: NodeId,
    /// Its elevation at the time of the query.
    pub elevation: f32,
}

/// Find the highest widget in the subtree at `id` that accepts `point`, given
/// in `id`'s local coordinates. Children are always searched, since they may
/// extend past their parent. Among equal elevations the widget visited first
/// keeps the hit: a parent over its children, an earlier sibling over a later
/// one.
pub(crate) fn hit_node(arena: &Arena, id: NodeId, point: Point) -> Result<Option<HitBox>> {
    let node = arena.get(id)?;
    let mut best = {
        let state = node.state.lock();
        state
            .widget
            .hit_test(point, &state.geometry)
            .then_some(HitBox {
                node: id,
                elevation: state.elevation,
            })
    };
    for &child in &node.children {
        let offset = arena.get(child)?.state.lock().geometry.offset_from_parent;
        if let Some(hit) = hit_node(arena, child, point - offset)?
            && best.is_none_or(|b| hit.elevation > b.elevation)
        {
            best = Some(hit);
        }
    }
    Ok(best)
}
