use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{NodeId, error::Result, node::Arena};

/// Write a colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Write a yellow state marker.
fn write_flag(buffer: &mut Buffer, flag: &str) -> Result<()> {
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(buffer, " ({flag})")?;
    buffer.reset()?;
    Ok(())
}

/// Write one widget and, indented below it, its subtree.
fn dump_node(buffer: &mut Buffer, arena: &Arena, id: NodeId, level: usize) -> Result<()> {
    let indent = "    ".repeat(level);
    let node = arena.get(id)?;
    {
        let state = node.state.lock();
        write!(buffer, "{indent}")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(buffer, "{}", state.name)?;
        buffer.reset()?;
        write!(buffer, " {id:?}")?;
        if !state.visual.enabled {
            write_flag(buffer, "disabled")?;
        }
        if state.visual.hover {
            write_flag(buffer, "hover")?;
        }
        if state.visual.focus {
            write_flag(buffer, "focus")?;
        }
        writeln!(buffer)?;

        let r = state.geometry.window_rectangle;
        write_field(
            buffer,
            &indent,
            "rect:",
            &format!("x: {}, y: {}, w: {}, h: {}", r.x, r.y, r.w, r.h),
        )?;
        write_field(buffer, &indent, "elevation:", &state.elevation.to_string())?;
        let e = state.extents;
        write_field(
            buffer,
            &indent,
            "extents:",
            &format!(
                "min {}x{}, pref {}x{}, fixed {}x{}",
                e.minimum.w, e.minimum.h, e.preferred.w, e.preferred.h, e.fixed.w, e.fixed.h
            ),
        )?;
    }
    for &child in &node.children {
        dump_node(buffer, arena, child, level + 1)?;
    }
    Ok(())
}

/// Render the tree as indented text: one entry per widget with its name,
/// state flags, rectangle, elevation and extents. This is a debug function.
pub(crate) fn dump(arena: &Arena, color: bool) -> Result<String> {
    let mut buffer = if color {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    };
    dump_node(&mut buffer, arena, arena.root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}
