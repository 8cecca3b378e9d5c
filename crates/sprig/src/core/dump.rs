use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    NodeId,
    core::Core,
    error::{Error, Result},
    node::Node,
};

/// Traverses the subtree at `root` and returns a string showing each node's
/// name, rect and state, for visual display. This is a debug function.
pub fn dump(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, core, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Same as `dump`, without color escapes.
pub fn dump_plain(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, core, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, core: &Core, node_id: NodeId, level: usize) -> Result<()> {
    let node = core.node(node_id).ok_or(Error::NodeNotFound(node_id))?;
    write_node(buffer, core, node_id, node, level)
        .map_err(|e| Error::Invalid(format!("dump: {e}")))?;
    for child in node.children() {
        dump_node(buffer, core, *child, level + 1)?;
    }
    Ok(())
}

/// Write one line describing a node.
fn write_node(
    buffer: &mut Buffer,
    core: &Core,
    node_id: NodeId,
    node: &Node,
    level: usize,
) -> io::Result<()> {
    let indent = "    ".repeat(level);
    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name())?;
    buffer.reset()?;

    let r = node.rect();
    write!(buffer, " {node_id:?} ({}, {}) {}×{}", r.x, r.y, r.w, r.h)?;

    let mut flags = Vec::new();
    if node.hidden() {
        flags.push(("hidden", Color::Yellow));
    }
    if core.mouse_focus() == Some(node_id) {
        flags.push(("hover", Color::Magenta));
    }
    if core.keyboard_focus() == Some(node_id) {
        flags.push(("focus", Color::Magenta));
    }
    if core.active_scrollbar() == Some(node_id) {
        flags.push(("capture", Color::Red));
    }
    if core.overlay() == Some(node_id) {
        flags.push(("overlay", Color::Blue));
    }
    for (flag, color) in flags {
        write!(buffer, " ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(buffer, "{flag}")?;
        buffer.reset()?;
    }
    writeln!(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, geom::Rect, widgets::Base};

    #[test]
    fn dump_shows_structure() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.create(Box::new(Base), None)?;
        core.set_root(root)?;
        core.set_rect(root, Rect::new(0, 0, 10, 10))?;
        let child = core.create(Box::new(Base), Some(root))?;
        core.set_hidden(child, true)?;
        let out = dump_plain(&core, root)?;
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("base "));
        assert!(lines[0].contains("(0, 0) 10×10"));
        assert!(lines[1].starts_with("    base "));
        assert!(lines[1].ends_with("hidden"));
        assert!(dump(&core, root)?.contains("\u{1b}["));
        Ok(())
    }
}
