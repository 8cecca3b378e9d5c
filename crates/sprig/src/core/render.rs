use std::mem;

use super::{context::CoreViewContext, world::Core};
use crate::{
    NodeId,
    command::CommandBuffer,
    error::{Error, Result},
};

/// Render the tree into the core's command buffer. The buffer is cleared
/// first, then receives a surface clear in the root's background color, the
/// current cursor, and every visible node in pre-order.
pub(crate) fn render(core: &mut Core) -> Result<()> {
    let root = core.root.ok_or(Error::NoRoot)?;
    core.render_requested = false;
    let mut buf = mem::take(&mut core.commands);
    buf.clear_commands();
    let result = render_tree(core, root, &mut buf);
    core.commands = buf;
    result
}

/// Emit the frame preamble and the tree.
fn render_tree(core: &mut Core, root: NodeId, buf: &mut CommandBuffer) -> Result<()> {
    let bg = core.nodes.get(root).map(|n| n.bg).unwrap_or_default();
    buf.add_clear(bg)?;
    buf.add_set_cursor(core.cursor)?;
    render_node(core, root, buf)
}

/// Render a node and then its children. Hidden nodes are skipped with their
/// whole subtree.
fn render_node(core: &mut Core, node_id: NodeId, buf: &mut CommandBuffer) -> Result<()> {
    let Some(node) = core.nodes.get(node_id) else {
        return Err(Error::NodeNotFound(node_id));
    };
    if node.hidden {
        return Ok(());
    }
    let rect = node.rect;
    let clips = node.widget.as_deref().is_some_and(|w| w.clips_children());
    let children = node.children.clone();

    core.with_widget_mut(node_id, |widget, core| {
        let ctx = CoreViewContext::new(core, node_id);
        widget.render(buf, &ctx)
    })?;

    if children.is_empty() {
        return Ok(());
    }
    if clips {
        buf.add_push_clip(rect)?;
    }
    for child in children {
        render_node(core, child, buf)?;
    }
    if clips {
        buf.add_pop_clip()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Config, ViewContext,
        command::{Command, Cursor},
        geom::{Color, Point, Rect},
        widget::Widget,
    };

    /// Draws its label as text at its origin.
    struct Tag(&'static str);

    impl Widget for Tag {
        fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
            buf.add_text(self.0, ctx.rect().origin(), "mono", 10, Color::BLACK)
        }
    }

    /// Clips its children.
    struct Clipper;

    impl Widget for Clipper {
        fn clips_children(&self) -> bool {
            true
        }
    }

    fn texts(core: &Core) -> Vec<String> {
        core.commands()
            .iter()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pre_order_with_preamble() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.create(Box::new(Tag("root")), None)?;
        core.set_root(root)?;
        core.set_colors(root, Color::BLACK, Color::WHITE)?;
        let a = core.create(Box::new(Tag("a")), Some(root))?;
        core.create(Box::new(Tag("a1")), Some(a))?;
        core.create(Box::new(Tag("b")), Some(root))?;
        render(&mut core)?;
        let cmds: Vec<_> = core.commands().iter().cloned().collect();
        assert_eq!(cmds[0], Command::Clear(Color::WHITE));
        assert_eq!(cmds[1], Command::SetCursor(Cursor::Arrow));
        assert_eq!(texts(&core), vec!["root", "a", "a1", "b"]);
        assert!(!core.render_requested);

        core.set_hidden(a, true)?;
        render(&mut core)?;
        assert_eq!(texts(&core), vec!["root", "b"]);
        Ok(())
    }

    #[test]
    fn clip_wraps_children() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.create(Box::new(Clipper), None)?;
        core.set_root(root)?;
        core.set_rect(root, Rect::new(0, 0, 10, 10))?;
        core.create(Box::new(Tag("inner")), Some(root))?;
        render(&mut core)?;
        let cmds: Vec<_> = core.commands().iter().cloned().collect();
        assert_eq!(cmds.len(), 5);
        assert_eq!(cmds[2], Command::PushClip(Rect::new(0, 0, 10, 10)));
        assert!(matches!(cmds[3], Command::Text { origin, .. } if origin == Point::zero()));
        assert_eq!(cmds[4], Command::PopClip);
        Ok(())
    }

    #[test]
    fn render_needs_root() {
        let mut core = Core::new(Config::default());
        assert_eq!(render(&mut core), Err(Error::NoRoot));
    }
}
