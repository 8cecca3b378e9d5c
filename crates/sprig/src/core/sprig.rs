use std::any::Any;

use super::{render, routing, world::Core};
use crate::{
    Context, NodeId, TypedId,
    backend::RenderBackend,
    command::{CommandBuffer, Cursor},
    config::Config,
    dump,
    error::{Error, Result},
    event::{Event, MouseButton, MouseMotion, MouseScroll},
    geom::{Color, Rect},
    widget::Widget,
};

/// The public context: the entry point embedding code talks to.
///
/// Every operation runs to completion before returning. Structural changes
/// requested by widgets while an operation runs are applied when it
/// finishes, followed by any layout and render the operation asked for.
pub struct Sprig {
    /// The arena, routing state and backend.
    core: Core,
}

impl Default for Sprig {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Sprig {
    /// Create a context with no root and no backend.
    pub fn new(config: Config) -> Self {
        Self {
            core: Core::new(config),
        }
    }

    /// Borrow the core state.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Settle the core after an operation, reporting the operation's own
    /// error in preference to anything settling produced.
    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        let settled = self.core.settle();
        let value = result?;
        settled?;
        Ok(value)
    }

    /// Create a node for `widget`, attached under `parent` if one is given.
    pub fn create<W: Widget>(&mut self, widget: W, parent: Option<NodeId>) -> Result<TypedId<W>> {
        let result = self
            .core
            .create(Box::new(widget), parent)
            .map(TypedId::new);
        self.finish(result)
    }

    /// Attach `child` under `parent`.
    pub fn add_child(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        let result = self.core.add_child(parent.into(), child.into());
        self.finish(result)
    }

    /// Detach `child` from `parent`. The child subtree stays alive.
    pub fn remove_child(
        &mut self,
        parent: impl Into<NodeId>,
        child: impl Into<NodeId>,
    ) -> Result<()> {
        let result = self.core.remove_child(parent.into(), child.into());
        self.finish(result)
    }

    /// Free the subtree rooted at `node`, children first.
    pub fn free_tree(&mut self, node: impl Into<NodeId>) -> Result<()> {
        let result = self.core.free_tree(node.into());
        self.finish(result)
    }

    /// Bind the root of the tree.
    pub fn set_root(&mut self, node: impl Into<NodeId>) -> Result<()> {
        let result = self.core.set_root(node.into());
        self.finish(result)
    }

    /// Root node, if one is set.
    pub fn root(&self) -> Option<NodeId> {
        self.core.root()
    }

    /// Register the render backend and load the default font.
    pub fn register_backend(&mut self, backend: Box<dyn RenderBackend>) -> Result<()> {
        let result = self.core.register_backend(backend);
        self.finish(result)
    }

    /// Tear down the tree and the context.
    pub fn destroy(mut self) -> Result<()> {
        self.core.teardown()
    }

    /// Route pointer motion.
    pub fn process_mouse_motion_event(&mut self, e: &MouseMotion) -> Result<()> {
        let result = routing::dispatch_motion(&mut self.core, e);
        self.finish(result)
    }

    /// Route a button press or release.
    pub fn process_mouse_button_event(&mut self, e: &MouseButton) -> Result<()> {
        let result = routing::dispatch_button(&mut self.core, e);
        self.finish(result)
    }

    /// Route a scroll event.
    pub fn process_mouse_scroll_event(&mut self, e: &MouseScroll) -> Result<()> {
        let result = routing::dispatch_scroll(&mut self.core, e);
        self.finish(result)
    }

    /// Route any event.
    pub fn process_event(&mut self, e: &Event) -> Result<()> {
        let result = routing::dispatch(&mut self.core, e);
        self.finish(result)
    }

    /// Full layout pass.
    pub fn layout(&mut self) -> Result<()> {
        let result = self.core.layout();
        self.finish(result)
    }

    /// Render the tree into the command buffer, after applying any pending
    /// layout.
    pub fn render(&mut self) -> Result<()> {
        self.core.settle()?;
        render::render(&mut self.core)
    }

    /// Hand the command buffer to the backend.
    pub fn present(&mut self) -> Result<()> {
        self.core.present()
    }

    /// The command buffer filled by the most recent render.
    pub fn commands(&self) -> &CommandBuffer {
        self.core.commands()
    }

    /// Mutable access to the command buffer.
    pub fn commands_mut(&mut self) -> &mut CommandBuffer {
        self.core.commands_mut()
    }

    /// Move a node and its subtree.
    pub fn set_position(&mut self, node: impl Into<NodeId>, x: i32, y: i32) -> Result<()> {
        let result = self.core.set_position(node.into(), x, y);
        self.finish(result)
    }

    /// Resize a node.
    pub fn set_size(&mut self, node: impl Into<NodeId>, w: u32, h: u32) -> Result<()> {
        let result = self.core.set_size(node.into(), w, h);
        self.finish(result)
    }

    /// Move and resize a node.
    pub fn set_rect(&mut self, node: impl Into<NodeId>, rect: Rect) -> Result<()> {
        let result = self.core.set_rect(node.into(), rect);
        self.finish(result)
    }

    /// Show or hide a node.
    pub fn set_visible(&mut self, node: impl Into<NodeId>, visible: bool) -> Result<()> {
        let result = self.core.set_hidden(node.into(), !visible);
        self.finish(result)
    }

    /// Set a node's colors.
    pub fn set_colors(&mut self, node: impl Into<NodeId>, fg: Color, bg: Color) -> Result<()> {
        let result = self.core.set_colors(node.into(), fg, bg);
        self.finish(result)
    }

    /// Install or clear the overlay that takes every event.
    pub fn set_overlay(&mut self, node: Option<NodeId>) -> Result<()> {
        self.core.set_overlay(node)
    }

    /// Node under the pointer.
    pub fn mouse_focus(&self) -> Option<NodeId> {
        self.core.mouse_focus()
    }

    /// Node holding keyboard focus.
    pub fn keyboard_focus(&self) -> Option<NodeId> {
        self.core.keyboard_focus()
    }

    /// Node capturing pointer events.
    pub fn active_scrollbar(&self) -> Option<NodeId> {
        self.core.active_scrollbar()
    }

    /// Current mouse cursor.
    pub fn cursor(&self) -> Cursor {
        self.core.cursor()
    }

    /// Absolute rect of a node.
    pub fn rect(&self, node: impl Into<NodeId>) -> Result<Rect> {
        let node = node.into();
        self.core
            .node(node)
            .map(|n| n.rect())
            .ok_or(Error::NodeNotFound(node))
    }

    /// Does the node's bounding rect contain the point? Edges are inclusive.
    pub fn encloses_point(&self, node: impl Into<NodeId>, x: i32, y: i32) -> bool {
        self.core.encloses_point(node.into(), x, y)
    }

    /// Deepest visible node under the point, starting from the root.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<NodeId> {
        self.core
            .root()
            .and_then(|root| self.core.deepest_widget_with_point(root, x, y))
    }

    /// Run `f` with mutable access to a widget of type `W` and a context
    /// bound to its node.
    pub fn with_widget<W, R>(
        &mut self,
        node: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        let node = node.into();
        let result = self.core.call_widget(node, |widget, ctx| {
            let widget = (widget as &mut dyn Any)
                .downcast_mut::<W>()
                .ok_or(Error::WrongWidgetType(node))?;
            f(widget, ctx)
        });
        self.finish(result)
    }

    /// Borrow a widget as a concrete type.
    pub fn widget<W: Widget>(&self, node: impl Into<NodeId>) -> Result<&W> {
        self.core.widget(node)
    }

    /// Colored dump of the tree, for debugging.
    pub fn dump(&self) -> Result<String> {
        let root = self.core.root().ok_or(Error::NoRoot)?;
        dump::dump(&self.core, root)
    }

    /// Verify the structural invariants of the tree.
    pub fn check_tree_invariants(&self) -> Result<()> {
        self.core.check_tree_invariants()
    }
}
