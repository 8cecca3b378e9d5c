use std::any::{Any, type_name};

use super::{
    id::{NodeId, TypedId},
    world::{Core, Deferred, Relayout},
};
use crate::{
    command::Cursor,
    config::Config,
    error::{Error, Result},
    geom::{Color, Expanse, Rect},
    widget::Widget,
};

/// Read-only context available to widgets during render.
pub trait ViewContext {
    /// The node this context is bound to.
    fn node_id(&self) -> NodeId;

    /// The root node of the tree, if one is set.
    fn root_id(&self) -> Option<NodeId>;

    /// Absolute rect of a specific node.
    fn rect_of(&self, node: NodeId) -> Option<Rect>;

    /// Absolute rect of the current node.
    fn rect(&self) -> Rect {
        self.rect_of(self.node_id()).unwrap_or_default()
    }

    /// Children of a specific node in insertion order.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Children of the current node in insertion order.
    fn children(&self) -> Vec<NodeId> {
        self.children_of(self.node_id())
    }

    /// Children of the current node that are not hidden.
    fn visible_children(&self) -> Vec<NodeId> {
        self.children()
            .into_iter()
            .filter(|c| !self.is_hidden(*c))
            .collect()
    }

    /// Parent of a node, or `None` for the root and detached nodes.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Is the node hidden? Missing nodes count as hidden.
    fn is_hidden(&self, node: NodeId) -> bool;

    /// Foreground color of the current node.
    fn fg(&self) -> Color;

    /// Background color of the current node.
    fn bg(&self) -> Color;

    /// The context configuration.
    fn config(&self) -> &Config;

    /// Default font name.
    fn default_font(&self) -> &str {
        &self.config().default_font
    }

    /// Default font size.
    fn font_size(&self) -> u32 {
        self.config().font_size
    }

    /// Is the pointer over the current node?
    fn is_mouse_focus(&self) -> bool;

    /// Does the current node hold keyboard focus?
    fn has_keyboard_focus(&self) -> bool;

    /// Is the current node capturing pointer events?
    fn is_capturing(&self) -> bool;
}

/// Mutable context available to widgets during layout and event handling.
///
/// Structural changes (`add_child`, `remove_child`, `free_tree`) are queued
/// and applied in order once the current public operation has finished
/// dispatching. Relayout and render requests are coalesced and run once
/// afterwards.
pub trait Context: ViewContext {
    /// Measure text with the registered backend.
    fn text_dimensions(&mut self, text: &str, font: &str, size: u32) -> Result<Expanse>;

    /// Set a node's absolute rect, carrying its descendants along with it.
    /// Meant for use from `Widget::assign_positions`.
    fn place(&mut self, node: NodeId, rect: Rect) -> Result<()>;

    /// Ask for the current node to be re-fitted and the layout adjusted.
    fn request_relayout(&mut self) {
        self.request_relayout_of(self.node_id());
    }

    /// Ask for a specific node to be re-fitted and the layout adjusted.
    fn request_relayout_of(&mut self, node: NodeId);

    /// Ask for a render once the current operation completes.
    fn request_render(&mut self);

    /// Change the mouse cursor.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Route pointer motion and button events to the current node until
    /// `release` is called.
    fn capture(&mut self);

    /// Stop capturing pointer events, if the current node holds the capture.
    fn release(&mut self);

    /// Install or clear the overlay that takes every event.
    fn set_overlay(&mut self, node: Option<NodeId>);

    /// Move keyboard focus.
    fn set_keyboard_focus(&mut self, node: Option<NodeId>);

    /// Create a detached node. Attach it with `add_child`.
    fn create(&mut self, widget: Box<dyn Widget>) -> Result<NodeId>;

    /// Queue attaching `child` under `parent`.
    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Queue detaching `child` from `parent`.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Queue freeing the subtree rooted at `node`.
    fn free_tree(&mut self, node: NodeId) -> Result<()>;

    /// Show or hide a node.
    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<()>;

    /// Run a closure with mutable access to another node's widget.
    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()>;
}

impl dyn Context + '_ {
    /// Execute a closure with mutable access to a widget of type `W`.
    pub fn with_widget<W, R>(
        &mut self,
        node: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        let node = node.into();
        let mut f = Some(f);
        let mut output = None;
        self.with_widget_mut(node, &mut |widget, ctx| {
            let any = widget as &mut dyn Any;
            let widget = any.downcast_mut::<W>().ok_or_else(|| {
                tracing::debug!("expected widget type {}", type_name::<W>());
                Error::WrongWidgetType(node)
            })?;
            if let Some(f) = f.take() {
                output = Some(f(widget, ctx)?);
            }
            Ok(())
        })?;
        output.ok_or(Error::ReentrantWidgetBorrow(node))
    }

    /// Execute a closure with mutable access to a widget using a typed node ID.
    pub fn with_typed<W, R>(
        &mut self,
        node: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        self.with_widget(node.id(), f)
    }
}

/// Mutable context bound to a node.
pub struct CoreContext<'a> {
    /// Core state reference.
    core: &'a mut Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Create a new context for a node.
    pub fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl ViewContext for CoreContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> Option<NodeId> {
        self.core.root
    }

    fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.core.nodes.get(node).map(|n| n.rect)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.nodes.get(node).and_then(|n| n.parent)
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.core.nodes.get(node).is_none_or(|n| n.hidden)
    }

    fn fg(&self) -> Color {
        self.core
            .nodes
            .get(self.node_id)
            .map_or(Color::BLACK, |n| n.fg)
    }

    fn bg(&self) -> Color {
        self.core
            .nodes
            .get(self.node_id)
            .map_or(Color::TRANSPARENT, |n| n.bg)
    }

    fn config(&self) -> &Config {
        &self.core.config
    }

    fn is_mouse_focus(&self) -> bool {
        self.core.mouse_focus == Some(self.node_id)
    }

    fn has_keyboard_focus(&self) -> bool {
        self.core.keyboard_focus == Some(self.node_id)
    }

    fn is_capturing(&self) -> bool {
        self.core.active_scrollbar == Some(self.node_id)
    }
}

impl Context for CoreContext<'_> {
    fn text_dimensions(&mut self, text: &str, font: &str, size: u32) -> Result<Expanse> {
        self.core.text_dimensions(text, font, size)
    }

    fn place(&mut self, node: NodeId, rect: Rect) -> Result<()> {
        self.core.place(node, rect)
    }

    fn request_relayout_of(&mut self, node: NodeId) {
        self.core.request_layout(node, Relayout::Refit);
    }

    fn request_render(&mut self) {
        self.core.request_render();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.core.cursor != cursor {
            self.core.cursor = cursor;
            self.core.request_render();
        }
    }

    fn capture(&mut self) {
        self.core.active_scrollbar = Some(self.node_id);
    }

    fn release(&mut self) {
        if self.core.active_scrollbar == Some(self.node_id) {
            self.core.active_scrollbar = None;
        }
    }

    fn set_overlay(&mut self, node: Option<NodeId>) {
        self.core.overlay = node;
    }

    fn set_keyboard_focus(&mut self, node: Option<NodeId>) {
        self.core.keyboard_focus = node;
    }

    fn create(&mut self, widget: Box<dyn Widget>) -> Result<NodeId> {
        self.core.create(widget, None)
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.core.defer(Deferred::AddChild { parent, child })
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.core.defer(Deferred::RemoveChild { parent, child })
    }

    fn free_tree(&mut self, node: NodeId) -> Result<()> {
        self.core.defer(Deferred::FreeTree(node))
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<()> {
        self.core.set_hidden(node, hidden)
    }

    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()> {
        self.core.call_widget(node, |widget, ctx| f(widget, ctx))
    }
}

/// Read-only context bound to a node, used during render.
pub struct CoreViewContext<'a> {
    /// Core state reference.
    core: &'a Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreViewContext<'a> {
    /// Create a new view context for a node.
    pub fn new(core: &'a Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl ViewContext for CoreViewContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> Option<NodeId> {
        self.core.root
    }

    fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.core.nodes.get(node).map(|n| n.rect)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.nodes.get(node).and_then(|n| n.parent)
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.core.nodes.get(node).is_none_or(|n| n.hidden)
    }

    fn fg(&self) -> Color {
        self.core
            .nodes
            .get(self.node_id)
            .map_or(Color::BLACK, |n| n.fg)
    }

    fn bg(&self) -> Color {
        self.core
            .nodes
            .get(self.node_id)
            .map_or(Color::TRANSPARENT, |n| n.bg)
    }

    fn config(&self) -> &Config {
        &self.core.config
    }

    fn is_mouse_focus(&self) -> bool {
        self.core.mouse_focus == Some(self.node_id)
    }

    fn has_keyboard_focus(&self) -> bool {
        self.core.keyboard_focus == Some(self.node_id)
    }

    fn is_capturing(&self) -> bool {
        self.core.active_scrollbar == Some(self.node_id)
    }
}
