//! The widget trait and the small vocabulary types its hooks use.

use std::any::{Any, type_name};

use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    event::{MouseButton, MouseMotion, MouseScroll},
    geom::{Expanse, Rect},
    name::NodeName,
};

/// Where an event is in its walk up the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The widget is the event's target.
    AtTarget,
    /// The event is bubbling through an ancestor of the target.
    BubblingUp,
}

/// Event families a widget can declare interest in for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer motion.
    Motion,
    /// Button press and release.
    Button,
    /// Scroll wheel.
    Scroll,
}

/// Outcome of `Widget::fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Keep the node's current size.
    Keep,
    /// Resize the node.
    Size(Expanse),
}

/// Widgets are the behavior attached to nodes in the arena. Every hook has a
/// default, so a widget only implements what it needs. Recursion into
/// children for layout and render is done by the core, never by the widget.
pub trait Widget: Any {
    /// The area that receives pointer events. Defaults to the node rect.
    fn bounding_rect(&self, rect: Rect) -> Rect {
        rect
    }

    /// Compute this node's size. Visible children have already been fitted
    /// when this runs as part of a full pass.
    fn fit(&mut self, _ctx: &mut dyn Context) -> Result<Fit> {
        Ok(Fit::Keep)
    }

    /// Place this node's children. The core then recurses into each child.
    fn assign_positions(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Draw this widget's own content. Does not render children.
    fn render(&mut self, _buf: &mut CommandBuffer, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Clip children to this node's rect while rendering them.
    fn clips_children(&self) -> bool {
        false
    }

    /// The pointer entered this widget, or a descendant when bubbling.
    fn mouse_enter(
        &mut self,
        _phase: Phase,
        _e: &MouseMotion,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        Ok(())
    }

    /// The pointer left this widget.
    fn mouse_leave(&mut self, _e: &MouseMotion, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// The pointer moved over this widget or one of its descendants.
    fn mouse_motion(
        &mut self,
        _phase: Phase,
        _e: &MouseMotion,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        Ok(())
    }

    /// A button was pressed.
    fn mouse_button_down(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        Ok(())
    }

    /// A button was released.
    fn mouse_button_up(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        Ok(())
    }

    /// The wheel was scrolled over this widget. Scroll events never bubble.
    fn mouse_scroll(&mut self, _e: &MouseScroll, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Does this widget take part in filtered hit testing for `kind`?
    fn handles(&self, _kind: EventKind) -> bool {
        false
    }

    /// Can this widget hold keyboard focus?
    fn accept_focus(&self) -> bool {
        false
    }

    /// Called when the node becomes reachable from the root.
    fn on_attach(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Called once, after all children are gone and before the node's
    /// storage is released.
    fn on_free(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Name used in dumps and logs.
    fn name(&self) -> NodeName {
        NodeName::of_type(type_name::<Self>())
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
