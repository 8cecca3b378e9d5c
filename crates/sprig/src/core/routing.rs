//! Pointer event routing.
//!
//! Targets are chosen in order of precedence: a node holding the pointer
//! capture takes motion and button events, then an overlay takes every
//! event, and otherwise the tree is hit-tested from the root. Motion and
//! button events bubble from the target to the root; scroll does not. A
//! failing hook does not stop the walk: the first error is returned once
//! every node has been visited.

use super::world::Core;
use crate::{
    NodeId,
    error::{Error, FirstError, Result},
    event::{Event, MouseButton, MouseMotion, MouseScroll},
    widget::{EventKind, Phase},
};

/// Route any event.
pub(crate) fn dispatch(core: &mut Core, event: &Event) -> Result<()> {
    match event {
        Event::Motion(e) => dispatch_motion(core, e),
        Event::Button(e) => dispatch_button(core, e),
        Event::Scroll(e) => dispatch_scroll(core, e),
    }
}

/// The live node holding the pointer capture, if any.
fn capture(core: &Core) -> Option<NodeId> {
    core.active_scrollbar.filter(|id| core.nodes.contains_key(*id))
}

/// Hit-test inside the overlay, falling back to the overlay itself.
fn overlay_target(core: &Core, x: i32, y: i32, kind: Option<EventKind>) -> Option<NodeId> {
    let overlay = core.overlay.filter(|id| core.nodes.contains_key(*id))?;
    let hit = match kind {
        Some(kind) => core.deepest_widget_with_point_and_event_type(overlay, x, y, kind),
        None => core.deepest_widget_with_point(overlay, x, y),
    };
    Some(hit.unwrap_or(overlay))
}

/// Route pointer motion.
pub(crate) fn dispatch_motion(core: &mut Core, e: &MouseMotion) -> Result<()> {
    let root = core.root.ok_or(Error::NoRoot)?;
    if let Some(captured) = capture(core) {
        return core.call_widget(captured, |w, ctx| w.mouse_motion(Phase::AtTarget, e, ctx));
    }
    let target = if core.overlay.is_some() {
        overlay_target(core, e.x, e.y, None)
    } else {
        core.deepest_widget_with_point(root, e.x, e.y)
    };

    let mut errs = FirstError::default();
    let Some(target) = target else {
        if let Some(old) = core.mouse_focus.take() {
            errs.note(core.call_widget(old, |w, ctx| w.mouse_leave(e, ctx)));
        }
        return errs.finish();
    };

    if core.mouse_focus != Some(target) {
        if let Some(old) = core.mouse_focus.take()
            && core.nodes.contains_key(old)
        {
            errs.note(core.call_widget(old, |w, ctx| w.mouse_leave(e, ctx)));
        }
        core.mouse_focus = Some(target);
        errs.note(core.call_widget(target, |w, ctx| {
            w.mouse_enter(Phase::AtTarget, e, ctx)
        }));
    }
    errs.note(core.call_widget(target, |w, ctx| {
        w.mouse_motion(Phase::AtTarget, e, ctx)
    }));

    let mut current = core.nodes.get(target).and_then(|n| n.parent);
    while let Some(id) = current {
        errs.note(core.call_widget(id, |w, ctx| w.mouse_enter(Phase::BubblingUp, e, ctx)));
        errs.note(core.call_widget(id, |w, ctx| w.mouse_motion(Phase::BubblingUp, e, ctx)));
        current = core.nodes.get(id).and_then(|n| n.parent);
    }
    errs.finish()
}

/// Deliver a button event to one node.
fn button_hook(core: &mut Core, node: NodeId, phase: Phase, e: &MouseButton) -> Result<()> {
    if e.is_pressed() {
        core.call_widget(node, |w, ctx| w.mouse_button_down(phase, e, ctx))
    } else {
        core.call_widget(node, |w, ctx| w.mouse_button_up(phase, e, ctx))
    }
}

/// Route a button press or release.
pub(crate) fn dispatch_button(core: &mut Core, e: &MouseButton) -> Result<()> {
    let root = core.root.ok_or(Error::NoRoot)?;
    if let Some(captured) = capture(core) {
        return button_hook(core, captured, Phase::AtTarget, e);
    }
    let target = if core.overlay.is_some() {
        overlay_target(core, e.x, e.y, Some(EventKind::Button))
    } else {
        core.deepest_widget_with_point_and_event_type(root, e.x, e.y, EventKind::Button)
    };
    let Some(target) = target else {
        return Ok(());
    };

    if e.is_pressed() {
        let mut current = Some(target);
        while let Some(id) = current {
            if core.accepts_focus(id) {
                core.keyboard_focus = Some(id);
                break;
            }
            current = core.nodes.get(id).and_then(|n| n.parent);
        }
    }

    let mut errs = FirstError::default();
    errs.note(button_hook(core, target, Phase::AtTarget, e));
    let mut current = core.nodes.get(target).and_then(|n| n.parent);
    while let Some(id) = current {
        errs.note(button_hook(core, id, Phase::BubblingUp, e));
        current = core.nodes.get(id).and_then(|n| n.parent);
    }
    errs.finish()
}

/// Route a scroll event. Scroll goes to a single target and never bubbles.
pub(crate) fn dispatch_scroll(core: &mut Core, e: &MouseScroll) -> Result<()> {
    let root = core.root.ok_or(Error::NoRoot)?;
    let target = if core.overlay.is_some() {
        overlay_target(core, e.x, e.y, Some(EventKind::Scroll))
    } else {
        core.deepest_widget_with_point_and_event_type(root, e.x, e.y, EventKind::Scroll)
    };
    match target {
        Some(target) => core.call_widget(target, |w, ctx| w.mouse_scroll(e, ctx)),
        None => Ok(()),
    }
}
