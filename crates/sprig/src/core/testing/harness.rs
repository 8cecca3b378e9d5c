use std::sync::{Arc, Mutex};

use super::{TestBackend, TestLog};
use crate::{
    Config, NodeId, Sprig, TypedId,
    command::Command,
    error::{Error, Result},
    event::{MouseButton, MouseMotion, MouseScroll},
    geom::Expanse,
    widget::Widget,
    widgets::Base,
};

/// A harness that holds a [`Sprig`] with a [`TestBackend`] registered and a
/// plain root node of a fixed size. Tests build a tree under the root, drive
/// it with pointer events, and inspect the command buffer that the automatic
/// render after each event leaves behind.
pub struct Harness {
    /// The context under test.
    pub sprig: Sprig,
    /// Everything the backend has seen.
    pub log: Arc<Mutex<TestLog>>,
    /// The root node.
    pub root: NodeId,
}

impl Harness {
    /// A harness with the default config and an 800×600 root.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default(), Expanse::new(800, 600))
    }

    /// A harness with the default config and a root of `w`×`h`.
    pub fn with_size(w: u32, h: u32) -> Result<Self> {
        Self::with_config(Config::default(), Expanse::new(w, h))
    }

    /// A harness with an explicit config and root size.
    pub fn with_config(config: Config, size: Expanse) -> Result<Self> {
        let (log, backend) = TestBackend::create();
        let mut sprig = Sprig::new(config);
        sprig.register_backend(Box::new(backend))?;
        let root = sprig.create(Base, None)?.id();
        sprig.set_root(root)?;
        sprig.set_size(root, size.w, size.h)?;
        Ok(Self { sprig, log, root })
    }

    /// Create `widget` under `parent`.
    pub fn add<W: Widget>(&mut self, parent: NodeId, widget: W) -> Result<TypedId<W>> {
        self.sprig.create(widget, Some(parent))
    }

    /// Create `widget` under `parent` and move it to `(x, y)`.
    pub fn add_at<W: Widget>(
        &mut self,
        parent: NodeId,
        widget: W,
        x: i32,
        y: i32,
    ) -> Result<TypedId<W>> {
        let id = self.add(parent, widget)?;
        self.sprig.set_position(id, x, y)?;
        Ok(id)
    }

    /// Move the pointer.
    pub fn motion(&mut self, x: i32, y: i32) -> Result<()> {
        self.sprig
            .process_mouse_motion_event(&MouseMotion::new(x, y))
    }

    /// Press the left button.
    pub fn press(&mut self, x: i32, y: i32) -> Result<()> {
        self.sprig
            .process_mouse_button_event(&MouseButton::down(x, y))
    }

    /// Release the left button.
    pub fn release(&mut self, x: i32, y: i32) -> Result<()> {
        self.sprig.process_mouse_button_event(&MouseButton::up(x, y))
    }

    /// Move to, press and release at `(x, y)`.
    pub fn click(&mut self, x: i32, y: i32) -> Result<()> {
        self.motion(x, y)?;
        self.press(x, y)?;
        self.release(x, y)
    }

    /// Scroll vertically by `delta_y` notches.
    pub fn scroll(&mut self, x: i32, y: i32, delta_y: f32) -> Result<()> {
        self.sprig
            .process_mouse_scroll_event(&MouseScroll::vertical(x, y, delta_y))
    }

    /// A copy of the command buffer.
    pub fn commands(&self) -> Vec<Command> {
        self.sprig.commands().iter().cloned().collect()
    }

    /// Text runs in the command buffer, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sprig
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Render and hand the buffer to the backend, returning what it received.
    pub fn present(&mut self) -> Result<Vec<Command>> {
        self.sprig.render()?;
        self.sprig.present()?;
        let mut log = self
            .log
            .lock()
            .map_err(|_| Error::Backend("test log poisoned".into()))?;
        Ok(log.commands.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        Context,
        command::Cursor,
        geom::{Color, Rect},
        testing::{Recorder, RecorderLog},
        widget::{EventKind, Phase},
        widgets::{Button, ButtonState, ListView},
    };

    fn lines(log: &RecorderLog) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    /// A harness whose text is 32 high, so "Hola!" with 20/10 padding
    /// spans (100, 100) to (220, 152).
    fn button_harness(button: Button) -> Result<(Harness, TypedId<Button>)> {
        let config = Config::default().with_font("default", 32);
        let mut h = Harness::with_config(config, Expanse::new(800, 600))?;
        let b = h.add_at(h.root, button, 100, 100)?;
        Ok((h, b))
    }

    /// A button that counts hovers and clicks.
    fn counting_button() -> (Button, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let hovers = Rc::new(Cell::new(0));
        let clicks = Rc::new(Cell::new(0));
        let (hv, cl) = (hovers.clone(), clicks.clone());
        let button = Button::new("Hola!")
            .with_padding(20, 10)
            .on_hover(move |_| {
                hv.set(hv.get() + 1);
                Ok(())
            })
            .on_click(move |_| {
                cl.set(cl.get() + 1);
                Ok(())
            });
        (button, hovers, clicks)
    }

    #[test]
    fn button_click_scenario() -> Result<()> {
        let (button, hovers, clicks) = counting_button();
        let (mut h, b) = button_harness(button)?;
        assert_eq!(h.sprig.rect(b)?, Rect::new(100, 100, 120, 52));

        h.motion(150, 150)?;
        assert_eq!(h.sprig.mouse_focus(), Some(b.id()));
        assert_eq!(hovers.get(), 1);
        assert_eq!(h.sprig.cursor(), Cursor::Hand);
        h.motion(151, 151)?;
        assert_eq!(hovers.get(), 1);

        h.press(150, 150)?;
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Pressed);
        let cmds = h.commands();
        let pressed = cmds
            .iter()
            .position(|c| matches!(c, Command::Rect { color, .. } if *color == Color::DARK_GREY));
        let text = cmds.iter().position(|c| matches!(c, Command::Text { .. }));
        assert!(matches!((pressed, text), (Some(r), Some(t)) if r < t));
        assert_eq!(h.texts(), vec!["Hola!"]);

        h.release(150, 150)?;
        assert_eq!(clicks.get(), 1);
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Hovered);
        assert_eq!(h.sprig.active_scrollbar(), None);

        h.motion(10, 10)?;
        assert_eq!(h.sprig.mouse_focus(), Some(h.root));
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Normal);
        assert_eq!(h.sprig.cursor(), Cursor::Arrow);
        Ok(())
    }

    #[test]
    fn button_release_outside_clicks() -> Result<()> {
        let (button, _, clicks) = counting_button();
        let (mut h, b) = button_harness(button)?;

        h.motion(110, 110)?;
        h.press(110, 110)?;
        assert_eq!(h.sprig.active_scrollbar(), Some(b.id()));
        h.motion(10, 10)?;
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Pressed);
        h.release(10, 10)?;
        assert_eq!(clicks.get(), 1);
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Normal);
        assert_eq!(h.sprig.active_scrollbar(), None);

        h.motion(20, 20)?;
        assert_eq!(h.sprig.mouse_focus(), Some(h.root));
        assert_eq!(h.sprig.cursor(), Cursor::Arrow);
        Ok(())
    }

    #[test]
    fn button_drag_out_and_back_clicks() -> Result<()> {
        let (button, _, clicks) = counting_button();
        let (mut h, b) = button_harness(button)?;

        h.motion(110, 110)?;
        h.press(110, 110)?;
        h.motion(10, 10)?;
        h.motion(110, 110)?;
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Pressed);
        h.release(110, 110)?;
        assert_eq!(clicks.get(), 1);
        assert_eq!(h.sprig.widget::<Button>(b)?.state(), ButtonState::Hovered);
        assert_eq!(h.sprig.mouse_focus(), Some(b.id()));
        Ok(())
    }

    #[test]
    fn list_scroll_clamp_scenario() -> Result<()> {
        let mut h = Harness::new()?;
        let list = h.add(h.root, ListView::new())?;
        h.sprig.set_rect(list, Rect::new(0, 0, 200, 200))?;
        let mut rows = Vec::new();
        for _ in 0..4 {
            let r = h.add(list.id(), Base)?;
            h.sprig.set_size(r, 200, 100)?;
            rows.push(r);
        }
        assert_eq!(h.sprig.rect(rows[3])?.y, 300);

        h.scroll(50, 50, -1.0)?;
        assert_eq!(h.sprig.rect(rows[0])?.y, -100);
        assert_eq!(h.sprig.rect(rows[1])?.y, 0);

        h.scroll(50, 50, -10.0)?;
        assert_eq!(h.sprig.widget::<ListView>(list)?.offset(), -200);
        assert_eq!(h.sprig.rect(rows[3])?.bottom(), 200);

        h.scroll(50, 50, 10.0)?;
        let view = h.sprig.rect(list)?;
        assert!(h.sprig.rect(rows[0])?.y <= view.y);
        assert_eq!(h.sprig.rect(rows[0])?.y, 0);
        assert!(
            h.commands()
                .iter()
                .any(|c| *c == Command::PushClip(Rect::new(0, 0, 200, 200)))
        );
        Ok(())
    }

    #[test]
    fn motion_bubbles_with_enter_and_leave() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let outer = h.add(h.root, Recorder::new("outer", &log))?;
        h.sprig.set_rect(outer, Rect::new(0, 0, 100, 100))?;
        let inner = h.add(outer.id(), Recorder::new("inner", &log))?;
        h.sprig.set_rect(inner, Rect::new(10, 10, 20, 20))?;
        let other = h.add(outer.id(), Recorder::new("other", &log))?;
        h.sprig.set_rect(other, Rect::new(50, 50, 20, 20))?;
        lines(&log);

        h.motion(15, 15)?;
        assert_eq!(
            lines(&log),
            vec![
                "inner enter target",
                "inner motion target",
                "outer enter bubble",
                "outer motion bubble",
            ]
        );

        h.motion(60, 60)?;
        assert_eq!(
            lines(&log),
            vec![
                "inner leave",
                "other enter target",
                "other motion target",
                "outer enter bubble",
                "outer motion bubble",
            ]
        );
        assert_eq!(h.sprig.mouse_focus(), Some(other.id()));

        h.motion(500, 500)?;
        assert_eq!(lines(&log), vec!["other leave"]);
        assert_eq!(h.sprig.mouse_focus(), Some(h.root));
        Ok(())
    }

    #[test]
    fn buttons_bubble_and_focus() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let outer = h.add(h.root, Recorder::new("outer", &log).focusable())?;
        h.sprig.set_rect(outer, Rect::new(0, 0, 100, 100))?;
        let inner = h.add(
            outer.id(),
            Recorder::new("inner", &log).handling(EventKind::Button),
        )?;
        h.sprig.set_rect(inner, Rect::new(10, 10, 20, 20))?;
        lines(&log);

        h.press(15, 15)?;
        h.release(15, 15)?;
        assert_eq!(
            lines(&log),
            vec![
                "inner down target",
                "outer down bubble",
                "inner up target",
                "outer up bubble",
            ]
        );
        assert_eq!(h.sprig.keyboard_focus(), Some(outer.id()));

        // Nothing under the point handles buttons.
        h.press(90, 90)?;
        assert!(lines(&log).is_empty());
        Ok(())
    }

    #[test]
    fn failing_hook_does_not_stop_bubbling() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let outer = h.add(h.root, Recorder::new("outer", &log))?;
        h.sprig.set_rect(outer, Rect::new(0, 0, 100, 100))?;
        let inner = h.add(
            outer.id(),
            Recorder::new("inner", &log)
                .handling(EventKind::Button)
                .failing_button(),
        )?;
        h.sprig.set_rect(inner, Rect::new(10, 10, 20, 20))?;
        lines(&log);

        assert!(matches!(h.press(15, 15), Err(Error::Invalid(_))));
        assert_eq!(lines(&log), vec!["inner down target", "outer down bubble"]);
        Ok(())
    }

    #[test]
    fn scroll_does_not_bubble() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let outer = h.add(h.root, Recorder::new("outer", &log).handling(EventKind::Scroll))?;
        h.sprig.set_rect(outer, Rect::new(0, 0, 100, 100))?;
        let inner = h.add(
            outer.id(),
            Recorder::new("inner", &log).handling(EventKind::Scroll),
        )?;
        h.sprig.set_rect(inner, Rect::new(10, 10, 20, 20))?;
        lines(&log);

        h.scroll(15, 15, 1.0)?;
        assert_eq!(lines(&log), vec!["inner scroll"]);
        h.scroll(50, 50, 1.0)?;
        assert_eq!(lines(&log), vec!["outer scroll"]);
        Ok(())
    }

    #[test]
    fn capture_then_overlay_take_precedence() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let a = h.add(h.root, Recorder::new("a", &log).handling_all())?;
        h.sprig.set_rect(a, Rect::new(0, 0, 50, 50))?;
        let popup = h.add(h.root, Recorder::new("popup", &log).handling_all())?;
        h.sprig.set_rect(popup, Rect::new(300, 300, 50, 50))?;
        lines(&log);

        h.sprig.set_overlay(Some(popup.id()))?;
        h.press(10, 10)?;
        h.scroll(10, 10, 1.0)?;
        assert_eq!(lines(&log), vec!["popup down target", "popup scroll"]);

        h.sprig.with_widget(a, |_: &mut Recorder, ctx| {
            ctx.capture();
            Ok(())
        })?;
        h.motion(310, 310)?;
        h.press(310, 310)?;
        // Scroll is not captured.
        h.scroll(310, 310, 1.0)?;
        assert_eq!(
            lines(&log),
            vec!["a motion target", "a down target", "popup scroll"]
        );
        Ok(())
    }

    /// Frees another node from inside its button hook.
    struct Remover {
        /// Node to free.
        victim: NodeId,
    }

    impl Widget for Remover {
        fn handles(&self, kind: EventKind) -> bool {
            kind == EventKind::Button
        }

        fn mouse_button_down(
            &mut self,
            phase: Phase,
            _e: &MouseButton,
            ctx: &mut dyn Context,
        ) -> Result<()> {
            if phase == Phase::AtTarget {
                let root = ctx.root_id().ok_or(Error::NoRoot)?;
                let me = ctx.node_id();
                ctx.free_tree(self.victim)?;
                ctx.remove_child(root, me)?;
            }
            Ok(())
        }
    }

    #[test]
    fn mutation_from_a_hook_is_deferred() -> Result<()> {
        let log = Recorder::log();
        let mut h = Harness::new()?;
        let victim = h.add(h.root, Recorder::new("victim", &log))?;
        h.sprig.set_rect(victim, Rect::new(100, 100, 10, 10))?;
        let remover = h.add(h.root, Remover { victim: victim.id() })?;
        h.sprig.set_rect(remover, Rect::new(0, 0, 50, 50))?;
        lines(&log);

        h.press(10, 10)?;
        assert!(!h.sprig.core().contains(victim));
        assert_eq!(lines(&log), vec!["victim free"]);
        assert!(h.sprig.core().contains(remover));
        assert_eq!(h.sprig.core().node(remover).map(|n| n.attached()), Some(false));
        assert_eq!(h.sprig.core().children_of(h.root)?, Vec::<NodeId>::new());
        h.sprig.check_tree_invariants()
    }

    #[test]
    fn present_drains_to_backend() -> Result<()> {
        let mut h = Harness::new()?;
        h.add_at(h.root, Button::new("ok"), 0, 0)?;
        let seen = h.present()?;
        assert!(matches!(seen.first(), Some(Command::Clear(_))));
        assert!(h.sprig.commands().is_empty());
        Ok(())
    }
}
