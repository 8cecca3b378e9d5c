use std::{cell::RefCell, rc::Rc};

use crate::{
    Context,
    error::{Error, Result},
    event::{MouseButton, MouseMotion, MouseScroll},
    geom::Expanse,
    widget::{EventKind, Fit, Phase, Widget},
};

/// Shared, ordered record of hook calls.
pub type RecorderLog = Rc<RefCell<Vec<String>>>;

/// Short tag for a phase in log entries.
fn tag(phase: Phase) -> &'static str {
    match phase {
        Phase::AtTarget => "target",
        Phase::BubblingUp => "bubble",
    }
}

/// A widget that appends a line to a shared log for every hook it receives,
/// as `"<label> <hook> [phase]"`. Which event kinds it handles, whether it
/// takes focus, and its fitted size are all configurable.
pub struct Recorder {
    /// Prefix for log lines.
    label: String,
    /// Shared log.
    log: RecorderLog,
    /// Event kinds this widget handles.
    kinds: Vec<EventKind>,
    /// Does the widget accept keyboard focus?
    focusable: bool,
    /// Size reported from `fit`, if any.
    size: Option<Expanse>,
    /// Fail the button-down hook.
    fail_button: bool,
}

impl Recorder {
    /// A recorder that handles nothing.
    pub fn new(label: &str, log: &RecorderLog) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
            kinds: Vec::new(),
            focusable: false,
            size: None,
            fail_button: false,
        }
    }

    /// A fresh, empty log.
    pub fn log() -> RecorderLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// Handle `kind` in filtered hit tests.
    pub fn handling(mut self, kind: EventKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Handle every event kind.
    pub fn handling_all(self) -> Self {
        self.handling(EventKind::Motion)
            .handling(EventKind::Button)
            .handling(EventKind::Scroll)
    }

    /// Accept keyboard focus.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Report a fixed size from `fit`.
    pub fn sized(mut self, w: u32, h: u32) -> Self {
        self.size = Some(Expanse::new(w, h));
        self
    }

    /// Fail every button-down hook with `Error::Invalid`.
    pub fn failing_button(mut self) -> Self {
        self.fail_button = true;
        self
    }

    /// Append a line to the log.
    fn record(&self, line: String) {
        self.log.borrow_mut().push(format!("{} {line}", self.label));
    }
}

impl Widget for Recorder {
    fn fit(&mut self, _ctx: &mut dyn Context) -> Result<Fit> {
        self.record("fit".into());
        Ok(self.size.map_or(Fit::Keep, Fit::Size))
    }

    fn mouse_enter(&mut self, phase: Phase, _e: &MouseMotion, _ctx: &mut dyn Context) -> Result<()> {
        self.record(format!("enter {}", tag(phase)));
        Ok(())
    }

    fn mouse_leave(&mut self, _e: &MouseMotion, _ctx: &mut dyn Context) -> Result<()> {
        self.record("leave".into());
        Ok(())
    }

    fn mouse_motion(&mut self, phase: Phase, _e: &MouseMotion, _ctx: &mut dyn Context) -> Result<()> {
        self.record(format!("motion {}", tag(phase)));
        Ok(())
    }

    fn mouse_button_down(
        &mut self,
        phase: Phase,
        _e: &MouseButton,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        self.record(format!("down {}", tag(phase)));
        if self.fail_button {
            return Err(Error::Invalid(format!("{} refused", self.label)));
        }
        Ok(())
    }

    fn mouse_button_up(
        &mut self,
        phase: Phase,
        _e: &MouseButton,
        _ctx: &mut dyn Context,
    ) -> Result<()> {
        self.record(format!("up {}", tag(phase)));
        Ok(())
    }

    fn mouse_scroll(&mut self, _e: &MouseScroll, _ctx: &mut dyn Context) -> Result<()> {
        self.record("scroll".into());
        Ok(())
    }

    fn handles(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn on_attach(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.record("attach".into());
        Ok(())
    }

    fn on_free(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.record("free".into());
        Ok(())
    }
}
