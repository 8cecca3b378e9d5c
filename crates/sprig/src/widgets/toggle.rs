use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    event::MouseButton,
    geom::{Color, Expanse, Rect},
    widget::{EventKind, Fit, Phase, Widget},
    widgets::{ValueCallback, fire_with},
};

/// An on/off switch: a rounded track twice as wide as it is tall, with a
/// round knob at the left when off and at the right when on.
pub struct Toggle {
    /// Is the switch on?
    on: bool,
    /// Track height. Falls back to the context font size.
    size: Option<u32>,
    /// Track color when on.
    on_color: Color,
    /// Track color when off.
    off_color: Color,
    /// Fired with the new state after every flip.
    on_toggle: Option<ValueCallback<bool>>,
}

impl Default for Toggle {
    fn default() -> Self {
        Self {
            on: false,
            size: None,
            on_color: Color::GREEN,
            off_color: Color::GREY,
            on_toggle: None,
        }
    }
}

impl Toggle {
    /// Construct a switch in the off position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build with an initial state.
    pub fn with_on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    /// Build with an explicit track height.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Register a callback fired with the new state.
    pub fn on_toggle(
        mut self,
        f: impl FnMut(bool, &mut dyn Context) -> Result<()> + 'static,
    ) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    /// Is the switch on?
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Set the state without firing the callback.
    pub fn set_on(&mut self, ctx: &mut dyn Context, on: bool) {
        if self.on != on {
            self.on = on;
            ctx.request_render();
        }
    }

    /// Flip the state and fire the callback.
    pub fn toggle(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.on = !self.on;
        ctx.request_render();
        fire_with(&mut self.on_toggle, self.on, ctx)
    }

    /// The knob within the track.
    fn knob(&self, track: Rect) -> Rect {
        let side = track.h;
        let x = if self.on {
            track.right().saturating_sub(i32::try_from(side).unwrap_or(i32::MAX))
        } else {
            track.x
        };
        Rect::new(x, track.y, side, side).inset(2)
    }
}

impl Widget for Toggle {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let h = self.size.unwrap_or_else(|| ctx.font_size());
        Ok(Fit::Size(Expanse::new(h.saturating_mul(2), h)))
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let track = ctx.rect();
        let color = if self.on { self.on_color } else { self.off_color };
        buf.add_rounded_rect(track, track.h / 2, color)?;
        let knob = self.knob(track);
        buf.add_rounded_rect(knob, knob.h / 2, Color::WHITE)
    }

    fn handles(&self, kind: EventKind) -> bool {
        kind == EventKind::Button
    }

    fn accept_focus(&self) -> bool {
        true
    }

    fn mouse_button_down(
        &mut self,
        phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if phase == Phase::AtTarget {
            self.toggle(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{Config, Core, geom::Point};

    #[test]
    fn knob_moves_with_state() {
        let track = Rect::new(10, 0, 32, 16);
        let mut t = Toggle::new();
        assert_eq!(t.knob(track), Rect::new(12, 2, 12, 12));
        t.on = true;
        assert_eq!(t.knob(track), Rect::new(28, 2, 12, 12));
    }

    #[test]
    fn press_toggles() -> Result<()> {
        let flips = Rc::new(Cell::new(0));
        let f = flips.clone();
        let mut core = Core::new(Config::default());
        let id = core.create(
            Box::new(Toggle::new().on_toggle(move |on, _| {
                assert!(on);
                f.set(f.get() + 1);
                Ok(())
            })),
            None,
        )?;
        core.set_root(id)?;
        let down = MouseButton::down(0, 0);
        core.call_widget(id, |w, ctx| w.mouse_button_down(Phase::BubblingUp, &down, ctx))?;
        assert!(!core.widget::<Toggle>(id)?.is_on());
        core.call_widget(id, |w, ctx| w.mouse_button_down(Phase::AtTarget, &down, ctx))?;
        assert!(core.widget::<Toggle>(id)?.is_on());
        assert_eq!(flips.get(), 1);
        assert_eq!(core.node(id).map(|n| n.rect().origin()), Some(Point::zero()));
        Ok(())
    }
}
