use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    event::MouseButton,
    geom::{Expanse, Point, Rect},
    widget::{EventKind, Fit, Phase, Widget},
    widgets::{TextStyle, ValueCallback, fire_with},
};

/// Gap between the box and the label.
const LABEL_GAP: u32 = 6;

/// A labelled two-state check box. The box is a square one font size on a
/// side; pressing anywhere on the widget flips the state.
pub struct Checkbox {
    /// Is the box checked?
    checked: bool,
    /// Label text.
    label: String,
    /// Label font.
    style: TextStyle,
    /// Fired with the new state after every flip.
    on_toggle: Option<ValueCallback<bool>>,
}

impl Checkbox {
    /// Construct an unchecked box.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            checked: false,
            label: label.into(),
            style: TextStyle::default(),
            on_toggle: None,
        }
    }

    /// Build with an initial state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
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

    /// Is the box checked?
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the state without firing the callback.
    pub fn set_checked(&mut self, ctx: &mut dyn Context, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            ctx.request_render();
        }
    }

    /// Flip the state and fire the callback.
    pub fn toggle(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.checked = !self.checked;
        ctx.request_render();
        fire_with(&mut self.on_toggle, self.checked, ctx)
    }

    /// The box, at the left of the widget.
    fn box_rect(rect: Rect, side: u32) -> Rect {
        Rect::new(rect.x, rect.y, side, side)
    }
}

impl Widget for Checkbox {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let (font, size) = self.style.resolve(&*ctx);
        let text = ctx.text_dimensions(&self.label, &font, size)?;
        Ok(Fit::Size(Expanse::new(
            size + LABEL_GAP + text.w,
            size.max(text.h),
        )))
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.rect();
        let (font, size) = self.style.resolve(ctx);
        let fg = ctx.fg();
        let square = Self::box_rect(rect, size);
        buf.add_rect_outlined(square, 1, fg)?;
        if self.checked {
            buf.add_rect(square.inset(size / 4), fg)?;
        }
        let offset = i32::try_from(size + LABEL_GAP).unwrap_or(i32::MAX);
        let origin = Point::new(rect.x.saturating_add(offset), rect.y);
        buf.add_text(&self.label, origin, &font, size, fg)
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
