use crate::{
    Context, ViewContext,
    command::{CommandBuffer, Cursor},
    error::Result,
    event::{MouseButton, MouseMotion},
    geom::Color,
    widget::{EventKind, Fit, Phase, Widget},
    widgets::{Callback, TextStyle, fire},
};

/// Horizontal padding around the label, in pixels.
const PADDING_X: u32 = 20;
/// Vertical padding around the label, in pixels.
const PADDING_Y: u32 = 10;

/// Interaction state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Idle.
    #[default]
    Normal,
    /// The pointer is over the button.
    Hovered,
    /// A button went down on the button and has not come up yet.
    Pressed,
}

/// Background colors for each button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    /// Idle background.
    pub normal: Color,
    /// Background under the pointer.
    pub hovered: Color,
    /// Background while pressed.
    pub pressed: Color,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: Color::LIGHT_GREY,
            hovered: Color::GREY,
            pressed: Color::DARK_GREY,
        }
    }
}

impl ButtonColors {
    /// Background for a state.
    pub fn for_state(&self, state: ButtonState) -> Color {
        match state {
            ButtonState::Normal => self.normal,
            ButtonState::Hovered => self.hovered,
            ButtonState::Pressed => self.pressed,
        }
    }
}

/// A clickable text button.
///
/// The button sizes itself to its label plus padding. A press fires
/// `on_press` and captures the pointer until the release, which fires
/// `on_click` wherever the pointer is.
pub struct Button {
    /// Label text.
    text: String,
    /// Label font.
    style: TextStyle,
    /// Horizontal padding.
    padding_x: u32,
    /// Vertical padding.
    padding_y: u32,
    /// State backgrounds.
    colors: ButtonColors,
    /// Current interaction state.
    state: ButtonState,
    /// Fired when the pointer enters.
    on_hover: Option<Callback>,
    /// Fired on press.
    on_press: Option<Callback>,
    /// Fired on release after a press.
    on_click: Option<Callback>,
}

impl Button {
    /// Construct a button with the default padding and colors.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            padding_x: PADDING_X,
            padding_y: PADDING_Y,
            colors: ButtonColors::default(),
            state: ButtonState::Normal,
            on_hover: None,
            on_press: None,
            on_click: None,
        }
    }

    /// Build with explicit padding.
    pub fn with_padding(mut self, x: u32, y: u32) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    /// Build with explicit state colors.
    pub fn with_colors(mut self, colors: ButtonColors) -> Self {
        self.colors = colors;
        self
    }

    /// Build with an explicit font size.
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.style.size = Some(size);
        self
    }

    /// Register a callback fired when the pointer enters.
    pub fn on_hover(mut self, f: impl FnMut(&mut dyn Context) -> Result<()> + 'static) -> Self {
        self.on_hover = Some(Box::new(f));
        self
    }

    /// Register a callback fired on press.
    pub fn on_press(mut self, f: impl FnMut(&mut dyn Context) -> Result<()> + 'static) -> Self {
        self.on_press = Some(Box::new(f));
        self
    }

    /// Register a callback fired on release after a press.
    pub fn on_click(mut self, f: impl FnMut(&mut dyn Context) -> Result<()> + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current interaction state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// State colors.
    pub fn colors(&self) -> ButtonColors {
        self.colors
    }

    /// Replace the label and refit.
    pub fn set_text(&mut self, ctx: &mut dyn Context, text: impl Into<String>) {
        self.text = text.into();
        ctx.request_relayout();
        ctx.request_render();
    }

    /// Change the padding and refit.
    pub fn set_padding(&mut self, ctx: &mut dyn Context, x: u32, y: u32) {
        self.padding_x = x;
        self.padding_y = y;
        ctx.request_relayout();
    }

    /// Change the state colors.
    pub fn set_colors(&mut self, ctx: &mut dyn Context, colors: ButtonColors) {
        self.colors = colors;
        ctx.request_render();
    }

    /// Move to a new state, re-rendering if it changed.
    fn transition(&mut self, ctx: &mut dyn Context, state: ButtonState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "button state");
            self.state = state;
            ctx.request_render();
        }
    }
}

impl Widget for Button {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let (font, size) = self.style.resolve(&*ctx);
        let text = ctx.text_dimensions(&self.text, &font, size)?;
        Ok(Fit::Size(text.grow(
            self.padding_x.saturating_mul(2),
            self.padding_y.saturating_mul(2),
        )))
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.rect();
        buf.add_rect(rect, self.colors.for_state(self.state))?;
        let (font, size) = self.style.resolve(ctx);
        let origin = rect.origin().offset(
            i32::try_from(self.padding_x).unwrap_or(i32::MAX),
            i32::try_from(self.padding_y).unwrap_or(i32::MAX),
        );
        buf.add_text(&self.text, origin, &font, size, ctx.fg())
    }

    fn handles(&self, kind: EventKind) -> bool {
        matches!(kind, EventKind::Button | EventKind::Motion)
    }

    fn accept_focus(&self) -> bool {
        true
    }

    fn mouse_enter(&mut self, phase: Phase, _e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        if phase != Phase::AtTarget {
            return Ok(());
        }
        if self.state == ButtonState::Normal {
            self.transition(ctx, ButtonState::Hovered);
        }
        ctx.set_cursor(Cursor::Hand);
        fire(&mut self.on_hover, ctx)
    }

    fn mouse_leave(&mut self, _e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        // A press survives the pointer wandering off; the release decides.
        if self.state == ButtonState::Hovered {
            self.transition(ctx, ButtonState::Normal);
        }
        ctx.set_cursor(Cursor::Arrow);
        Ok(())
    }

    fn mouse_button_down(
        &mut self,
        phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if phase != Phase::AtTarget {
            return Ok(());
        }
        self.transition(ctx, ButtonState::Pressed);
        ctx.capture();
        fire(&mut self.on_press, ctx)
    }

    fn mouse_button_up(
        &mut self,
        phase: Phase,
        e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if phase != Phase::AtTarget || self.state != ButtonState::Pressed {
            return Ok(());
        }
        ctx.release();
        let inside = ctx.rect().encloses_point(e.x, e.y);
        let next = if inside {
            ButtonState::Hovered
        } else {
            ButtonState::Normal
        };
        self.transition(ctx, next);
        fire(&mut self.on_click, ctx)
    }
}
