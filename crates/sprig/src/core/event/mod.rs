//! Platform-neutral input events.

/// Translation from crossterm mouse events.
pub mod crossterm;

use crate::geom::Point;

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// Whether a button went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// The button was pressed.
    Pressed,
    /// The button was released.
    Released,
}

/// The pointer moved to `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMotion {
    /// Pointer x.
    pub x: i32,
    /// Pointer y.
    pub y: i32,
}

impl MouseMotion {
    /// Construct a motion event.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A button changed state at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButton {
    /// Pointer x.
    pub x: i32,
    /// Pointer y.
    pub y: i32,
    /// Button that changed.
    pub button: Button,
    /// New state.
    pub state: ButtonState,
}

impl MouseButton {
    /// A left-button press at `(x, y)`.
    pub fn down(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: Button::Left,
            state: ButtonState::Pressed,
        }
    }

    /// A left-button release at `(x, y)`.
    pub fn up(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: Button::Left,
            state: ButtonState::Released,
        }
    }

    /// True for a press.
    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }
}

/// A wheel or trackpad scroll at `(x, y)`. Positive `delta_y` scrolls
/// content down, revealing what is above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScroll {
    /// Pointer x.
    pub x: i32,
    /// Pointer y.
    pub y: i32,
    /// Horizontal delta, in notches.
    pub delta_x: f32,
    /// Vertical delta, in notches.
    pub delta_y: f32,
}

impl MouseScroll {
    /// A vertical scroll at `(x, y)`.
    pub fn vertical(x: i32, y: i32, delta_y: f32) -> Self {
        Self {
            x,
            y,
            delta_x: 0.0,
            delta_y,
        }
    }
}

/// Any input event the toolkit routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer motion.
    Motion(MouseMotion),
    /// Button press or release.
    Button(MouseButton),
    /// Scroll.
    Scroll(MouseScroll),
}

impl Event {
    /// Pointer location of the event.
    pub fn location(&self) -> Point {
        match self {
            Self::Motion(m) => Point::new(m.x, m.y),
            Self::Button(b) => Point::new(b.x, b.y),
            Self::Scroll(s) => Point::new(s.x, s.y),
        }
    }
}

impl From<MouseMotion> for Event {
    fn from(e: MouseMotion) -> Self {
        Self::Motion(e)
    }
}

impl From<MouseButton> for Event {
    fn from(e: MouseButton) -> Self {
        Self::Button(e)
    }
}

impl From<MouseScroll> for Event {
    fn from(e: MouseScroll) -> Self {
        Self::Scroll(e)
    }
}

/// Converts raw platform events into neutral events. Events with no
/// neutral counterpart translate to `None`.
pub trait TranslateEvent {
    /// The platform's event type.
    type Raw;

    /// Translate a raw event.
    fn translate(&self, raw: &Self::Raw) -> Option<Event>;
}
