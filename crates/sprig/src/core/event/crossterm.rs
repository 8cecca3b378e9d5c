use crossterm::event as cevent;

use super::{Button, ButtonState, Event, MouseButton, MouseMotion, MouseScroll, TranslateEvent};
use crate::config::Config;

/// Translates crossterm mouse events. Cell coordinates are scaled by the
/// configured cell size so a terminal can drive a pixel-space tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosstermEvents {
    /// Cell width in pixels.
    cell_width: u32,
    /// Cell height in pixels.
    cell_height: u32,
}

impl Default for CrosstermEvents {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl CrosstermEvents {
    /// Construct a translator for the given cell size.
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Construct a translator from a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cell_width, config.cell_height)
    }

    /// Scale a cell coordinate into pixel space.
    fn scale(cell: u16, size: u32) -> i32 {
        i32::try_from(u32::from(cell).saturating_mul(size)).unwrap_or(i32::MAX)
    }
}

/// Translate a crossterm mouse button.
fn translate_button(b: cevent::MouseButton) -> Button {
    match b {
        cevent::MouseButton::Left => Button::Left,
        cevent::MouseButton::Right => Button::Right,
        cevent::MouseButton::Middle => Button::Middle,
    }
}

impl TranslateEvent for CrosstermEvents {
    type Raw = cevent::Event;

    fn translate(&self, raw: &cevent::Event) -> Option<Event> {
        let cevent::Event::Mouse(m) = raw else {
            return None;
        };
        let x = Self::scale(m.column, self.cell_width);
        let y = Self::scale(m.row, self.cell_height);
        let scroll = |delta_x, delta_y| {
            Event::Scroll(MouseScroll {
                x,
                y,
                delta_x,
                delta_y,
            })
        };
        Some(match m.kind {
            cevent::MouseEventKind::Down(b) => Event::Button(MouseButton {
                x,
                y,
                button: translate_button(b),
                state: ButtonState::Pressed,
            }),
            cevent::MouseEventKind::Up(b) => Event::Button(MouseButton {
                x,
                y,
                button: translate_button(b),
                state: ButtonState::Released,
            }),
            cevent::MouseEventKind::Drag(_) | cevent::MouseEventKind::Moved => {
                Event::Motion(MouseMotion { x, y })
            }
            cevent::MouseEventKind::ScrollUp => scroll(0.0, 1.0),
            cevent::MouseEventKind::ScrollDown => scroll(0.0, -1.0),
            cevent::MouseEventKind::ScrollLeft => scroll(1.0, 0.0),
            cevent::MouseEventKind::ScrollRight => scroll(-1.0, 0.0),
        })
    }
}
