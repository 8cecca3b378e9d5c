//! Built-in widgets.

use crate::{Context, ViewContext, error::Result};

/// Bare node with no behavior.
pub mod base;
/// Clickable button.
pub mod button;
/// Two-state check box.
pub mod checkbox;
/// Padded stacking container.
pub mod frame;
/// Single run of text.
pub mod label;
/// Clipped, vertically scrolling list.
pub mod list;
/// Progress indicator.
pub mod progress;
/// Scrollbar with pointer capture.
pub mod scrollbar;
/// Divider line and two-pane split container.
pub mod split;
/// On/off switch.
pub mod toggle;
/// Flow container with optional pointer callbacks.
pub mod view;

pub use base::Base;
pub use button::{Button, ButtonColors, ButtonState};
pub use checkbox::Checkbox;
pub use frame::Frame;
pub use label::Label;
pub use list::ListView;
pub use progress::ProgressBar;
pub use scrollbar::Scrollbar;
pub use split::{Split, SplitView};
pub use toggle::Toggle;
pub use view::{Flow, Handlers, View};

/// A callback fired by a widget.
pub type Callback = Box<dyn FnMut(&mut dyn Context) -> Result<()>>;

/// A callback fired by a widget with its new value.
pub type ValueCallback<T> = Box<dyn FnMut(T, &mut dyn Context) -> Result<()>>;

/// Fire an optional callback.
pub(crate) fn fire(cb: &mut Option<Callback>, ctx: &mut dyn Context) -> Result<()> {
    match cb {
        Some(cb) => cb(ctx),
        None => Ok(()),
    }
}

/// Fire an optional value callback.
pub(crate) fn fire_with<T>(
    cb: &mut Option<ValueCallback<T>>,
    value: T,
    ctx: &mut dyn Context,
) -> Result<()> {
    match cb {
        Some(cb) => cb(value, ctx),
        None => Ok(()),
    }
}

/// Font selection for text-bearing widgets. Unset fields fall back to the
/// context defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Font name.
    pub font: Option<String>,
    /// Font size.
    pub size: Option<u32>,
}

impl TextStyle {
    /// Resolve the font name and size against the context defaults.
    pub fn resolve<C: ViewContext + ?Sized>(&self, ctx: &C) -> (String, u32) {
        (
            self.font
                .clone()
                .unwrap_or_else(|| ctx.default_font().to_string()),
            self.size.unwrap_or_else(|| ctx.font_size()),
        )
    }
}
