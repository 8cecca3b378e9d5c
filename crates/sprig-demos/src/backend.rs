//! A render backend that logs.

use std::{cell::RefCell, rc::Rc};

use sprig::{backend::RenderBackend, command::Command, error::Result, geom::Expanse};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

/// Counters kept by a [`LogBackend`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogStats {
    /// Frames seen, counted by `Clear` commands.
    pub frames: usize,
    /// Commands processed.
    pub commands: usize,
    /// Text runs processed.
    pub texts: usize,
    /// Fonts loaded, as `(name, size)`.
    pub fonts: Vec<(String, u32)>,
}

/// A backend that draws nothing. Every command is logged at debug level and
/// counted, and text is measured as fixed-pitch cells half the font size
/// wide.
#[derive(Debug, Default)]
pub struct LogBackend {
    /// Shared counters.
    stats: Rc<RefCell<LogStats>>,
}

impl LogBackend {
    /// Construct a backend with empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle on the counters that outlives the move into a context.
    pub fn stats(&self) -> Rc<RefCell<LogStats>> {
        self.stats.clone()
    }

    /// Fixed-pitch text metrics.
    pub fn measure(text: &str, size: u32) -> Expanse {
        let cols = u32::try_from(text.width()).unwrap_or(u32::MAX);
        Expanse::new(cols.saturating_mul(size / 2), size)
    }
}

impl RenderBackend for LogBackend {
    fn load_font(&mut self, name: &str, size: u32) -> Result<()> {
        info!(name, size, "load font");
        self.stats.borrow_mut().fonts.push((name.to_string(), size));
        Ok(())
    }

    fn text_dimensions(&mut self, text: &str, _font: &str, size: u32) -> Result<Expanse> {
        Ok(Self::measure(text, size))
    }

    fn process_command(&mut self, command: &Command) -> Result<()> {
        let mut stats = self.stats.borrow_mut();
        match command {
            Command::Clear(_) => stats.frames += 1,
            Command::Text { .. } => stats.texts += 1,
            _ => {}
        }
        stats.commands += 1;
        debug!(?command, "draw");
        Ok(())
    }
}
