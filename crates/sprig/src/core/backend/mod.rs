//! The contract between the toolkit and a concrete renderer.


use crate::{
    command::{Command, CommandBuffer},
    error::Result,
    geom::Expanse,
};

/// A render backend consumes render commands and answers text metric
/// queries. Concrete rasterizers and windowing live outside this crate.
pub trait RenderBackend {
    /// Make a font available under `name` at `size`.
    fn load_font(&mut self, name: &str, size: u32) -> Result<()>;

    /// Measure `text` set in `font` at `size`. This is called synchronously
    /// during layout and must not trigger layout itself.
    fn text_dimensions(&mut self, text: &str, font: &str, size: u32) -> Result<Expanse>;

    /// Execute a single command. Commands a backend does not support are
    /// ignored.
    fn process_command(&mut self, command: &Command) -> Result<()>;

    /// Consume the whole buffer, head first.
    fn process_command_buffer(&mut self, buf: &mut CommandBuffer) -> Result<()> {
        for command in buf.drain() {
            self.process_command(&command)?;
        }
        Ok(())
    }
}
