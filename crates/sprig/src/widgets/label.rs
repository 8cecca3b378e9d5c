use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    widget::{Fit, Widget},
    widgets::TextStyle,
};

/// A single run of text, sized to its measured dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    /// Text to draw.
    text: String,
    /// Font selection.
    style: TextStyle,
}

impl Label {
    /// Construct a label with the context's default font.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Build with an explicit font size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.style.size = Some(size);
        self
    }

    /// Build with an explicit font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.style.font = Some(font.into());
        self
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and refit.
    pub fn set_text(&mut self, ctx: &mut dyn Context, text: impl Into<String>) {
        self.text = text.into();
        ctx.request_relayout();
        ctx.request_render();
    }

    /// Change the font size and refit.
    pub fn set_size(&mut self, ctx: &mut dyn Context, size: u32) {
        self.style.size = Some(size);
        ctx.request_relayout();
    }
}

impl Widget for Label {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let (font, size) = self.style.resolve(&*ctx);
        Ok(Fit::Size(ctx.text_dimensions(&self.text, &font, size)?))
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let (font, size) = self.style.resolve(ctx);
        buf.add_text(&self.text, ctx.rect().origin(), &font, size, ctx.fg())
    }
}
