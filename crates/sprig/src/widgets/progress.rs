use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::{Error, Result},
    geom::{Color, Rect},
    widget::Widget,
};

/// Reject percentages outside `0.0..=100.0`, including NaN.
fn validate(percent: f32) -> Result<f32> {
    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(Error::Invalid(format!(
            "progress {percent} outside 0..=100"
        )))
    }
}

/// A horizontal progress indicator. The node keeps whatever size it is
/// given; the fill covers `percent` of its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    /// Completion, in `0.0..=100.0`.
    percent: f32,
    /// Unfilled track color.
    track: Color,
    /// Fill color.
    fill: Color,
}

impl ProgressBar {
    /// Construct a bar at `percent`.
    pub fn new(percent: f32) -> Result<Self> {
        Ok(Self {
            percent: validate(percent)?,
            track: Color::LIGHT_GREY,
            fill: Color::BLUE,
        })
    }

    /// Build with explicit colors.
    pub fn with_colors(mut self, track: Color, fill: Color) -> Self {
        self.track = track;
        self.fill = fill;
        self
    }

    /// Current completion.
    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Update the completion. Out-of-range values leave the bar unchanged.
    pub fn set_percent(&mut self, ctx: &mut dyn Context, percent: f32) -> Result<()> {
        self.percent = validate(percent)?;
        ctx.request_render();
        Ok(())
    }

    /// The filled part of `rect`.
    fn fill_rect(&self, rect: Rect) -> Rect {
        let w = (f64::from(rect.w) * f64::from(self.percent) / 100.0).round() as u32;
        Rect::new(rect.x, rect.y, w.min(rect.w), rect.h)
    }
}

impl Widget for ProgressBar {
    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.rect();
        buf.add_rect(rect, self.track)?;
        let fill = self.fill_rect(rect);
        if fill.w > 0 {
            buf.add_rect(fill, self.fill)?;
        }
        buf.add_rect_outlined(rect, 1, ctx.fg())
    }
}
