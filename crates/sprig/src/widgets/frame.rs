use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    geom::Expanse,
    widget::{Fit, Widget},
    widgets::view::child_sizes,
};

/// A padded container that stacks its children at the same origin, with an
/// optional outline drawn in the node's foreground color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Space between the border and the children.
    padding: u32,
    /// Outline thickness. Zero draws no outline.
    border: u32,
}

impl Frame {
    /// Construct a frame with no padding or border.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build with padding.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Build with an outline of the given thickness.
    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    /// Padding inside the border.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Outline thickness.
    pub fn border(&self) -> u32 {
        self.border
    }

    /// Change the padding.
    pub fn set_padding(&mut self, ctx: &mut dyn Context, padding: u32) {
        self.padding = padding;
        ctx.request_relayout();
    }

    /// Change the outline thickness.
    pub fn set_border(&mut self, ctx: &mut dyn Context, border: u32) {
        self.border = border;
        ctx.request_relayout();
    }

    /// Distance from the frame edge to its children.
    fn inset(&self) -> u32 {
        self.padding.saturating_add(self.border)
    }
}

impl Widget for Frame {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let extent = child_sizes(&*ctx)
            .into_iter()
            .fold(Expanse::default(), |acc, (_, s)| {
                Expanse::new(acc.w.max(s.w), acc.h.max(s.h))
            });
        let edge = self.inset().saturating_mul(2);
        Ok(Fit::Size(extent.grow(edge, edge)))
    }

    fn assign_positions(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let origin = ctx.rect().inset(self.inset()).origin();
        for (id, size) in child_sizes(&*ctx) {
            ctx.place(id, size.at(origin))?;
        }
        Ok(())
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.rect();
        let bg = ctx.bg();
        if !bg.is_transparent() {
            buf.add_rect(rect, bg)?;
        }
        if self.border > 0 {
            buf.add_rect_outlined(rect, self.border, ctx.fg())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Config, Core, CoreViewContext,
        command::Command,
        geom::{Color, Rect},
        widgets::Base,
    };

    #[test]
    fn padding_and_border_surround_children() -> Result<()> {
        let mut core = Core::new(Config::default());
        let frame = core.create(Box::new(Frame::new().with_padding(3).with_border(1)), None)?;
        core.set_root(frame)?;
        let a = core.create(Box::new(Base), Some(frame))?;
        let b = core.create(Box::new(Base), Some(frame))?;
        core.set_rect(a, Rect::new(0, 0, 10, 2))?;
        core.set_rect(b, Rect::new(0, 0, 4, 6))?;
        core.set_position(frame, 10, 20)?;

        let fit = core.call_widget(frame, |w, ctx| match w.fit(ctx)? {
            Fit::Size(s) => Ok(s),
            Fit::Keep => Ok(Expanse::default()),
        })?;
        assert_eq!(fit, Expanse::new(18, 14));

        core.call_widget(frame, |w, ctx| w.assign_positions(ctx))?;
        assert_eq!(core.node(a).map(|n| n.rect()), Some(Rect::new(14, 24, 10, 2)));
        assert_eq!(core.node(b).map(|n| n.rect()), Some(Rect::new(14, 24, 4, 6)));
        Ok(())
    }

    #[test]
    fn renders_background_and_outline() -> Result<()> {
        let mut core = Core::new(Config::default());
        let frame = core.create(Box::new(Frame::new().with_border(2)), None)?;
        core.set_root(frame)?;
        core.set_rect(frame, Rect::new(0, 0, 20, 10))?;
        core.set_colors(frame, Color::BLUE, Color::WHITE)?;
        let mut buf = CommandBuffer::new();
        core.with_widget_mut(frame, |w, core| {
            w.render(&mut buf, &CoreViewContext::new(core, frame))
        })?;
        let cmds: Vec<_> = buf.iter().cloned().collect();
        assert_eq!(
            cmds,
            vec![
                Command::Rect {
                    rect: Rect::new(0, 0, 20, 10),
                    color: Color::WHITE
                },
                Command::RectOutlined {
                    rect: Rect::new(0, 0, 20, 10),
                    thickness: 2,
                    color: Color::BLUE
                },
            ]
        );
        Ok(())
    }
}
