//! Integration tests for the command buffer and the render pass.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sprig::{
        Sprig, ViewContext, Widget,
        command::{Command, CommandBuffer, Cursor},
        error::{Error, Result},
        geom::{Color, Point, Rect},
        widgets::Base,
    };

    fn arb_command() -> impl Strategy<Value = Command> {
        let rect = (-50i32..50, -50i32..50, 0u32..100, 0u32..100)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h));
        let color = (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::rgb(r, g, b));
        prop_oneof![
            (rect.clone(), color.clone()).prop_map(|(rect, color)| Command::Rect { rect, color }),
            (rect.clone(), 1u32..5, color.clone())
                .prop_map(|(rect, thickness, color)| Command::RectOutlined {
                    rect,
                    thickness,
                    color
                }),
            ("[a-z]{0,8}", color.clone()).prop_map(|(text, color)| Command::Text {
                text,
                origin: Point::zero(),
                font: "mono".into(),
                size: 12,
                color,
            }),
            rect.prop_map(Command::PushClip),
            Just(Command::PopClip),
            Just(Command::SetCursor(Cursor::Hand)),
            color.prop_map(Command::Clear),
        ]
    }

    proptest! {
        #[test]
        fn buffer_is_fifo(cmds in prop::collection::vec(arb_command(), 0..40)) {
            let mut buf = CommandBuffer::new();
            for c in &cmds {
                buf.push(c.clone()).map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            prop_assert_eq!(buf.len(), cmds.len());
            let mut out = Vec::new();
            while let Ok(c) = buf.get_next_command() {
                out.push(c);
            }
            prop_assert_eq!(out, cmds);
            prop_assert!(buf.is_empty());
        }
    }

    #[test]
    fn pop_from_empty_is_an_error() -> Result<()> {
        let mut buf = CommandBuffer::new();
        assert_eq!(buf.get_next_command(), Err(Error::EmptyCommandBuffer));
        buf.add_pop_clip()?;
        assert_eq!(buf.get_next_command()?, Command::PopClip);
        assert_eq!(buf.get_next_command(), Err(Error::EmptyCommandBuffer));
        Ok(())
    }

    /// Fills its rect.
    struct Swatch(Color);

    impl Widget for Swatch {
        fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
            buf.add_rect(ctx.rect(), self.0)
        }
    }

    #[test]
    fn render_replaces_the_buffer() -> Result<()> {
        let mut sprig = Sprig::default();
        let root = sprig.create(Base, None)?;
        sprig.set_root(root)?;
        sprig.set_colors(root, Color::BLACK, Color::WHITE)?;
        let a = sprig.create(Swatch(Color::BLUE), Some(root.id()))?;
        sprig.set_rect(a, Rect::new(1, 2, 3, 4))?;
        sprig.create(Swatch(Color::GREEN), Some(root.id()))?;

        sprig.render()?;
        sprig.render()?;
        let cmds: Vec<_> = sprig.commands().iter().cloned().collect();
        assert_eq!(
            cmds,
            vec![
                Command::Clear(Color::WHITE),
                Command::SetCursor(Cursor::Arrow),
                Command::Rect {
                    rect: Rect::new(1, 2, 3, 4),
                    color: Color::BLUE
                },
                Command::Rect {
                    rect: Rect::zero(),
                    color: Color::GREEN
                },
            ]
        );

        sprig.set_visible(a, false)?;
        assert_eq!(sprig.commands().len(), 3);
        Ok(())
    }

    #[test]
    fn present_needs_a_backend() {
        let mut sprig = Sprig::default();
        assert_eq!(sprig.present(), Err(Error::NoBackend));
    }
}
