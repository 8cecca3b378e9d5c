use crate::{
    Context, ViewContext,
    error::Result,
    event::MouseScroll,
    geom::Point,
    widget::{EventKind, Fit, Widget},
    widgets::view::child_sizes,
};

/// A fixed-size, clipped column of children that scrolls vertically.
///
/// The offset is never positive: at zero the first child sits at the top of
/// the view, and it can go no lower than the amount by which the content
/// overflows the view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListView {
    /// Space between children.
    gap: u32,
    /// Vertical scroll offset, in `[-(content - view).max(0), 0]`.
    offset: i32,
}

impl ListView {
    /// Construct an empty, unscrolled list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build with a gap between children.
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Current scroll offset.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Gap between children.
    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Scroll to `offset`, clamped into the valid range for the current
    /// content.
    pub fn set_offset(&mut self, ctx: &mut dyn Context, offset: i32) {
        let clamped = offset.clamp(-self.overflow(&*ctx), 0);
        if clamped != self.offset {
            self.offset = clamped;
            ctx.request_relayout();
            ctx.request_render();
        }
    }

    /// Change the gap.
    pub fn set_gap(&mut self, ctx: &mut dyn Context, gap: u32) {
        self.gap = gap;
        ctx.request_relayout();
    }

    /// Total height of the visible children and the gaps between them.
    fn content_height<C: ViewContext + ?Sized>(&self, ctx: &C) -> i64 {
        let sizes = child_sizes(ctx);
        let gaps = sizes.len().saturating_sub(1) as i64 * i64::from(self.gap);
        sizes.iter().map(|(_, s)| i64::from(s.h)).sum::<i64>() + gaps
    }

    /// How far the content overflows the view, never negative.
    fn overflow<C: ViewContext + ?Sized>(&self, ctx: &C) -> i32 {
        let over = self.content_height(ctx) - i64::from(ctx.rect().h);
        i32::try_from(over.max(0)).unwrap_or(i32::MAX)
    }
}

impl Widget for ListView {
    fn fit(&mut self, _ctx: &mut dyn Context) -> Result<Fit> {
        Ok(Fit::Keep)
    }

    fn assign_positions(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let rect = ctx.rect();
        let mut y = i64::from(rect.y) + i64::from(self.offset);
        for (id, size) in child_sizes(&*ctx) {
            let top = i32::try_from(y).unwrap_or(i32::MAX);
            ctx.place(id, size.at(Point::new(rect.x, top)))?;
            y += i64::from(size.h) + i64::from(self.gap);
        }
        Ok(())
    }

    fn clips_children(&self) -> bool {
        true
    }

    fn handles(&self, kind: EventKind) -> bool {
        kind == EventKind::Scroll
    }

    fn mouse_scroll(&mut self, e: &MouseScroll, ctx: &mut dyn Context) -> Result<()> {
        let step = e.delta_y * ctx.config().scroll_acceleration;
        let target = i64::from(self.offset) + step as i64;
        let target = i32::try_from(target).unwrap_or(if target < 0 { i32::MIN } else { 0 });
        tracing::debug!(offset = self.offset, target, "list scroll");
        self.set_offset(ctx, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::{Config, Core, NodeId, geom::Rect, widgets::Base};

    fn list_with_rows(rows: u32, row_h: u32) -> Result<(Core, NodeId, Vec<NodeId>)> {
        let mut core = Core::new(Config::default());
        let list = core.create(Box::new(ListView::new()), None)?;
        core.set_root(list)?;
        core.set_rect(list, Rect::new(0, 10, 50, 200))?;
        let mut children = Vec::new();
        for _ in 0..rows {
            let c = core.create(Box::new(Base), Some(list))?;
            core.set_size(c, 50, row_h)?;
            children.push(c);
        }
        core.assign_positions(list)?;
        Ok((core, list, children))
    }

    #[test]
    fn scroll_moves_and_clamps() -> Result<()> {
        let (mut core, list, children) = list_with_rows(4, 100)?;
        assert_eq!(core.node(children[0]).map(|n| n.rect().y), Some(10));
        assert_eq!(core.node(children[1]).map(|n| n.rect().y), Some(110));

        core.call_widget(list, |w, ctx| w.mouse_scroll(&MouseScroll::vertical(5, 50, -1.0), ctx))?;
        assert_eq!(core.widget::<ListView>(list)?.offset(), -100);

        core.call_widget(list, |w, ctx| w.mouse_scroll(&MouseScroll::vertical(5, 50, -5.0), ctx))?;
        assert_eq!(core.widget::<ListView>(list)?.offset(), -200);

        core.call_widget(list, |w, ctx| w.mouse_scroll(&MouseScroll::vertical(5, 50, 9.0), ctx))?;
        assert_eq!(core.widget::<ListView>(list)?.offset(), 0);
        Ok(())
    }

    #[test]
    fn short_content_does_not_scroll() -> Result<()> {
        let (mut core, list, _) = list_with_rows(1, 20)?;
        core.call_widget(list, |w, ctx| w.mouse_scroll(&MouseScroll::vertical(5, 50, -3.0), ctx))?;
        assert_eq!(core.widget::<ListView>(list)?.offset(), 0);
        Ok(())
    }

    #[test]
    fn offset_shifts_children() -> Result<()> {
        let (mut core, list, children) = list_with_rows(3, 100)?;
        core.call_widget(list, |w, ctx| {
            let Some(list) = (w as &mut dyn Any).downcast_mut::<ListView>() else {
                return Ok(());
            };
            list.set_offset(ctx, -60);
            Ok(())
        })?;
        core.assign_positions(list)?;
        assert_eq!(core.node(children[0]).map(|n| n.rect().y), Some(-50));
        assert_eq!(core.node(children[2]).map(|n| n.rect().y), Some(150));
        Ok(())
    }
}
