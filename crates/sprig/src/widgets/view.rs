use crate::{
    Context, NodeId, ViewContext,
    command::CommandBuffer,
    error::Result,
    event::{MouseButton, MouseMotion},
    geom::{Expanse, Point, Rect},
    widget::{EventKind, Fit, Phase, Widget},
    widgets::{Callback, fire},
};

/// How a `View` arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Top to bottom.
    #[default]
    Column,
    /// Left to right.
    Row,
    /// Left to right, starting a new row when the view's width runs out.
    /// The view keeps its width and grows in height.
    Wrap,
}

/// Optional pointer callbacks for containers.
#[derive(Default)]
pub struct Handlers {
    /// The pointer entered the container itself.
    pub on_enter: Option<Callback>,
    /// The pointer left the container.
    pub on_leave: Option<Callback>,
    /// A button went down on the container or a descendant.
    pub on_button_down: Option<Callback>,
    /// A button came up on the container or a descendant.
    pub on_button_up: Option<Callback>,
}

impl Handlers {
    /// Does any callback make the container a target for `kind`? Down and up
    /// are checked separately, so either one alone is enough.
    pub fn handles(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Motion => self.on_enter.is_some() || self.on_leave.is_some(),
            EventKind::Button => self.on_button_down.is_some() || self.on_button_up.is_some(),
            EventKind::Scroll => false,
        }
    }
}

/// Sizes of the visible children of the context node.
pub(crate) fn child_sizes<C: ViewContext + ?Sized>(ctx: &C) -> Vec<(NodeId, Expanse)> {
    ctx.visible_children()
        .into_iter()
        .map(|c| (c, ctx.rect_of(c).unwrap_or_default().size()))
        .collect()
}

/// Lay out `sizes` from `origin` and return each child's rect along with the
/// extent of the whole arrangement. `avail` is the width available to
/// `Flow::Wrap`.
pub(crate) fn flow_rects(
    flow: Flow,
    gap: u32,
    origin: Point,
    avail: u32,
    sizes: &[(NodeId, Expanse)],
) -> (Vec<(NodeId, Rect)>, Expanse) {
    let mut rects = Vec::with_capacity(sizes.len());
    let mut extent = Expanse::default();
    let (mut x, mut y) = (0u32, 0u32);
    let mut row_h = 0u32;
    for (i, (id, size)) in sizes.iter().enumerate() {
        let lead = if i == 0 { 0 } else { gap };
        match flow {
            Flow::Column => {
                y += lead;
                rects.push((*id, at(origin, 0, y, *size)));
                y += size.h;
                extent = Expanse::new(extent.w.max(size.w), y);
            }
            Flow::Row => {
                x += lead;
                rects.push((*id, at(origin, x, 0, *size)));
                x += size.w;
                extent = Expanse::new(x, extent.h.max(size.h));
            }
            Flow::Wrap => {
                if x > 0 && x + gap + size.w > avail {
                    y += row_h + gap;
                    x = 0;
                    row_h = 0;
                } else if x > 0 {
                    x += gap;
                }
                rects.push((*id, at(origin, x, y, *size)));
                x += size.w;
                row_h = row_h.max(size.h);
                extent = Expanse::new(extent.w.max(x), y + row_h);
            }
        }
    }
    (rects, extent)
}

/// Rect of `size` at an unsigned offset from `origin`.
fn at(origin: Point, dx: u32, dy: u32, size: Expanse) -> Rect {
    let dx = i32::try_from(dx).unwrap_or(i32::MAX);
    let dy = i32::try_from(dy).unwrap_or(i32::MAX);
    size.at(origin.offset(dx, dy))
}

/// A container that flows its children in a column, a row, or wrapped rows.
#[derive(Default)]
pub struct View {
    /// Child arrangement.
    flow: Flow,
    /// Space between children.
    gap: u32,
    /// Space around the children.
    padding: u32,
    /// Pointer callbacks.
    handlers: Handlers,
}

impl View {
    /// Construct a view with the given flow.
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            ..Default::default()
        }
    }

    /// A top-to-bottom view.
    pub fn column() -> Self {
        Self::new(Flow::Column)
    }

    /// A left-to-right view.
    pub fn row() -> Self {
        Self::new(Flow::Row)
    }

    /// A wrapping view.
    pub fn wrap() -> Self {
        Self::new(Flow::Wrap)
    }

    /// Build with a gap between children.
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Build with padding around the children.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Build with pointer callbacks.
    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Build with a button-down callback.
    pub fn on_button_down(
        mut self,
        f: impl FnMut(&mut dyn Context) -> Result<()> + 'static,
    ) -> Self {
        self.handlers.on_button_down = Some(Box::new(f));
        self
    }

    /// Build with a button-up callback.
    pub fn on_button_up(mut self, f: impl FnMut(&mut dyn Context) -> Result<()> + 'static) -> Self {
        self.handlers.on_button_up = Some(Box::new(f));
        self
    }

    /// Current flow.
    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Gap between children.
    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Padding around the children.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Change the flow.
    pub fn set_flow(&mut self, ctx: &mut dyn Context, flow: Flow) {
        self.flow = flow;
        ctx.request_relayout();
    }

    /// Change the gap.
    pub fn set_gap(&mut self, ctx: &mut dyn Context, gap: u32) {
        self.gap = gap;
        ctx.request_relayout();
    }

    /// Change the padding.
    pub fn set_padding(&mut self, ctx: &mut dyn Context, padding: u32) {
        self.padding = padding;
        ctx.request_relayout();
    }

    /// Mutable access to the pointer callbacks.
    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }
}

impl Widget for View {
    fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
        let pad = self.padding.saturating_mul(2);
        let current = ctx.rect().size();
        let sizes = child_sizes(&*ctx);
        let avail = current.w.saturating_sub(pad);
        let (_, extent) = flow_rects(self.flow, self.gap, Point::zero(), avail, &sizes);
        Ok(Fit::Size(match self.flow {
            Flow::Wrap => Expanse::new(current.w, extent.h.saturating_add(pad)),
            _ => extent.grow(pad, pad),
        }))
    }

    fn assign_positions(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let rect = ctx.rect();
        let inner = rect.inset(self.padding);
        let sizes = child_sizes(&*ctx);
        let (rects, _) = flow_rects(self.flow, self.gap, inner.origin(), inner.w, &sizes);
        for (id, r) in rects {
            ctx.place(id, r)?;
        }
        Ok(())
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let bg = ctx.bg();
        if !bg.is_transparent() {
            buf.add_rect(ctx.rect(), bg)?;
        }
        Ok(())
    }

    fn handles(&self, kind: EventKind) -> bool {
        self.handlers.handles(kind)
    }

    fn mouse_enter(&mut self, phase: Phase, _e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        if phase == Phase::AtTarget {
            fire(&mut self.handlers.on_enter, ctx)?;
        }
        Ok(())
    }

    fn mouse_leave(&mut self, _e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        fire(&mut self.handlers.on_leave, ctx)
    }

    fn mouse_button_down(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        fire(&mut self.handlers.on_button_down, ctx)
    }

    fn mouse_button_up(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        fire(&mut self.handlers.on_button_up, ctx)
    }
}
