use crate::{
    Context, ViewContext,
    command::{CommandBuffer, Cursor},
    error::{Error, Result},
    event::{MouseButton, MouseMotion},
    geom::{Orientation, Point, Rect},
    widget::{EventKind, Phase, Widget},
};

/// Draw a line of `thickness` through the middle of `rect`, running along
/// `orientation`.
fn divider_line(
    buf: &mut CommandBuffer,
    rect: Rect,
    orientation: Orientation,
    thickness: u32,
    ctx: &dyn ViewContext,
) -> Result<()> {
    let (from, to) = match orientation {
        Orientation::Horizontal => {
            let y = rect.y.saturating_add(i32::try_from(rect.h / 2).unwrap_or(i32::MAX));
            (Point::new(rect.x, y), Point::new(rect.right(), y))
        }
        Orientation::Vertical => {
            let x = rect.x.saturating_add(i32::try_from(rect.w / 2).unwrap_or(i32::MAX));
            (Point::new(x, rect.y), Point::new(x, rect.bottom()))
        }
    };
    buf.add_line(from, to, thickness, ctx.fg())
}

/// A divider line. A horizontal split draws a horizontal line across the
/// middle of its rect; a vertical one draws a vertical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Direction of the line.
    orientation: Orientation,
    /// Line thickness.
    thickness: u32,
}

impl Split {
    /// Construct a divider.
    pub fn new(orientation: Orientation, thickness: u32) -> Self {
        Self {
            orientation,
            thickness,
        }
    }

    /// Direction of the line.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Line thickness.
    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Change the line thickness.
    pub fn set_thickness(&mut self, ctx: &mut dyn Context, thickness: u32) {
        self.thickness = thickness;
        ctx.request_render();
    }
}

impl Widget for Split {
    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        divider_line(buf, ctx.rect(), self.orientation, self.thickness, ctx)
    }
}

/// Two panes separated by a draggable divider. The first two visible
/// children are the panes. A horizontal split view puts them side by side;
/// a vertical one stacks them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitView {
    /// Axis along which the view is divided.
    orientation: Orientation,
    /// Share of the space given to the first pane, in `0.0..=1.0`.
    ratio: f32,
    /// Divider thickness.
    thickness: u32,
    /// Is the divider being dragged?
    dragging: bool,
}

impl SplitView {
    /// Construct a view split evenly.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ratio: 0.5,
            thickness: 4,
            dragging: false,
        }
    }

    /// Build with a divider thickness.
    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Build with a ratio. Out-of-range values are rejected.
    pub fn with_ratio(mut self, ratio: f32) -> Result<Self> {
        self.ratio = Self::validate(ratio)?;
        Ok(self)
    }

    /// Share of the space given to the first pane.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Divider thickness.
    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Is the divider being dragged?
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Change the ratio and relayout. Out-of-range values leave the view
    /// unchanged.
    pub fn set_ratio(&mut self, ctx: &mut dyn Context, ratio: f32) -> Result<()> {
        self.ratio = Self::validate(ratio)?;
        ctx.request_relayout();
        ctx.request_render();
        Ok(())
    }

    /// Reject ratios outside `0.0..=1.0`, including NaN.
    fn validate(ratio: f32) -> Result<f32> {
        if (0.0..=1.0).contains(&ratio) {
            Ok(ratio)
        } else {
            Err(Error::Invalid(format!("split ratio {ratio} outside 0..=1")))
        }
    }

    /// Length of the first pane for a view of `len` along the split axis.
    fn first_len(&self, len: u32) -> u32 {
        let avail = len.saturating_sub(self.thickness);
        ((f64::from(avail) * f64::from(self.ratio)).round() as u32).min(avail)
    }

    /// Split `rect` into the first pane, the divider, and the second pane.
    fn regions(&self, rect: Rect) -> Result<(Rect, Rect, Rect)> {
        let thickness = match self.orientation {
            Orientation::Horizontal => self.thickness.min(rect.w),
            Orientation::Vertical => self.thickness.min(rect.h),
        };
        Ok(match self.orientation {
            Orientation::Horizontal => {
                let (a, rest) = rect.split_horizontal(self.first_len(rect.w))?;
                let (d, b) = rest.split_horizontal(thickness)?;
                (a, d, b)
            }
            Orientation::Vertical => {
                let (a, rest) = rect.split_vertical(self.first_len(rect.h))?;
                let (d, b) = rest.split_vertical(thickness)?;
                (a, d, b)
            }
        })
    }

    /// The resize cursor for this axis.
    fn cursor(&self) -> Cursor {
        match self.orientation {
            Orientation::Horizontal => Cursor::ResizeHorizontal,
            Orientation::Vertical => Cursor::ResizeVertical,
        }
    }
}

impl Widget for SplitView {
    fn assign_positions(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let (a, _, b) = self.regions(ctx.rect())?;
        let panes = ctx.visible_children();
        for (id, r) in panes.into_iter().zip([a, b]) {
            ctx.place(id, r)?;
        }
        Ok(())
    }

    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let (_, divider, _) = self.regions(ctx.rect())?;
        let line = match self.orientation {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        };
        divider_line(buf, divider, line, self.thickness, ctx)
    }

    fn handles(&self, kind: EventKind) -> bool {
        kind == EventKind::Button
    }

    fn mouse_button_down(
        &mut self,
        _phase: Phase,
        e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        let (_, divider, _) = self.regions(ctx.rect())?;
        if divider.encloses_point(e.x, e.y) {
            tracing::debug!("split drag start");
            self.dragging = true;
            ctx.capture();
            ctx.set_cursor(self.cursor());
        }
        Ok(())
    }

    fn mouse_motion(&mut self, _phase: Phase, e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        if !self.dragging || !ctx.is_capturing() {
            return Ok(());
        }
        let rect = ctx.rect();
        let (start, len, p) = match self.orientation {
            Orientation::Horizontal => (rect.x, rect.w, e.x),
            Orientation::Vertical => (rect.y, rect.h, e.y),
        };
        let avail = len.saturating_sub(self.thickness);
        if avail == 0 {
            return Ok(());
        }
        let half = i64::from(self.thickness / 2);
        let first = (i64::from(p) - i64::from(start) - half).clamp(0, i64::from(avail));
        self.set_ratio(ctx, first as f32 / avail as f32)
    }

    fn mouse_button_up(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if self.dragging {
            self.dragging = false;
            ctx.release();
            ctx.set_cursor(Cursor::Arrow);
        }
        Ok(())
    }
}
