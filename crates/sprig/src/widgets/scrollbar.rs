use crate::{
    Context, ViewContext,
    command::CommandBuffer,
    error::Result,
    event::{MouseButton, MouseMotion},
    geom::{Color, Orientation, Rect},
    widget::{EventKind, Phase, Widget},
    widgets::{ValueCallback, fire_with},
};

/// Shortest thumb drawn, in pixels.
const MIN_THUMB: u32 = 8;

/// A scrollbar over content of `content_len`, showing `view_len` of it.
///
/// Pressing on the bar captures the pointer until release. A press on the
/// thumb grabs it where it was hit; a press on the track centers the thumb
/// under the pointer. While captured, motion drags the thumb and fires
/// `on_scroll` with the new offset.
pub struct Scrollbar {
    /// Axis the bar scrolls along.
    orientation: Orientation,
    /// Total content length.
    content_len: u32,
    /// Visible length.
    view_len: u32,
    /// Content offset, in `0..=content_len - view_len`.
    offset: u32,
    /// Where the thumb was grabbed, relative to the thumb start.
    grab: Option<u32>,
    /// Track color.
    track: Color,
    /// Thumb color.
    thumb: Color,
    /// Fired with the new offset.
    on_scroll: Option<ValueCallback<u32>>,
}

impl Scrollbar {
    /// Construct a bar at offset zero.
    pub fn new(orientation: Orientation, content_len: u32, view_len: u32) -> Self {
        Self {
            orientation,
            content_len,
            view_len,
            offset: 0,
            grab: None,
            track: Color::LIGHT_GREY,
            thumb: Color::DARK_GREY,
            on_scroll: None,
        }
    }

    /// A vertical bar.
    pub fn vertical(content_len: u32, view_len: u32) -> Self {
        Self::new(Orientation::Vertical, content_len, view_len)
    }

    /// A horizontal bar.
    pub fn horizontal(content_len: u32, view_len: u32) -> Self {
        Self::new(Orientation::Horizontal, content_len, view_len)
    }

    /// Register a callback fired with the new offset.
    pub fn on_scroll(mut self, f: impl FnMut(u32, &mut dyn Context) -> Result<()> + 'static) -> Self {
        self.on_scroll = Some(Box::new(f));
        self
    }

    /// Axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Current offset.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Total content length.
    pub fn content_len(&self) -> u32 {
        self.content_len
    }

    /// Visible length.
    pub fn view_len(&self) -> u32 {
        self.view_len
    }

    /// Is a drag in progress?
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Largest valid offset.
    pub fn max_offset(&self) -> u32 {
        self.content_len.saturating_sub(self.view_len)
    }

    /// Update the content and view lengths, clamping the offset.
    pub fn set_lengths(&mut self, ctx: &mut dyn Context, content_len: u32, view_len: u32) {
        self.content_len = content_len;
        self.view_len = view_len;
        self.offset = self.offset.min(self.max_offset());
        ctx.request_render();
    }

    /// Move to `offset`, clamped. Does not fire the callback.
    pub fn set_offset(&mut self, ctx: &mut dyn Context, offset: u32) {
        let offset = offset.min(self.max_offset());
        if offset != self.offset {
            self.offset = offset;
            ctx.request_render();
        }
    }

    /// Start and length of the track along the axis.
    fn track_span(&self, rect: Rect) -> (i32, u32) {
        match self.orientation {
            Orientation::Horizontal => (rect.x, rect.w),
            Orientation::Vertical => (rect.y, rect.h),
        }
    }

    /// Thumb length for a track of `track` pixels.
    fn thumb_len(&self, track: u32) -> u32 {
        if self.content_len <= self.view_len || self.content_len == 0 {
            return track;
        }
        let len = u64::from(track) * u64::from(self.view_len) / u64::from(self.content_len);
        u32::try_from(len).unwrap_or(track).max(MIN_THUMB).min(track)
    }

    /// Thumb start, relative to the track start.
    fn thumb_pos(&self, track: u32) -> u32 {
        let room = track - self.thumb_len(track);
        let max = self.max_offset();
        if max == 0 {
            return 0;
        }
        let pos = u64::from(room) * u64::from(self.offset) / u64::from(max);
        u32::try_from(pos).unwrap_or(room)
    }

    /// The thumb's rect within the node rect.
    fn thumb_rect(&self, rect: Rect) -> Rect {
        let (_, track) = self.track_span(rect);
        let pos = i32::try_from(self.thumb_pos(track)).unwrap_or(i32::MAX);
        let len = self.thumb_len(track);
        match self.orientation {
            Orientation::Horizontal => Rect::new(rect.x.saturating_add(pos), rect.y, len, rect.h),
            Orientation::Vertical => Rect::new(rect.x, rect.y.saturating_add(pos), rect.w, len),
        }
    }

    /// Pointer position along the axis, relative to the track start.
    fn along(&self, rect: Rect, x: i32, y: i32) -> i64 {
        let (start, _) = self.track_span(rect);
        let p = match self.orientation {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        };
        i64::from(p) - i64::from(start)
    }

    /// Move the thumb so the grab point sits under `p`, firing the callback
    /// if the offset changed.
    fn drag_to(&mut self, ctx: &mut dyn Context, p: i64, grab: u32) -> Result<()> {
        let (_, track) = self.track_span(ctx.rect());
        let room = track - self.thumb_len(track);
        let pos = (p - i64::from(grab)).clamp(0, i64::from(room));
        let offset = if room == 0 {
            0
        } else {
            let o = pos * i64::from(self.max_offset()) / i64::from(room);
            u32::try_from(o).unwrap_or(0)
        };
        if offset == self.offset {
            return Ok(());
        }
        self.offset = offset;
        ctx.request_render();
        fire_with(&mut self.on_scroll, offset, ctx)
    }
}

impl Widget for Scrollbar {
    fn render(&mut self, buf: &mut CommandBuffer, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.rect();
        buf.add_rect(rect, self.track)?;
        buf.add_rect(self.thumb_rect(rect), self.thumb)
    }

    fn handles(&self, kind: EventKind) -> bool {
        matches!(kind, EventKind::Button | EventKind::Motion)
    }

    fn mouse_button_down(
        &mut self,
        phase: Phase,
        e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if phase != Phase::AtTarget {
            return Ok(());
        }
        let rect = ctx.rect();
        let (_, track) = self.track_span(rect);
        let p = self.along(rect, e.x, e.y);
        let start = i64::from(self.thumb_pos(track));
        let len = self.thumb_len(track);
        ctx.capture();
        if p >= start && p <= start + i64::from(len) {
            self.grab = u32::try_from(p - start).ok();
            Ok(())
        } else {
            let grab = len / 2;
            self.grab = Some(grab);
            self.drag_to(ctx, p, grab)
        }
    }

    fn mouse_motion(&mut self, phase: Phase, e: &MouseMotion, ctx: &mut dyn Context) -> Result<()> {
        let Some(grab) = self.grab else {
            return Ok(());
        };
        if phase != Phase::AtTarget || !ctx.is_capturing() {
            return Ok(());
        }
        let p = self.along(ctx.rect(), e.x, e.y);
        self.drag_to(ctx, p, grab)
    }

    fn mouse_button_up(
        &mut self,
        _phase: Phase,
        _e: &MouseButton,
        ctx: &mut dyn Context,
    ) -> Result<()> {
        if self.grab.take().is_some() {
            ctx.release();
        }
        Ok(())
    }
}
