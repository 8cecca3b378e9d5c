use super::{Point, Rect};

/// An `Expanse` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Expanse {
    /// Construct a new expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The area of this expanse.
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Does this expanse have a zero dimension?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return a `Rect` with the same dimensions located at `p`.
    pub fn at(&self, p: Point) -> Rect {
        Rect::new(p.x, p.y, self.w, self.h)
    }

    /// Grow both dimensions, saturating.
    pub fn grow(&self, dw: u32, dh: u32) -> Self {
        Self {
            w: self.w.saturating_add(dw),
            h: self.h.saturating_add(dh),
        }
    }

    /// True if this expanse can completely enclose the target size.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
