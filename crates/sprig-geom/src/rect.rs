use super::{Expanse, Point};
use crate::{Error, Result, saturate};

/// A rectangle with a signed origin and unsigned size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Size without location.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// The right edge, `x + w`, saturated.
    pub fn right(&self) -> i32 {
        saturate(self.x as i64 + self.w as i64)
    }

    /// The bottom edge, `y + h`, saturated.
    pub fn bottom(&self) -> i32 {
        saturate(self.y as i64 + self.h as i64)
    }

    /// Is the point within `[x, x + w] × [y, y + h]`?
    ///
    /// Both edges are inclusive, so two siblings sharing a border both
    /// enclose a point on it. Hit testing relies on this: the first sibling
    /// in tree order wins.
    pub fn encloses_point(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px <= x + self.w as i64 && py >= y && py <= y + self.h as i64
    }

    /// Return a copy moved to `p`.
    pub fn at(&self, p: Point) -> Self {
        Self::new(p.x, p.y, self.w, self.h)
    }

    /// Return a copy with a different size.
    pub fn with_size(&self, size: Expanse) -> Self {
        Self::new(self.x, self.y, size.w, size.h)
    }

    /// Return a copy shifted by an offset.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        self.at(self.origin().offset(dx, dy))
    }

    /// Shrink by `pad` on every side. Collapses to a zero size rather than
    /// going negative.
    pub fn inset(&self, pad: u32) -> Self {
        let p = pad.min(i32::MAX as u32) as i32;
        Self::new(
            saturate(self.x as i64 + p as i64),
            saturate(self.y as i64 + p as i64),
            self.w.saturating_sub(pad.saturating_mul(2)),
            self.h.saturating_sub(pad.saturating_mul(2)),
        )
    }

    /// Intersection with another rectangle, if the overlap has a non-zero area.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(
            left,
            top,
            (right as i64 - left as i64) as u32,
            (bottom as i64 - top as i64) as u32,
        ))
    }

    /// Split off a leading slice of `len` along the width, returning
    /// `(head, tail)`.
    pub fn split_horizontal(&self, len: u32) -> Result<(Self, Self)> {
        if len > self.w {
            return Err(Error::SplitOutOfRange {
                at: len,
                extent: self.w,
            });
        }
        Ok((
            Self::new(self.x, self.y, len, self.h),
            Self::new(
                saturate(self.x as i64 + len as i64),
                self.y,
                self.w - len,
                self.h,
            ),
        ))
    }

    /// Split off a leading slice of `len` along the height, returning
    /// `(head, tail)`.
    pub fn split_vertical(&self, len: u32) -> Result<(Self, Self)> {
        if len > self.h {
            return Err(Error::SplitOutOfRange {
                at: len,
                extent: self.h,
            });
        }
        Ok((
            Self::new(self.x, self.y, self.w, len),
            Self::new(
                self.x,
                saturate(self.y as i64 + len as i64),
                self.w,
                self.h - len,
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encloses_edges_inclusive() {
        let r = Rect::new(10, 20, 30, 40);
        assert!(r.encloses_point(10, 20));
        assert!(r.encloses_point(40, 60));
        assert!(r.encloses_point(40, 20));
        assert!(r.encloses_point(10, 60));
        assert!(!r.encloses_point(41, 60));
        assert!(!r.encloses_point(40, 61));
        assert!(!r.encloses_point(9, 30));
    }

    #[test]
    fn encloses_zero_size() {
        let r = Rect::new(-5, -5, 0, 0);
        assert!(r.encloses_point(-5, -5));
        assert!(!r.encloses_point(-4, -5));
    }

    #[test]
    fn inset_collapses() {
        assert_eq!(Rect::new(0, 0, 10, 4).inset(3), Rect::new(3, 3, 4, 0));
        assert_eq!(Rect::new(0, 0, 10, 10).inset(2), Rect::new(2, 2, 6, 6));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, -5, 10, 10)),
            Some(Rect::new(5, 0, 5, 5))
        );
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn split() -> Result<()> {
        let r = Rect::new(2, 3, 10, 6);
        let (a, b) = r.split_horizontal(4)?;
        assert_eq!(a, Rect::new(2, 3, 4, 6));
        assert_eq!(b, Rect::new(6, 3, 6, 6));
        let (a, b) = r.split_vertical(6)?;
        assert_eq!(a, r);
        assert_eq!(b.h, 0);
        assert!(r.split_vertical(7).is_err());
        Ok(())
    }

    proptest! {
        #[test]
        fn corners_always_enclosed(
            x in -10_000i32..10_000,
            y in -10_000i32..10_000,
            w in 0u32..10_000,
            h in 0u32..10_000,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.encloses_point(r.x, r.y));
            prop_assert!(r.encloses_point(r.right(), r.bottom()));
            prop_assert!(!r.encloses_point(r.right() + 1, r.y));
            prop_assert!(!r.encloses_point(r.x, r.bottom() + 1));
        }

        #[test]
        fn intersection_is_enclosed_by_both(
            ax in -100i32..100, ay in -100i32..100, aw in 0u32..200, ah in 0u32..200,
            bx in -100i32..100, by in -100i32..100, bw in 0u32..200, bh in 0u32..200,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(i) = a.intersect(&b) {
                prop_assert!(a.encloses_point(i.x, i.y) && b.encloses_point(i.x, i.y));
                prop_assert!(a.encloses_point(i.right(), i.bottom()));
                prop_assert!(b.encloses_point(i.right(), i.bottom()));
            }
        }
    }
}
