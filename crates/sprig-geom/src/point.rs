use std::ops::{Add, Sub};

use crate::saturate;

/// A signed 2D point in window coordinates.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Point {
    /// Construct a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the origin point.
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Return true when both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Shift the point by an offset, saturating at the `i32` bounds.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: saturate(self.x as i64 + dx as i64),
            y: saturate(self.y as i64 + dy as i64),
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.offset(other.x, other.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: saturate(self.x as i64 - other.x as i64),
            y: saturate(self.y as i64 - other.y as i64),
        }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from(v: (i32, i32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_sub() {
        assert_eq!(Point::zero() + (1, 1).into(), Point::new(1, 1));
        assert_eq!(Point::new(5, 3) - Point::new(2, 7), Point::new(3, -4));
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Point::new(i32::MAX, 0).offset(10, 0).x, i32::MAX);
        assert_eq!(Point::new(i32::MIN, 0).offset(-10, 0).x, i32::MIN);
    }
}
