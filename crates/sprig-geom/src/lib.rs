//! Geometry and color primitives used across sprig.
//!
//! Everything here is inert data: coordinates are signed so widgets can be
//! scrolled above or left of the window origin, sizes are unsigned.

#![warn(missing_docs)]

/// Color values.
mod color;
/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use color::Color;
pub use error::{Error, Result};
pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;

/// Layout axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Orientation {
    /// Along the x axis.
    Horizontal,
    /// Along the y axis.
    Vertical,
}

/// Saturate an `i64` into the `i32` range.
pub(crate) fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
