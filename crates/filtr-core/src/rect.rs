//! Rectangular regions inside a pixel buffer.
//!
//! Two types live here:
//!
//! - [`RectRequest`] - an unvalidated region as a caller describes it
//!   (floating point, possibly negative or overhanging)
//! - [`Rect`] - a region clamped to a buffer [`Shape`], always non-empty
//!   and fully inside the buffer
//!
//! Filters never see a [`RectRequest`]; the driver clamps it once.
//!
//! ```rust
//! use filtr_core::{PixelBuffer, RectRequest};
//!
//! let buf = PixelBuffer::new(10, 8).unwrap();
//! let rect = RectRequest::new(-3.0, 2.4, 50.0, 3.6).clamp(buf.shape());
//! assert_eq!((rect.left, rect.top, rect.width, rect.height), (0, 2, 10, 4));
//! ```

use crate::buffer::Shape;

/// A region clamped to buffer bounds.
///
/// Invariants: `width >= 1`, `height >= 1`, `left + width <= shape.width()`
/// and `top + height <= shape.height()` for the shape it was clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive)
    pub left: u32,
    /// Top edge (inclusive)
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// The full area of a buffer.
    #[inline]
    pub fn full(shape: Shape) -> Self {
        Self {
            left: 0,
            top: 0,
            width: shape.width(),
            height: shape.height(),
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns true if the point is inside the region.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Returns true if the region covers the whole shape.
    #[inline]
    pub fn is_full(&self, shape: Shape) -> bool {
        *self == Self::full(shape)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.left, self.top)
    }
}

/// A caller-described region, not yet validated against a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectRequest {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Width; non-positive means "to the right edge"
    pub width: f64,
    /// Height; non-positive means "to the bottom edge"
    pub height: f64,
}

impl RectRequest {
    /// Creates a request.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rounds and clips the request to `shape`.
    ///
    /// Left/top are clipped to `[0, dim - 1]`, width/height to
    /// `[1, dim - origin]`. Non-finite values count as zero.
    pub fn clamp(&self, shape: Shape) -> Rect {
        let (w, h) = (shape.width(), shape.height());
        let left = clip_origin(self.left, w);
        let top = clip_origin(self.top, h);
        Rect {
            left,
            top,
            width: clip_extent(self.width, w - left),
            height: clip_extent(self.height, h - top),
        }
    }
}

fn finite_round(v: f64) -> f64 {
    if v.is_finite() { v.round() } else { 0.0 }
}

fn clip_origin(v: f64, dim: u32) -> u32 {
    finite_round(v).clamp(0.0, (dim - 1) as f64) as u32
}

fn clip_extent(v: f64, room: u32) -> u32 {
    let v = finite_round(v);
    if v <= 0.0 {
        room
    } else {
        v.clamp(1.0, room as f64) as u32
    }
}
