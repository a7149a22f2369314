//! Error types for filtr-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of buffer construction:
//! - Zero or overflowing dimensions
//! - Raw byte slices whose length does not match the declared shape
//! - Companion buffers whose shape differs from the base buffer
//!
//! Reads and writes through a [`crate::PixelOffset`] never fail: offsets are
//! only produced in bounds, by the traversal strategies or by checked
//! lookups. Handing an offset to a buffer of another shape panics.
//!
//! # Usage
//!
//! ```rust
//! use filtr_core::{Error, PixelBuffer};
//!
//! let err = PixelBuffer::new(0, 10).unwrap_err();
//! assert!(err.is_invalid_dimensions());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or combining pixel buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid buffer dimensions.
    ///
    /// Returned when width or height is zero, when `width * height * 4`
    /// overflows `usize`, or when the pixel count exceeds
    /// [`crate::PixelBuffer::MAX_PIXELS`].
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Raw pixel data does not hold exactly `width * height * 4` bytes.
    #[error("buffer length {got} does not match {width}x{height} RGBA (expected {expected})")]
    LengthMismatch {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },

    /// Buffer dimensions don't match for the operation.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },
}

impl Error {
    /// Creates an invalid dimensions error.
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Returns true if this is an invalid dimensions error.
    pub fn is_invalid_dimensions(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. })
    }

    /// Returns true if this is a length mismatch error.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. })
    }

    /// Returns true if this is a dimension mismatch error.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = Error::invalid_dimensions(0, 10, "width must be non-zero");
        let msg = err.to_string();
        assert!(msg.contains("0x10"));
        assert!(msg.contains("width must be non-zero"));
        assert!(err.is_invalid_dimensions());
        assert!(!err.is_length_mismatch());
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = Error::LengthMismatch {
            width: 2,
            height: 2,
            expected: 16,
            got: 12,
        };
        assert!(err.to_string().contains("expected 16"));
        assert!(err.is_length_mismatch());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((4, 4), (2, 8));
        assert_eq!(err.to_string(), "dimension mismatch: 4x4 vs 2x8");
        assert!(err.is_dimension_mismatch());
    }
}
