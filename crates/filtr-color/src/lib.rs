//! # filtr-color
//!
//! Pure color math used by the filtr filters.
//!
//! - [`hsb`] - six-sector hue/saturation/brightness model
//! - [`hsl`] - hue rotation and saturation scaling in HSL space
//! - [`yuv`] - luma/chroma split
//! - [`hex`] - `#RRGGBB` parsing and formatting
//! - [`random`] - inclusive random integers
//!
//! Every function that produces a channel value returns it already rounded
//! and clamped to `0..=255`; intermediate math stays in `f64`.
//!
//! # Example
//!
//! ```rust
//! use filtr_color::{hsb_to_rgb, rgb_to_hsb, reduce_color, Reduce};
//!
//! let hsb = rgb_to_hsb(255, 0, 0);
//! assert_eq!((hsb.h, hsb.s, hsb.b), (0.0, 100.0, 100.0));
//! assert_eq!(hsb_to_rgb(hsb.h, hsb.s, hsb.b), [255, 0, 0]);
//! assert_eq!(reduce_color(10, 20, 30, Reduce::Average), 20.0);
//! ```

#![warn(missing_docs)]

mod error;
pub mod hex;
pub mod hsb;
pub mod hsl;
pub mod random;
pub mod yuv;

pub use error::{ColorError, ColorResult};
pub use hex::{hex_to_rgb, rgb_to_hex, HexColor};
pub use hsb::{hsb_to_rgb, rgb_to_hsb, rgb_to_hsb_exact, Hsb};
pub use hsl::HslShift;
pub use random::random_int;
pub use yuv::{rgb_to_yuv, yuv_to_rgb, Yuv};

/// Rounds and clamps a value into a channel.
///
/// NaN maps to 0.
#[inline]
pub fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Truncates and clamps a value into a channel.
///
/// For filters that store the integer part of their result rather than
/// rounding it. NaN maps to 0.
#[inline]
pub fn trunc_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

/// How [`reduce_color`] collapses three channels to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduce {
    /// `(r + g + b) / 3`
    #[default]
    Average,
    /// `0.3 r + 0.59 g + 0.11 b`
    Weighted,
}

impl Reduce {
    /// Average when `true`, weighted otherwise.
    pub fn from_average(average: bool) -> Self {
        if average { Self::Average } else { Self::Weighted }
    }
}

/// Collapses a color to a single intensity, unrounded.
#[inline]
pub fn reduce_color(r: u8, g: u8, b: u8, mode: Reduce) -> f64 {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    match mode {
        Reduce::Average => (r + g + b) / 3.0,
        Reduce::Weighted => r * 0.3 + g * 0.59 + b * 0.11,
    }
}

/// Rec. 601 luma, unrounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}
