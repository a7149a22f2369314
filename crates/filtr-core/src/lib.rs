//! # filtr-core
//!
//! Core types for the filtr pixel-filter engine.
//!
//! - [`PixelBuffer`] - owned RGBA8 raster with a fixed length invariant
//! - [`Rect`], [`RectRequest`] - regions, clamped once to buffer bounds
//! - [`traverse`] - the five traversal strategies every filter is built on
//! - [`Capabilities`] - what the host surface supports
//!
//! ## Crate Structure
//!
//! ```text
//! filtr-core (this crate)
//!    ^
//!    +-- filtr-color (color math)
//!    +-- filtr-ops (filters, blend engine, registry)
//!    +-- filtr-cli (command line host)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use filtr_core::prelude::*;
//!
//! let mut buf = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
//! for at in Linear::new(buf.shape()) {
//!     let [r, g, b, a] = buf.read(at);
//!     buf.write(at, [255 - r, 255 - g, 255 - b, a]);
//! }
//! assert!(buf.pixels().all(|p| p == [0, 255, 255, 255]));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - serialization for [`Rect`], [`Snapshot`] and [`Capabilities`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod capability;
pub mod error;
pub mod rect;
pub mod traverse;

pub use buffer::{PixelBuffer, PixelOffset, Shape, Snapshot};
pub use capability::{Capabilities, Requirement};
pub use error::{Error, Result};
pub use rect::{Rect, RectRequest};
pub use traverse::{AreaStep, Blocks, Linear, Matrix, MatrixArea, MatrixStep, Radial, Tile};

/// Prelude module for convenient imports.
///
/// ```
/// use filtr_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{PixelBuffer, PixelOffset, Shape, Snapshot};
    pub use crate::capability::{Capabilities, Requirement};
    pub use crate::error::{Error, Result};
    pub use crate::rect::{Rect, RectRequest};
    pub use crate::traverse::{AreaStep, Blocks, Linear, Matrix, MatrixArea, MatrixStep, Radial, Tile};
}
