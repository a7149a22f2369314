//! # filtr-ops
//!
//! Named pixel filters over [`filtr_core::PixelBuffer`], the two-buffer
//! blend engine, and the registry that dispatches option strings.
//!
//! # Modules
//!
//! - [`registry`] - filter lookup and the invocation driver
//! - [`options`] - option values, the option-string parser, defaults merging
//! - [`context`] - host capabilities, companion buffers, per-call state
//! - [`filters`] - the built-in filters
//! - [`composite`] - blend modes and the blend engine
//! - [`kernel`] - 3x3 convolution kernels and gradient operators
//! - [`resample`] - buffer resizing
//! - [`raster`] - drawing primitives
//!
//! # Example
//!
//! ```rust
//! use filtr_core::PixelBuffer;
//! use filtr_ops::{FilterRegistry, Host};
//!
//! let registry = FilterRegistry::with_builtin();
//! let mut buf = PixelBuffer::filled(4, 4, [200, 100, 50, 255]).unwrap();
//! let host = Host::new();
//!
//! registry.apply(&mut buf, "posterize[levels:2]", &host).unwrap();
//! registry
//!     .apply_chain(&mut buf, &["invert", "brightness[brightness:20]"], &host)
//!     .unwrap();
//!
//! // Unknown filters are reported, never run
//! assert!(registry.apply(&mut buf, "nosuchfilter", &host).is_err());
//! ```
//!
//! # Companion buffers
//!
//! `blend` and `chroma` read a second buffer named by their `image` option.
//! Hosts hand those over through [`Companions`]:
//!
//! ```rust
//! use std::collections::HashMap;
//! use filtr_core::PixelBuffer;
//! use filtr_ops::{FilterRegistry, Host};
//!
//! let mut layers = HashMap::new();
//! layers.insert("white".to_string(), PixelBuffer::filled(2, 2, [255, 255, 255, 255]).unwrap());
//! let host = Host::new().with_companions(&layers);
//!
//! let mut buf = PixelBuffer::filled(2, 2, [10, 20, 30, 255]).unwrap();
//! FilterRegistry::with_builtin()
//!     .apply(&mut buf, "blend[mode:multiply,image:white]", &host)
//!     .unwrap();
//! assert_eq!(buf.get(0, 0), Some([10, 20, 30, 255]));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod composite;
pub mod context;
pub mod filters;
pub mod kernel;
pub mod options;
pub mod raster;
pub mod registry;
pub mod resample;

pub use composite::BlendMode;
pub use context::{Companions, FilterContext, Host, NoCompanions};
pub use error::{FilterResult, NotRun};
pub use options::{parse_filter, OptionMap, OptionSet, OptionValue};
pub use registry::{FilterDescriptor, FilterRegistry, Scope};
