//! Not-run outcomes of a filter invocation.
//!
//! A filter either mutates its buffer and returns `Ok(changed)`, or returns
//! one of these reasons with the buffer untouched. Malformed option values
//! are not errors: they fall back to the filter's declared defaults.

use thiserror::Error;

/// Why a filter did not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotRun {
    /// No filter is registered under this name.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// The host lacks a capability the filter needs.
    #[error("filter {filter} needs {capability}")]
    UnsupportedCapability {
        /// Filter name
        filter: String,
        /// Missing capability
        capability: filtr_core::Requirement,
    },

    /// A two-buffer filter could not get its companion image.
    #[error("filter {filter}: companion image {image:?} unavailable")]
    SecondBufferUnavailable {
        /// Filter name
        filter: String,
        /// Requested companion name
        image: String,
    },

    /// A buffer could not be built (e.g. a resize to an unrepresentable size).
    #[error(transparent)]
    Buffer(#[from] filtr_core::Error),
}

impl NotRun {
    /// Returns true if the host lacks a capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedCapability { .. })
    }

    /// Returns true if a companion buffer was missing.
    pub fn is_second_buffer_unavailable(&self) -> bool {
        matches!(self, Self::SecondBufferUnavailable { .. })
    }

    /// Returns true if the filter name is unknown.
    pub fn is_unknown_filter(&self) -> bool {
        matches!(self, Self::UnknownFilter(_))
    }
}

/// Outcome of one filter: `Ok(true)` if the buffer was mutated.
pub type FilterResult = Result<bool, NotRun>;
