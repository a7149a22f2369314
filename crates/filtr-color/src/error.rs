//! Error types for color parsing.

use thiserror::Error;

/// Error type for color parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not a `#RRGGBB` / `RRGGBB` string.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Fewer than three channels were supplied.
    #[error("expected at least 3 channels, got {0}")]
    TooFewChannels(usize),
}

/// Result type for color parsing.
pub type ColorResult<T> = Result<T, ColorError>;
