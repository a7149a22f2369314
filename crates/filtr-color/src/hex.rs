//! `#RRGGBB` colors.

use crate::error::{ColorError, ColorResult};

/// Result of [`rgb_to_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexColor {
    /// `#rrggbb`, lower case
    Rgb(String),
    /// A four-channel color with zero alpha
    Transparent,
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb(s) => f.write_str(s),
            Self::Transparent => f.write_str("transparent"),
        }
    }
}

/// Parses `#RRGGBB` (the `#` is optional).
pub fn hex_to_rgb(s: &str) -> ColorResult<[u8; 3]> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(s.to_string()));
    }
    let part = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidHex(s.to_string()))
    };
    Ok([part(0)?, part(2)?, part(4)?])
}

/// Formats the first three channels as `#rrggbb`.
///
/// A four-channel slice whose alpha is zero yields [`HexColor::Transparent`].
pub fn rgb_to_hex(channels: &[u8]) -> ColorResult<HexColor> {
    if channels.len() < 3 {
        return Err(ColorError::TooFewChannels(channels.len()));
    }
    if channels.len() == 4 && channels[3] == 0 {
        return Ok(HexColor::Transparent);
    }
    Ok(HexColor::Rgb(format!(
        "#{:02x}{:02x}{:02x}",
        channels[0], channels[1], channels[2]
    )))
}
