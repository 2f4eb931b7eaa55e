//! Text encoding of brightness grids.
//!
//! The encoding is 625 hex digits in row-major order, optionally broken
//! into 25 lines of 25 digits. Each digit is one [`Level`].
//!
//! # Lenient vs strict
//!
//! | Function | Input handling |
//! |----------|----------------|
//! | [`decode`] | Drops every non-hex character, zero-fills or truncates to 625. Never fails. |
//! | [`decode_strict`] | Runs [`validate`] first and rejects anything that is not exactly 625 digits plus whitespace. |
//!
//! Clipboard-style loading uses [`decode`]; explicit input fields and
//! automation actions use [`decode_strict`].
//!
//! # Precision
//!
//! Encoding quantizes to sixteen levels. `decode(encode(g)) == g` only for
//! grids whose cells are already quantized; other brightness values come
//! back rounded down to their level.

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};

use super::grid::{GRID_SIZE, Grid, TOTAL_PIXELS};
use super::level::Level;
use super::validate::validate;

// ============================================================================
// Decoding
// ============================================================================

/// Decodes pattern text leniently.
///
/// Every character that is not a hex digit is discarded. The first 625
/// digits fill the grid in order; missing cells stay 0 and excess digits
/// are ignored.
#[must_use]
pub fn decode(text: &str) -> Grid {
    Grid::from_levels(text.chars().filter_map(Level::from_hex_char))
}

/// Validates then decodes pattern text.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if the text is empty or only whitespace
/// - [`Error::InvalidPattern`] if [`validate`] rejects the text
pub fn decode_strict(text: &str) -> Result<Grid> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let result = validate(text);
    if !result.is_valid() {
        return Err(Error::invalid_pattern(result));
    }

    Ok(decode(text))
}

/// Returns `true` if the text holds exactly 625 hex digits.
///
/// Lenient like [`decode`]: other characters are not counted or rejected.
#[must_use]
pub fn is_valid_encoding(text: &str) -> bool {
    text.chars().filter(char::is_ascii_hexdigit).count() == TOTAL_PIXELS
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes brightness values as 625 hex digits.
///
/// Input shorter than 625 is treated as zero-padded, longer input is cut
/// at 625. With `with_line_breaks`, a `\n` follows each row except the
/// last (24 breaks).
#[must_use]
pub fn encode(brightness: impl AsRef<[u8]>, with_line_breaks: bool) -> String {
    let brightness = brightness.as_ref();
    let capacity = TOTAL_PIXELS + if with_line_breaks { GRID_SIZE - 1 } else { 0 };
    let mut out = String::with_capacity(capacity);

    for index in 0..TOTAL_PIXELS {
        if with_line_breaks && index > 0 && index % GRID_SIZE == 0 {
            out.push('\n');
        }
        let value = brightness.get(index).copied().unwrap_or(0);
        out.push(Level::from_brightness(value).to_hex_char());
    }

    out
}

/// Encodes without line breaks.
#[inline]
#[must_use]
pub fn encode_compact(brightness: impl AsRef<[u8]>) -> String {
    encode(brightness, false)
}

impl Grid {
    /// Encodes this grid; see [`encode`].
    #[inline]
    #[must_use]
    pub fn encode(&self, with_line_breaks: bool) -> String {
        encode(self, with_line_breaks)
    }
}

// ============================================================================
// Tests
// ============================================================================
