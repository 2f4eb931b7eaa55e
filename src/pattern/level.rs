//! Sixteen-step brightness quantization.
//!
//! A [`Level`] is one hex digit of the text encoding. Conversions use
//! integer division with floor semantics in both directions:
//!
//! | Direction | Formula |
//! |-----------|---------|
//! | level → brightness | `d * 255 / 15` |
//! | brightness → level | `b * 15 / 255` |
//!
//! Every brightness produced from a level maps back to the same level, so
//! the sixteen values `0, 17, 34, .., 255` are closed under a round trip.
//! Other brightness values lose precision when encoded; `128` becomes
//! level 7, which decodes to `119`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Level
// ============================================================================

/// A quantized brightness level in `0..=15`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// LED off.
    pub const OFF: Self = Self(0);

    /// Maximum brightness.
    pub const MAX: Self = Self(15);

    /// Number of distinct levels.
    pub const COUNT: usize = 16;

    /// Creates a level, returning `None` if `value > 15`.
    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Quantizes a brightness value (`b * 15 / 255`).
    #[inline]
    #[must_use]
    pub const fn from_brightness(brightness: u8) -> Self {
        Self((brightness as u16 * 15 / 255) as u8)
    }

    /// Parses a hex digit, case-insensitively.
    #[inline]
    #[must_use]
    pub fn from_hex_char(c: char) -> Option<Self> {
        c.to_digit(16).map(|d| Self(d as u8))
    }

    /// Expands the level to brightness (`d * 255 / 15`).
    #[inline]
    #[must_use]
    pub const fn to_brightness(self) -> u8 {
        (self.0 as u16 * 255 / 15) as u8
    }

    /// Returns the uppercase hex digit for this level.
    #[inline]
    #[must_use]
    pub const fn to_hex_char(self) -> char {
        if self.0 < 10 {
            (b'0' + self.0) as char
        } else {
            (b'A' + self.0 - 10) as char
        }
    }

    /// Returns the raw level value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterates all levels from off to max.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX.0).map(Self)
    }
}

/// Snaps a brightness to the nearest lower quantized value.
#[inline]
#[must_use]
pub const fn quantize(brightness: u8) -> u8 {
    Level::from_brightness(brightness).to_brightness()
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_char())
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("level {value} out of range 0..=15"))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

// ============================================================================
// Tests
// ============================================================================
