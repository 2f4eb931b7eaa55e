//! Strict validation of pattern text.
//!
//! Used on the ingestion path where malformed input must be rejected with a
//! reason instead of being silently patched. Only hex digits and whitespace
//! are accepted; anything else fails, even though [`decode`](super::decode)
//! would quietly discard it.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use super::grid::TOTAL_PIXELS;

// ============================================================================
// Constants
// ============================================================================

/// Maximum offending characters quoted in the message.
const MAX_PREVIEW_CHARS: usize = 5;

// ============================================================================
// InvalidReason
// ============================================================================

/// Why a pattern text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Contains characters that are neither hex digits nor whitespace.
    InvalidCharacters,
    /// Fewer than 625 hex digits.
    TooFewDigits,
    /// More than 625 hex digits.
    TooManyDigits,
}

// ============================================================================
// ValidationResult
// ============================================================================

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Exactly 625 hex digits, with only whitespace in between.
    Valid,

    /// Disallowed characters were found.
    InvalidCharacters {
        /// The first offending characters, at most five.
        preview: String,
        /// Total number of offending characters.
        total: usize,
    },

    /// Not enough hex digits.
    TooFewDigits {
        /// Number of hex digits found.
        found: usize,
    },

    /// Too many hex digits.
    TooManyDigits {
        /// Number of hex digits found.
        found: usize,
    },
}

impl ValidationResult {
    /// Returns `true` for [`ValidationResult::Valid`].
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the rejection reason, or `None` when valid.
    #[must_use]
    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Valid => None,
            Self::InvalidCharacters { .. } => Some(InvalidReason::InvalidCharacters),
            Self::TooFewDigits { .. } => Some(InvalidReason::TooFewDigits),
            Self::TooManyDigits { .. } => Some(InvalidReason::TooManyDigits),
        }
    }

    /// User-facing explanation. Empty when valid.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Valid => String::new(),
            Self::InvalidCharacters { preview, total } => {
                let ellipsis = if *total > MAX_PREVIEW_CHARS { "..." } else { "" };
                format!(
                    "Invalid characters found: '{preview}{ellipsis}'. \
                     Only hex digits (0-9, A-F) and whitespace are allowed."
                )
            }
            Self::TooFewDigits { found } => format!(
                "Not enough hex digits: found {found}, need {TOTAL_PIXELS} (25x25 grid)."
            ),
            Self::TooManyDigits { found } => format!(
                "Too many hex digits: found {found}, need exactly {TOTAL_PIXELS} (25x25 grid)."
            ),
        }
    }
}

// ============================================================================
// validate
// ============================================================================

/// Strictly checks a pattern text.
///
/// Disallowed characters are reported before the digit count is looked at.
#[must_use]
pub fn validate(text: &str) -> ValidationResult {
    let mut invalid = text
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_hexdigit());

    let preview: String = invalid.by_ref().take(MAX_PREVIEW_CHARS).collect();
    if !preview.is_empty() {
        let total = preview.chars().count() + invalid.count();
        return ValidationResult::InvalidCharacters { preview, total };
    }

    let found = text.chars().filter(char::is_ascii_hexdigit).count();

    match found.cmp(&TOTAL_PIXELS) {
        std::cmp::Ordering::Less => ValidationResult::TooFewDigits { found },
        std::cmp::Ordering::Greater => ValidationResult::TooManyDigits { found },
        std::cmp::Ordering::Equal => ValidationResult::Valid,
    }
}

// ============================================================================
// Tests
// ============================================================================
