//! Results reported back to the automation host.
//!
//! The host distinguishes failures by number:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 1 | Empty input |
//! | 2 | Pattern failed strict validation |
//! | 3 | Could not connect to the display |
//! | 4 | Unexpected service error |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

// ============================================================================
// FailureCode
// ============================================================================

/// Numbered failure reason reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum FailureCode {
    /// No pattern was supplied.
    EmptyInput = 1,
    /// The pattern text is malformed.
    InvalidPattern = 2,
    /// No session could be established.
    ConnectionFailed = 3,
    /// Anything else.
    Unexpected = 4,
}

impl FailureCode {
    /// Classifies an error.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::EmptyInput => Self::EmptyInput,
            Error::InvalidPattern { .. } => Self::InvalidPattern,
            e if e.is_connection_error() => Self::ConnectionFailed,
            _ => Self::Unexpected,
        }
    }

    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<FailureCode> for u8 {
    #[inline]
    fn from(code: FailureCode) -> Self {
        code.as_u8()
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ============================================================================
// ActionOutcome
// ============================================================================

/// Result of one automation action.
///
/// Serializes to `{"success":true}` or
/// `{"success":false,"code":N,"message":"..."}`, plus `"output"` for
/// actions that produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Whether the action succeeded.
    pub success: bool,
    /// Failure reason, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<FailureCode>,
    /// User-facing failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Value produced for a host variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ActionOutcome {
    /// Successful outcome without output.
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            code: None,
            message: None,
            output: None,
        }
    }

    /// Successful outcome carrying a value.
    #[inline]
    #[must_use]
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::ok()
        }
    }

    /// Failed outcome.
    #[must_use]
    pub fn failure(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            message: Some(message.into()),
            output: None,
        }
    }

    /// Failed outcome for an error, with the host message for its class.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        let code = FailureCode::from_error(error);
        let message = match code {
            FailureCode::EmptyInput | FailureCode::InvalidPattern => error.to_string(),
            FailureCode::ConnectionFailed => {
                format!("Failed to connect to the LED matrix display ({error})")
            }
            FailureCode::Unexpected => format!("Error: {error}"),
        };
        Self::failure(code, message)
    }

    /// Serializes the outcome for the host.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Result<()>> for ActionOutcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::from_error(&e),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
