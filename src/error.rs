//! Error types for the glyph matrix crate.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use glyph_matrix::{ConnectionManager, Grid, Result};
//!
//! async fn example(manager: &ConnectionManager) -> Result<()> {
//!     manager.send(&Grid::filled(255)).await?;
//!     manager.clear().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Input | [`Error::EmptyInput`], [`Error::InvalidPattern`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`], [`Error::ServiceRefused`] |
//! | Service | [`Error::Service`], [`Error::ServicePanicked`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::pattern::ValidationResult;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when manager configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Pattern text was empty or blank.
    #[error("Glyph data is empty. Please provide a 625-character hex string (0-F).")]
    EmptyInput,

    /// Pattern text failed strict validation.
    ///
    /// The display string is the user-facing validation message.
    #[error("{}", .result.message())]
    InvalidPattern {
        /// The failed validation outcome.
        result: ValidationResult,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Connection to the display service failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The display service did not report ready within the bound.
    ///
    /// A normal, reportable outcome; the next operation retries.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The session was released or superseded while in use.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The display service disconnected before the session became ready.
    #[error("Display service refused the connection")]
    ServiceRefused,

    // ========================================================================
    // Service Errors
    // ========================================================================
    /// A display service call returned an error.
    #[error("Service error during {operation}: {message}")]
    Service {
        /// Service operation that failed.
        operation: &'static str,
        /// Message reported by the service.
        message: String,
    },

    /// A display service call panicked.
    ///
    /// The panic is caught at the operation boundary.
    #[error("Service panicked during {operation}: {message}")]
    ServicePanicked {
        /// Service operation that panicked.
        operation: &'static str,
        /// Panic payload, when it was a string.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid pattern error from a failed validation.
    #[inline]
    pub fn invalid_pattern(result: ValidationResult) -> Self {
        Self::InvalidPattern { result }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a service error for the named operation.
    #[inline]
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    /// Creates a service panic error for the named operation.
    #[inline]
    pub fn service_panicked(operation: &'static str, message: impl Into<String>) -> Self {
        Self::ServicePanicked {
            operation,
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectionTimeout { .. })
    }

    /// Returns `true` if this is an input error.
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::InvalidPattern { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::ServiceRefused
        )
    }

    /// Returns `true` if this is a failure reported by the service itself.
    #[inline]
    #[must_use]
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::ServicePanicked { .. })
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_connection_error() || self.is_service_error()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    use crate::pattern::validate;

    #[test]
    fn test_error_display() {
        let err = Error::connection("service unavailable");
        assert_eq!(err.to_string(), "Connection failed: service unavailable");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing service");
        assert_eq!(err.to_string(), "Configuration error: missing service");
    }

    #[test]
    fn test_invalid_pattern_displays_validation_message() {
        let result = validate("0123");
        let err = Error::invalid_pattern(result);
        assert_eq!(
            err.to_string(),
            "Not enough hex digits: found 4, need 625 (25x25 grid)."
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::connection_timeout(5000);
        let other_err = Error::connection("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::connection_timeout(1000).is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(Error::ServiceRefused.is_connection_error());
        assert!(!Error::EmptyInput.is_connection_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::connection_timeout(1000).is_recoverable());
        assert!(Error::service("set_frame", "busy").is_recoverable());
        assert!(!Error::config("test").is_recoverable());
        assert!(!Error::EmptyInput.is_recoverable());
    }

    #[test]
    fn test_service_error_display() {
        let err = Error::service_panicked("init", "boom");
        assert_eq!(err.to_string(), "Service panicked during init: boom");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
