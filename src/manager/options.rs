//! Connection manager configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use glyph_matrix::ConnectionOptions;
//!
//! let options = ConnectionOptions::new()
//!     .with_connect_timeout(Duration::from_secs(2))
//!     .with_clear_on_release(false);
//!
//! let from_host = ConnectionOptions::from_json_str(r#"{"connect_timeout_ms": 2000}"#)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::DeviceModel;

// ============================================================================
// Constants
// ============================================================================

/// Default bound on a connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Whole milliseconds of `duration`, capped at `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// ConnectionOptions
// ============================================================================

/// Tunables for [`ConnectionManager`](super::ConnectionManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionOptions {
    /// Total time a caller waits for a session, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Model registered once the binding is ready.
    pub device_model: DeviceModel,

    /// Turn the display off before tearing the session down on release.
    pub clear_on_release: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: saturating_millis(DEFAULT_CONNECT_TIMEOUT),
            device_model: DeviceModel::default(),
            clear_on_release: true,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ConnectionOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the JSON is malformed or has unknown fields
    /// - [`Error::Config`] if the values are invalid
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as
    /// [`ConnectionOptions::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ConnectionOptions {
    /// Sets the connection timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = saturating_millis(timeout);
        self
    }

    /// Sets the device model.
    #[inline]
    #[must_use]
    pub fn with_device_model(mut self, model: DeviceModel) -> Self {
        self.device_model = model;
        self
    }

    /// Sets whether release clears the display.
    #[inline]
    #[must_use]
    pub fn with_clear_on_release(mut self, clear: bool) -> Self {
        self.clear_on_release = clear;
        self
    }
}

// ============================================================================
// Accessors & Validation
// ============================================================================

impl ConnectionOptions {
    /// Returns the connection timeout.
    #[inline]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the timeout is zero or the device code is empty.
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_ms == 0 {
            return Err(Error::config("connect_timeout_ms must be greater than zero"));
        }
        if self.device_model.code().trim().is_empty() {
            return Err(Error::config("device model code must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::new();
        assert_eq!(options.connect_timeout(), Duration::from_secs(5));
        assert_eq!(options.device_model, DeviceModel::Phone3);
        assert!(options.clear_on_release);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let options = ConnectionOptions::new()
            .with_connect_timeout(Duration::from_millis(250))
            .with_device_model(DeviceModel::Custom("24111".into()))
            .with_clear_on_release(false);

        assert_eq!(options.connect_timeout_ms, 250);
        assert_eq!(options.device_model.code(), "24111");
        assert!(!options.clear_on_release);
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let options = ConnectionOptions::new().with_connect_timeout(Duration::MAX);
        assert_eq!(options.connect_timeout_ms, u64::MAX);
        assert!(options.validate().is_ok());

        let options = ConnectionOptions::new().with_connect_timeout(Duration::from_millis(1234));
        assert_eq!(options.connect_timeout_ms, 1234);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let options = ConnectionOptions::new().with_connect_timeout(Duration::ZERO);
        assert!(matches!(options.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_empty_device_code() {
        let options = ConnectionOptions::new().with_device_model(DeviceModel::Custom(" ".into()));
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let options =
            ConnectionOptions::from_json_str(r#"{"connect_timeout_ms": 1500}"#).expect("parse");
        assert_eq!(options.connect_timeout(), Duration::from_millis(1500));
        assert!(options.clear_on_release);
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let result = ConnectionOptions::from_json_str(r#"{"poll_ms": 100}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let result = ConnectionOptions::from_json_str(r#"{"connect_timeout_ms": 0}"#);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"device_model": {{"custom": "24111"}}, "clear_on_release": false}}"#
        )
        .expect("write");

        let options = ConnectionOptions::from_path(file.path()).expect("load");
        assert_eq!(options.device_model, DeviceModel::Custom("24111".into()));
        assert!(!options.clear_on_release);
    }

    #[test]
    fn test_from_missing_path() {
        let result = ConnectionOptions::from_path("/nonexistent/glyph-matrix.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
