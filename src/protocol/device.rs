//! Device models understood by the display service.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// DeviceModel
// ============================================================================

/// Hardware model registered with the service once a session is ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceModel {
    /// Phone 3 rear matrix (25×25), service code `23112`.
    #[default]
    Phone3,

    /// Any other model, identified by its raw service code.
    Custom(String),
}

impl DeviceModel {
    /// Returns the code the service expects in `register`.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Phone3 => "23112",
            Self::Custom(code) => code,
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phone3 => write!(f, "Phone3({})", self.code()),
            Self::Custom(code) => write!(f, "Custom({code})"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
