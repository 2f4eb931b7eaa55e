//! Asynchronous notifications from the display service.
//!
//! The service reports readiness and session loss through a callback
//! registered at `init`. Each callback invocation carries one
//! [`ServiceEvent`].
//!
//! | Event | Meaning |
//! |-------|---------|
//! | `Connected` | The binding is ready; the device can be registered |
//! | `Disconnected` | The binding was lost, or refused before it was ready |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// ServiceEvent
// ============================================================================

/// A lifecycle notification from the display service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceEvent {
    /// The service binding is ready.
    Connected,
    /// The service binding went away.
    Disconnected,
}

impl ServiceEvent {
    /// Returns `true` for [`ServiceEvent::Connected`].
    #[inline]
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::Disconnected => f.write_str("disconnected"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
