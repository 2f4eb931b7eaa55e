//! Connection state machine.
//!
//! ```text
//!                 claim                 Connected event
//! Disconnected ─────────► Connecting ──────────────────► Connected
//!      ▲                      │                              │
//!      │   timeout / refused  │        session lost          │
//!      └──────────────────────┴──────────────────────────────┘
//!                      release (from any state)
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of the manager's session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No session; the next operation starts one.
    #[default]
    Disconnected,
    /// One caller is establishing a session; others wait.
    Connecting,
    /// A session is ready.
    Connected,
}

impl ConnectionState {
    /// Returns `true` for [`ConnectionState::Connected`].
    #[inline]
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns `true` for [`ConnectionState::Connecting`].
    #[inline]
    #[must_use]
    pub const fn is_connecting(self) -> bool {
        matches!(self, Self::Connecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Tests
// ============================================================================
