//! Type-safe identifiers for sessions and connection attempts.
//!
//! Newtype wrappers keep session identities and attempt counters from
//! being mixed up at compile time.
//!
//! | Type | Backing | Purpose |
//! |------|---------|---------|
//! | [`SessionId`] | UUID v4 | Identity of an established display session |
//! | [`AttemptId`] | `u64` counter | Generation tag of a connection attempt |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SessionId
// ============================================================================

/// Identity of a display session.
///
/// A fresh id is generated for every binding the manager creates, so log
/// lines from different sessions can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a new random session id.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// AttemptId
// ============================================================================

/// Global counter for attempt ids. Zero is reserved for "no attempt".
static NEXT_ATTEMPT_ID: AtomicU64 = AtomicU64::new(1);

/// Generation tag of a connection attempt.
///
/// Every attempt and every release draws a new id. Service callbacks carry
/// the id of the attempt that registered them; a callback whose id is no
/// longer current is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(u64);

impl AttemptId {
    /// The id held before any attempt has been made.
    pub const NONE: Self = Self(0);

    /// Draws the next attempt id.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ATTEMPT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw counter value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_display_is_uuid() {
        let id = SessionId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_attempt_ids_increase() {
        let a = AttemptId::next();
        let b = AttemptId::next();
        assert!(b > a);
        assert_ne!(a, AttemptId::NONE);
    }

    #[test]
    fn test_attempt_id_display() {
        assert_eq!(AttemptId::NONE.to_string(), "#0");
    }

    #[test]
    fn test_session_id_serializes_transparently() {
        let id = SessionId::generate();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{id}\""));
    }
}
