//! Automation host integration.
//!
//! Actions an external automation host runs against the display, each
//! reporting a serializable [`ActionOutcome`].
//!
//! | Action | Input | Failure codes |
//! |--------|-------|---------------|
//! | [`UpdatePatternAction`] | pattern text | 1, 2, 3, 4 |
//! | [`ClearPatternAction`] | none | 3, 4 |
//! | [`ExportPatternAction`] | grid | none |

// ============================================================================
// Submodules
// ============================================================================

/// Action runners.
pub mod action;

/// Outcomes and failure codes.
pub mod outcome;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::{ClearPatternAction, ExportPatternAction, HostAction, UpdatePatternAction};
pub use outcome::{ActionOutcome, FailureCode};
