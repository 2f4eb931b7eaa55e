//! Glyph Matrix - brightness patterns for an external LED-matrix display.
//!
//! This library encodes 25x25 brightness grids to and from a compact hex
//! text format and drives an asynchronously connecting display service
//! through a single managed session.
//!
//! # Architecture
//!
//! - **Pattern**: [`Grid`] of 625 brightness cells, quantized to sixteen
//!   [`Level`]s for the text encoding
//! - **Manager**: [`ConnectionManager`] owns the session, deduplicates
//!   concurrent connection attempts and bounds every wait
//! - **Transport**: [`DisplayService`] is the seam to the host platform
//!
//! Key design principles:
//!
//! - At most one connection attempt in flight per manager
//! - Connection failures are ordinary results, never fatal
//! - Event-driven readiness (no polling)
//! - Operations on a released session fail closed
//!
//! # Quick Start
//!
//! ```no_run
//! use glyph_matrix::{ConnectionManager, LoopbackService, Result, decode_strict};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = ConnectionManager::builder()
//!         .service(LoopbackService::new())
//!         .build()?;
//!
//!     let grid = decode_strict(&"F".repeat(625))?;
//!     manager.send(&grid).await?;
//!     manager.release().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`automation`] | Automation host actions and outcomes |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Session and attempt identifiers |
//! | [`manager`] | [`ConnectionManager`] and configuration |
//! | [`pattern`] | [`Grid`], [`Level`] and the text codec |
//! | [`protocol`] | Device models and service events |
//! | [`transport`] | Display service boundary |

// ============================================================================
// Modules
// ============================================================================

/// Automation host actions.
///
/// Actions report numbered [`ActionOutcome`]s instead of errors.
pub mod automation;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Identifiers for sessions and connection attempts.
pub mod identifiers;

/// Connection lifecycle management.
///
/// Use [`ConnectionManager::builder()`] to create a configured manager.
pub mod manager;

/// Brightness grids and their text encoding.
pub mod pattern;

/// Device models and service events.
pub mod protocol;

/// Display service boundary.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Automation types
pub use automation::{
    ActionOutcome, ClearPatternAction, ExportPatternAction, FailureCode, HostAction,
    UpdatePatternAction,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{AttemptId, SessionId};

// Manager types
pub use manager::{ConnectionManager, ConnectionManagerBuilder, ConnectionOptions, ConnectionState};

// Pattern types
pub use pattern::{
    GRID_SIZE, Grid, InvalidReason, Level, TOTAL_PIXELS, ValidationResult, decode, decode_strict,
    encode, encode_compact, is_valid_encoding, validate,
};

// Protocol types
pub use protocol::{DeviceModel, ServiceEvent};

// Transport types
pub use transport::{ConnectBehavior, DisplayService, LoopbackService, ServiceCallback, Session};
