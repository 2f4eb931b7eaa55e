//! Connection lifecycle management.
//!
//! This module provides the [`ConnectionManager`], which owns the single
//! session to the display service and deduplicates concurrent connection
//! attempts.
//!
//! # Example
//!
//! ```ignore
//! use glyph_matrix::{ConnectionManager, Grid, LoopbackService};
//!
//! let manager = ConnectionManager::builder()
//!     .service(LoopbackService::new())
//!     .build()?;
//!
//! manager.send(&Grid::filled(255)).await?;
//! manager.release().await?;
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent configuration builder |
//! | `core` | [`ConnectionManager`] and the connection protocol |
//! | `options` | [`ConnectionOptions`] with serde support |
//! | `state` | [`ConnectionState`] machine |

// ============================================================================
// Submodules
// ============================================================================

/// Builder pattern for manager configuration.
pub mod builder;

/// Core manager implementation.
pub mod core;

/// Connection options.
pub mod options;

/// Connection state.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ConnectionManagerBuilder;
pub use core::ConnectionManager;
pub use options::{ConnectionOptions, DEFAULT_CONNECT_TIMEOUT};
pub use state::ConnectionState;
