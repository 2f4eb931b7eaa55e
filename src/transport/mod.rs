//! Display service transport layer.
//!
//! This module defines the boundary to the external display service and
//! the session handle the manager keeps over it. The device is reached
//! through a host-mediated service binding, never over the network.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐                      ┌──────────────────────┐
//! │  ConnectionManager   │   init / register    │  Display service     │
//! │                      │   set_frame / close  │  (host platform)     │
//! │  Session ────────────┼─────────────────────►│                      │
//! │  ServiceCallback ◄───┼──────────────────────┤  Connected /         │
//! │                      │                      │  Disconnected        │
//! └──────────────────────┘                      └──────────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `service` | [`DisplayService`] trait and [`ServiceCallback`] |
//! | `session` | [`Session`] handle with panic-safe call boundary |
//! | `loopback` | [`LoopbackService`], an in-process service |

// ============================================================================
// Submodules
// ============================================================================

/// In-process display service.
pub mod loopback;

/// Display service capability.
pub mod service;

/// Session handle over a binding.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use loopback::{ConnectBehavior, LoopbackService};
pub use service::{DisplayService, ServiceCallback};
pub use session::Session;
