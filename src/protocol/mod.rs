//! Value types crossing the display service boundary.
//!
//! The service itself is an opaque capability (see
//! [`DisplayService`](crate::transport::DisplayService)). Only the shapes
//! of what goes in and comes out are defined here.
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`DeviceModel`] | Local → Service | `register` after the binding is ready |
//! | [`Grid`](crate::pattern::Grid) | Local → Service | `set_frame` payload |
//! | [`ServiceEvent`] | Service → Local | Connect / disconnect callback |

// ============================================================================
// Submodules
// ============================================================================

/// Device models.
pub mod device;

/// Service lifecycle events.
pub mod event;

// ============================================================================
// Re-exports
// ============================================================================

pub use device::DeviceModel;
pub use event::ServiceEvent;
