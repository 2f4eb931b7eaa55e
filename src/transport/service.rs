//! The display service capability.
//!
//! The manager talks to the LED matrix through an implementation of
//! [`DisplayService`]. The host platform provides it; tests and demos use
//! [`LoopbackService`](super::LoopbackService).
//!
//! # Connection Lifecycle
//!
//! 1. `init(callback)` - request a binding; returns once the request is made
//! 2. `callback(Connected)` - the binding is ready (or `Disconnected` if refused)
//! 3. `register(model)` - announce the device model
//! 4. `set_frame` / `close_display` - drive the display
//! 5. `teardown()` - drop the binding
//!
//! After `callback(Connected)`, a later `callback(Disconnected)` reports
//! session loss.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::pattern::Grid;
use crate::protocol::{DeviceModel, ServiceEvent};

// ============================================================================
// Types
// ============================================================================

/// Callback the service invokes for lifecycle events.
///
/// May be called from any thread, any number of times.
pub type ServiceCallback = Arc<dyn Fn(ServiceEvent) + Send + Sync>;

// ============================================================================
// DisplayService
// ============================================================================

/// Opaque binding to the external display service.
///
/// Implementations report failures as
/// [`Error::Service`](crate::Error::Service). Panics are tolerated: the
/// manager catches them at the call boundary.
#[async_trait]
pub trait DisplayService: Send + Sync + 'static {
    /// Requests a new asynchronous binding.
    ///
    /// Readiness is reported later through `callback`. A new `init`
    /// replaces any callback registered earlier.
    async fn init(&self, callback: ServiceCallback) -> Result<()>;

    /// Registers the device model on a ready binding.
    async fn register(&self, model: &DeviceModel) -> Result<()>;

    /// Shows a 625-cell brightness frame.
    async fn set_frame(&self, frame: &Grid) -> Result<()>;

    /// Turns the display off.
    async fn close_display(&self) -> Result<()>;

    /// Drops the binding. Must be safe to call when not bound.
    async fn teardown(&self) -> Result<()>;
}
