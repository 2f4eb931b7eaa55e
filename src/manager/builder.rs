//! Builder pattern for manager configuration.
//!
//! Provides a fluent API for configuring and creating
//! [`ConnectionManager`] instances.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use glyph_matrix::{ConnectionManager, LoopbackService};
//!
//! let manager = ConnectionManager::builder()
//!     .service(LoopbackService::new())
//!     .connect_timeout(Duration::from_secs(2))
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::DeviceModel;
use crate::transport::DisplayService;

use super::core::ConnectionManager;
use super::options::ConnectionOptions;

// ============================================================================
// ConnectionManagerBuilder
// ============================================================================

/// Builder for configuring a [`ConnectionManager`].
///
/// Use [`ConnectionManager::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ConnectionManagerBuilder {
    /// Display service capability.
    service: Option<Arc<dyn DisplayService>>,
    /// Connection options.
    options: ConnectionOptions,
}

impl fmt::Debug for ConnectionManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManagerBuilder")
            .field("has_service", &self.service.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// ConnectionManagerBuilder Implementation
// ============================================================================

impl ConnectionManagerBuilder {
    /// Creates a new builder with default options and no service.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display service.
    #[inline]
    #[must_use]
    pub fn service(mut self, service: impl DisplayService) -> Self {
        self.service = Some(Arc::new(service));
        self
    }

    /// Sets an already shared display service.
    #[inline]
    #[must_use]
    pub fn shared_service(mut self, service: Arc<dyn DisplayService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the bound on waiting for a session.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_connect_timeout(timeout);
        self
    }

    /// Sets the device model registered on connect.
    #[inline]
    #[must_use]
    pub fn device_model(mut self, model: DeviceModel) -> Self {
        self.options = self.options.with_device_model(model);
        self
    }

    /// Sets whether `release` turns the display off first.
    #[inline]
    #[must_use]
    pub fn clear_on_release(mut self, clear: bool) -> Self {
        self.options = self.options.with_clear_on_release(clear);
        self
    }

    /// Builds the manager with validation.
    ///
    /// Every call creates an independent manager with its own session. Wrap
    /// it in [`ConnectionManager::shared_or_init`] for the process-wide one.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no service is set
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self) -> Result<ConnectionManager> {
        let service = self.service.ok_or_else(|| {
            Error::config(
                "Display service is required. Use .service() to set it.\n\
                 Example: ConnectionManager::builder().service(LoopbackService::new())",
            )
        })?;

        self.options.validate()?;

        Ok(ConnectionManager::new(service, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================
