//! In-process display service.
//!
//! [`LoopbackService`] behaves like a host display service without any
//! hardware: `init` answers through the callback after a configurable
//! delay, frames are recorded, and counters expose every call. Session loss
//! can be injected with [`LoopbackService::disconnect`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use glyph_matrix::{ConnectionManager, Grid, LoopbackService};
//!
//! let service = LoopbackService::new().with_connect_delay(Duration::from_millis(20));
//! let manager = ConnectionManager::builder().service(service.clone()).build()?;
//!
//! manager.send(&Grid::filled(255)).await?;
//! assert_eq!(service.frames().len(), 1);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pattern::Grid;
use crate::protocol::{DeviceModel, ServiceEvent};

use super::service::{DisplayService, ServiceCallback};

// ============================================================================
// ConnectBehavior
// ============================================================================

/// How the loopback service answers `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectBehavior {
    /// Report `Connected` after the connect delay.
    #[default]
    Accept,
    /// Report `Disconnected` after the connect delay.
    Refuse,
    /// Never call back.
    Silent,
    /// Fail the `init` call itself.
    FailInit,
}

// ============================================================================
// LoopbackService
// ============================================================================

/// In-memory [`DisplayService`] for demos and tests.
///
/// Cloning shares the same underlying state.
#[derive(Clone, Default)]
pub struct LoopbackService {
    inner: Arc<LoopbackInner>,
}

#[derive(Default)]
struct LoopbackInner {
    connect_delay: Mutex<Duration>,
    behavior: Mutex<ConnectBehavior>,
    /// Callback of the current binding.
    callback: Mutex<Option<ServiceCallback>>,
    bound: AtomicBool,
    display_on: AtomicBool,
    registered: Mutex<Option<DeviceModel>>,
    frames: Mutex<Vec<Grid>>,
    init_calls: AtomicUsize,
    register_calls: AtomicUsize,
    close_display_calls: AtomicUsize,
    teardown_calls: AtomicUsize,
}

impl fmt::Debug for LoopbackService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackService")
            .field("behavior", &self.behavior())
            .field("bound", &self.is_bound())
            .field("frames", &self.inner.frames.lock().len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LoopbackService - Configuration
// ============================================================================

impl LoopbackService {
    /// Creates a service that accepts connections immediately.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay before the connect callback fires.
    #[must_use]
    pub fn with_connect_delay(self, delay: Duration) -> Self {
        *self.inner.connect_delay.lock() = delay;
        self
    }

    /// Sets how `init` is answered.
    #[must_use]
    pub fn with_behavior(self, behavior: ConnectBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Changes how future `init` calls are answered.
    pub fn set_behavior(&self, behavior: ConnectBehavior) {
        *self.inner.behavior.lock() = behavior;
    }

    /// Returns the current connect behavior.
    #[must_use]
    pub fn behavior(&self) -> ConnectBehavior {
        *self.inner.behavior.lock()
    }

    /// Simulates loss of the current binding.
    ///
    /// Returns `false` if nothing was bound.
    pub fn disconnect(&self) -> bool {
        let callback = self.inner.callback.lock().take();
        let was_bound = self.inner.bound.swap(false, Ordering::SeqCst);

        if let Some(callback) = callback {
            debug!("Loopback service dropping binding");
            callback(ServiceEvent::Disconnected);
        }

        was_bound
    }
}

// ============================================================================
// LoopbackService - Inspection
// ============================================================================

impl LoopbackService {
    /// Returns `true` while a binding is ready.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.bound.load(Ordering::SeqCst)
    }

    /// Returns `true` if the last display call showed a frame.
    #[must_use]
    pub fn is_display_on(&self) -> bool {
        self.inner.display_on.load(Ordering::SeqCst)
    }

    /// Returns the registered device model, if any.
    #[must_use]
    pub fn registered_model(&self) -> Option<DeviceModel> {
        self.inner.registered.lock().clone()
    }

    /// Returns every frame received so far.
    #[must_use]
    pub fn frames(&self) -> Vec<Grid> {
        self.inner.frames.lock().clone()
    }

    /// Returns the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<Grid> {
        self.inner.frames.lock().last().cloned()
    }

    /// Number of `init` calls.
    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.inner.init_calls.load(Ordering::SeqCst)
    }

    /// Number of `register` calls.
    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.inner.register_calls.load(Ordering::SeqCst)
    }

    /// Number of `close_display` calls.
    #[must_use]
    pub fn close_display_calls(&self) -> usize {
        self.inner.close_display_calls.load(Ordering::SeqCst)
    }

    /// Number of `teardown` calls.
    #[must_use]
    pub fn teardown_calls(&self) -> usize {
        self.inner.teardown_calls.load(Ordering::SeqCst)
    }
}

// ============================================================================
// LoopbackService - DisplayService
// ============================================================================

#[async_trait]
impl DisplayService for LoopbackService {
    async fn init(&self, callback: ServiceCallback) -> Result<()> {
        self.inner.init_calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self.behavior();
        if behavior == ConnectBehavior::FailInit {
            return Err(Error::service("init", "loopback binding refused"));
        }

        *self.inner.callback.lock() = Some(Arc::clone(&callback));
        self.inner.bound.store(false, Ordering::SeqCst);

        let event = match behavior {
            ConnectBehavior::Accept => ServiceEvent::Connected,
            ConnectBehavior::Refuse => ServiceEvent::Disconnected,
            ConnectBehavior::Silent | ConnectBehavior::FailInit => return Ok(()),
        };

        let delay = *self.inner.connect_delay.lock();
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Only answer if this binding was not replaced or torn down.
            let current = inner
                .callback
                .lock()
                .as_ref()
                .is_some_and(|cb| Arc::ptr_eq(cb, &callback));
            if !current {
                return;
            }

            if event.is_connected() {
                inner.bound.store(true, Ordering::SeqCst);
            } else {
                inner.callback.lock().take();
            }
            callback(event);
        });

        Ok(())
    }

    async fn register(&self, model: &DeviceModel) -> Result<()> {
        self.inner.register_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_bound() {
            return Err(Error::service("register", "not bound"));
        }
        *self.inner.registered.lock() = Some(model.clone());
        Ok(())
    }

    async fn set_frame(&self, frame: &Grid) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::service("set_frame", "not bound"));
        }
        self.inner.frames.lock().push(frame.clone());
        self.inner.display_on.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close_display(&self) -> Result<()> {
        self.inner.close_display_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.display_on.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn teardown(&self) -> Result<()> {
        self.inner.teardown_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.callback.lock().take();
        self.inner.bound.store(false, Ordering::SeqCst);
        self.inner.registered.lock().take();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
