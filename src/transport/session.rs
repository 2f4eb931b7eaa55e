//! Session handle over a display service binding.
//!
//! A [`Session`] ties one connection attempt to the service. Every service
//! call goes through it, which gives two guarantees:
//!
//! - Errors and panics from the service are converted into [`Error`]
//!   values tagged with the operation name.
//! - Once a session is closed (released, superseded, or lost), frame and
//!   clear calls on it fail with [`Error::ConnectionClosed`] instead of
//!   reaching the service.
//!
//! Frame and clear calls hold the call lock shared while the service runs;
//! `shutdown` takes it exclusively, so teardown starts only after in-flight
//! calls have drained. A call that was running when the session closed
//! reports [`Error::ConnectionClosed`] even if the service accepted it.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{AttemptId, SessionId};
use crate::pattern::Grid;
use crate::protocol::DeviceModel;

use super::service::{DisplayService, ServiceCallback};

// ============================================================================
// Session
// ============================================================================

/// One binding to the display service.
pub struct Session {
    /// Unique session identity.
    id: SessionId,
    /// Attempt that created this session.
    attempt: AttemptId,
    /// The service capability.
    service: Arc<dyn DisplayService>,
    /// Cleared on release, supersede, or session loss.
    open: AtomicBool,
    /// Shared by frame and clear calls, exclusive during shutdown.
    calls: RwLock<()>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("attempt", &self.attempt)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Constructor & Accessors
// ============================================================================

impl Session {
    /// Creates an open session for `attempt`.
    pub(crate) fn new(attempt: AttemptId, service: Arc<dyn DisplayService>) -> Self {
        Self {
            id: SessionId::generate(),
            attempt,
            service,
            open: AtomicBool::new(true),
            calls: RwLock::new(()),
        }
    }

    /// Returns the session id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the attempt that created this session.
    #[inline]
    #[must_use]
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Returns `true` until the session is closed.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Marks the session closed. Returns `true` if it was open.
    #[inline]
    pub(crate) fn close(&self) -> bool {
        self.open.swap(false, Ordering::AcqRel)
    }
}

// ============================================================================
// Session - Service Calls
// ============================================================================

impl Session {
    /// Requests the binding.
    pub(crate) async fn init(&self, callback: ServiceCallback) -> Result<()> {
        self.ensure_open()?;
        guarded("init", self.service.init(callback)).await
    }

    /// Registers the device model.
    pub(crate) async fn register(&self, model: &DeviceModel) -> Result<()> {
        self.ensure_open()?;
        guarded("register", self.service.register(model)).await
    }

    /// Forwards a frame to the display.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the session is closed
    /// - [`Error::Service`] / [`Error::ServicePanicked`] if the service fails
    pub async fn set_frame(&self, frame: &Grid) -> Result<()> {
        let _call = self.calls.read().await;
        self.ensure_open()?;
        self.still_open(guarded("set_frame", self.service.set_frame(frame)).await)?;
        trace!(session_id = %self.id, lit = frame.lit_count(), "Frame forwarded");
        Ok(())
    }

    /// Turns the display off.
    ///
    /// # Errors
    ///
    /// Same as [`Session::set_frame`].
    pub async fn close_display(&self) -> Result<()> {
        let _call = self.calls.read().await;
        self.ensure_open()?;
        self.still_open(guarded("close_display", self.service.close_display()).await)
    }

    /// Closes the session and tears down the binding.
    ///
    /// With `clear_display`, the display is turned off first. Teardown runs
    /// even if clearing fails; the first error is returned. Waits for frame
    /// and clear calls already running on this session.
    pub(crate) async fn shutdown(&self, clear_display: bool) -> Result<()> {
        self.close();
        let _exclusive = self.calls.write().await;

        let cleared = if clear_display {
            guarded("close_display", self.service.close_display()).await
        } else {
            Ok(())
        };

        if let Err(ref e) = cleared {
            warn!(session_id = %self.id, error = %e, "Failed to clear display on shutdown");
        }

        let torn_down = guarded("teardown", self.service.teardown()).await;
        if let Err(ref e) = torn_down {
            warn!(session_id = %self.id, error = %e, "Failed to tear down binding");
        }

        debug!(session_id = %self.id, attempt = %self.attempt, "Session shut down");
        cleared.and(torn_down)
    }

    /// Reports [`Error::ConnectionClosed`] if the session was closed while
    /// the call ran, whatever the service answered.
    fn still_open(&self, result: Result<()>) -> Result<()> {
        if self.is_open() {
            return result;
        }
        match result {
            Ok(()) => debug!(session_id = %self.id, "Call completed on a closing session"),
            Err(ref e) => debug!(session_id = %self.id, error = %e, "Call raced with session close"),
        }
        Err(Error::ConnectionClosed)
    }

    /// Fails closed once the session is no longer open.
    #[inline]
    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::ConnectionClosed)
        }
    }
}

// ============================================================================
// Call Boundary
// ============================================================================

/// Runs a service call, converting panics and foreign errors.
///
/// Connection and service errors pass through; anything else the service
/// returned is wrapped as [`Error::Service`] for `operation`.
async fn guarded<F>(operation: &'static str, call: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) if e.is_connection_error() || e.is_service_error() => Err(e),
        Ok(Err(e)) => Err(Error::service(operation, e.to_string())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(operation, message = %message, "Display service panicked");
            Err(Error::service_panicked(operation, message))
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::transport::LoopbackService;

    /// Service whose every call panics.
    struct PanickingService;

    #[async_trait]
    impl DisplayService for PanickingService {
        async fn init(&self, _callback: ServiceCallback) -> Result<()> {
            panic!("init exploded");
        }
        async fn register(&self, _model: &DeviceModel) -> Result<()> {
            panic!("register exploded");
        }
        async fn set_frame(&self, _frame: &Grid) -> Result<()> {
            panic!("{}", String::from("set_frame exploded"));
        }
        async fn close_display(&self) -> Result<()> {
            Err(Error::config("not a service error"))
        }
        async fn teardown(&self) -> Result<()> {
            Ok(())
        }
    }

    /// Service whose frames take a while; counts frames finishing after teardown.
    #[derive(Default)]
    struct SlowFrameService {
        torn_down: AtomicBool,
        late_frames: AtomicUsize,
    }

    #[async_trait]
    impl DisplayService for SlowFrameService {
        async fn init(&self, _callback: ServiceCallback) -> Result<()> {
            Ok(())
        }
        async fn register(&self, _model: &DeviceModel) -> Result<()> {
            Ok(())
        }
        async fn set_frame(&self, _frame: &Grid) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if self.torn_down.load(Ordering::SeqCst) {
                self.late_frames.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
        async fn close_display(&self) -> Result<()> {
            Ok(())
        }
        async fn teardown(&self) -> Result<()> {
            self.torn_down.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn session_over(service: impl DisplayService) -> Session {
        Session::new(AttemptId::next(), Arc::new(service))
    }

    #[tokio::test]
    async fn test_panics_become_errors() {
        let session = session_over(PanickingService);

        let err = session.set_frame(&Grid::empty()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ServicePanicked { operation: "set_frame", ref message } if message == "set_frame exploded"
        ));

        let err = session.init(Arc::new(|_| {})).await.unwrap_err();
        assert!(matches!(err, Error::ServicePanicked { operation: "init", .. }));
    }

    #[tokio::test]
    async fn test_foreign_errors_are_wrapped() {
        let session = session_over(PanickingService);
        let err = session.close_display().await.unwrap_err();
        assert!(matches!(err, Error::Service { operation: "close_display", .. }));
    }

    #[tokio::test]
    async fn test_closed_session_fails_closed() {
        let service = LoopbackService::new();
        let session = session_over(service.clone());

        assert!(session.close());
        assert!(!session.close());

        let err = session.set_frame(&Grid::filled(255)).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
        assert!(service.frames().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_frame_in_flight() {
        let service = Arc::new(SlowFrameService::default());
        let session = Arc::new(Session::new(AttemptId::next(), service.clone()));

        let sending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.set_frame(&Grid::filled(255)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        session.close();
        session.shutdown(true).await.expect("shutdown");

        let result = sending.await.expect("join");
        assert!(matches!(result, Err(Error::ConnectionClosed)));
        assert!(service.torn_down.load(Ordering::SeqCst));
        assert_eq!(service.late_frames.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_clears_and_tears_down() {
        let service = LoopbackService::new();
        let session = session_over(service.clone());

        session.shutdown(true).await.expect("shutdown");

        assert!(!session.is_open());
        assert_eq!(service.close_display_calls(), 1);
        assert_eq!(service.teardown_calls(), 1);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
