//! Connection manager for the display service.
//!
//! The [`ConnectionManager`] owns the single session to the display
//! service. `send` and `clear` make sure a session is live before
//! forwarding; `release` tears it down.
//!
//! # Connection Protocol
//!
//! Every operation first runs `ensure_connected`:
//!
//! 1. **Fast path** - state is `Connected` and the session is open: use it.
//! 2. **Claim** - state is `Disconnected`: atomically move to `Connecting`
//!    and become the initiator. The initiator tears down any stale session,
//!    calls `init`, waits for the connect callback, registers the device
//!    model and publishes `Connected`.
//! 3. **Wait** - state is `Connecting`: another caller is the initiator.
//!    Wait for the state to leave `Connecting`, without starting a second
//!    attempt.
//!
//! Both the initiator and the waiters are bounded by
//! [`ConnectionOptions::connect_timeout`]. A timeout reverts the state to
//! `Disconnected` and is reported as [`Error::ConnectionTimeout`]; the next
//! call starts over.
//!
//! # Concurrency
//!
//! State transitions happen under the session slot lock and are published
//! through a `watch` channel, so waiters are woken by the transition
//! itself. Each attempt carries an [`AttemptId`]; `release` draws a new one,
//! which supersedes any attempt in flight and makes its callbacks stale.
//! Binding setup and teardown never interleave: the initiator holds the
//! lifecycle lock across stale teardown and `init`, `release` across its
//! whole shutdown.
//!
//! # Cancellation
//!
//! Dropping an operation future cancels it. If the dropped future was the
//! initiator, a guard reverts `Connecting` to `Disconnected` and closes the
//! half-open session, so waiters never hang on an abandoned attempt. The
//! binding itself is torn down by the next attempt or by `release`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, oneshot, watch};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identifiers::{AttemptId, SessionId};
use crate::pattern::Grid;
use crate::protocol::ServiceEvent;
use crate::transport::{DisplayService, ServiceCallback, Session};

use super::builder::ConnectionManagerBuilder;
use super::options::ConnectionOptions;
use super::state::ConnectionState;

// ============================================================================
// Process-wide Instance
// ============================================================================

/// Lazily created process-wide manager.
static SHARED: OnceLock<ConnectionManager> = OnceLock::new();

/// Deadline used when the configured timeout overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// ============================================================================
// Types
// ============================================================================

/// The session handle and the attempt that owns it.
#[derive(Debug)]
struct SessionSlot {
    /// Current attempt; older attempts are stale.
    attempt: AttemptId,
    /// Session of the current attempt.
    session: Option<Arc<Session>>,
}

/// Internal shared state for the manager.
pub(crate) struct ManagerInner {
    /// Display service capability.
    service: Arc<dyn DisplayService>,
    /// Configuration.
    options: ConnectionOptions,
    /// Published connection state.
    state: watch::Sender<ConnectionState>,
    /// Session slot. Every state transition happens under this lock.
    slot: RwLock<SessionSlot>,
    /// Serializes binding setup against teardown.
    lifecycle: AsyncMutex<()>,
}

// ============================================================================
// ConnectionManager
// ============================================================================

/// Owner of the session to the display service.
///
/// Cheap to clone; clones share the same session. Each manager holds at
/// most one session at a time.
///
/// The single-session guarantee is per manager. Managers built separately
/// over the same service each keep their own session and do not coordinate.
/// Code that needs the one session of the process should reach it through
/// [`ConnectionManager::shared_or_init`] and [`ConnectionManager::shared`].
///
/// # Example
///
/// ```ignore
/// use glyph_matrix::{ConnectionManager, Grid, LoopbackService};
///
/// let manager = ConnectionManager::builder()
///     .service(LoopbackService::new())
///     .build()?;
///
/// manager.send(&Grid::filled(255)).await?;
/// manager.clear().await?;
/// manager.release().await?;
/// ```
#[derive(Clone)]
pub struct ConnectionManager {
    /// Shared inner state.
    pub(crate) inner: Arc<ManagerInner>,
}

// ============================================================================
// ConnectionManager - Display
// ============================================================================

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("session_id", &self.session_id())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ConnectionManager - Constructors
// ============================================================================

impl ConnectionManager {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConnectionManagerBuilder {
        ConnectionManagerBuilder::new()
    }

    /// Creates a manager. Options must already be validated.
    pub(crate) fn new(service: Arc<dyn DisplayService>, options: ConnectionOptions) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        let inner = Arc::new(ManagerInner {
            service,
            options,
            state,
            slot: RwLock::new(SessionSlot {
                attempt: AttemptId::NONE,
                session: None,
            }),
            lifecycle: AsyncMutex::new(()),
        });

        debug!(
            timeout_ms = inner.options.connect_timeout_ms,
            device = %inner.options.device_model,
            "ConnectionManager created"
        );

        Self { inner }
    }

    /// Returns the process-wide manager, creating it on first use.
    ///
    /// `init` runs only if no process-wide manager exists yet. If two
    /// threads race, one manager wins and both receive it.
    ///
    /// # Errors
    ///
    /// Whatever `init` returns.
    pub fn shared_or_init<F>(init: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Self>,
    {
        if let Some(manager) = SHARED.get() {
            return Ok(manager.clone());
        }

        let manager = init()?;
        Ok(SHARED.get_or_init(|| manager).clone())
    }

    /// Returns the process-wide manager, if one was created.
    #[inline]
    #[must_use]
    pub fn shared() -> Option<Self> {
        SHARED.get().cloned()
    }
}

// ============================================================================
// ConnectionManager - Public API
// ============================================================================

impl ConnectionManager {
    /// Shows a frame on the display, connecting first if needed.
    ///
    /// The grid is forwarded as-is; decode and validate it beforehand.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if no session became ready in time
    /// - [`Error::ServiceRefused`] / [`Error::Connection`] if connecting failed
    /// - [`Error::ConnectionClosed`] if the session was released meanwhile
    /// - [`Error::Service`] / [`Error::ServicePanicked`] if the service failed
    pub async fn send(&self, grid: &Grid) -> Result<()> {
        let session = self.ensure_connected().await?;
        session.set_frame(grid).await
    }

    /// Turns the display off, connecting first if needed.
    ///
    /// # Errors
    ///
    /// Same as [`ConnectionManager::send`].
    pub async fn clear(&self) -> Result<()> {
        let session = self.ensure_connected().await?;
        session.close_display().await?;
        debug!(session_id = %session.id(), "Display cleared");
        Ok(())
    }

    /// Establishes a session without sending anything.
    ///
    /// # Errors
    ///
    /// Same connection errors as [`ConnectionManager::send`].
    pub async fn connect(&self) -> Result<SessionId> {
        self.ensure_connected().await.map(|session| session.id())
    }

    /// Clears the display, closes the session and resets to `Disconnected`.
    ///
    /// Idempotent and safe to call when never connected. Any attempt in
    /// flight is superseded, and operations holding the old session fail
    /// with [`Error::ConnectionClosed`]. The state is `Disconnected` when
    /// this returns, even if the service reported an error.
    ///
    /// # Errors
    ///
    /// The first service error hit while clearing or tearing down.
    pub async fn release(&self) -> Result<()> {
        let _lifecycle = self.inner.lifecycle.lock().await;

        let session = {
            let mut slot = self.inner.slot.write();
            slot.attempt = AttemptId::next();
            let session = slot.session.take();
            if let Some(ref session) = session {
                session.close();
            }
            self.inner.set_state(ConnectionState::Disconnected);
            session
        };

        match session {
            Some(session) => {
                let result = session.shutdown(self.inner.options.clear_on_release).await;
                info!(session_id = %session.id(), "Session released");
                result
            }
            None => {
                debug!("Release with no session");
                Ok(())
            }
        }
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Returns `true` if a session is ready.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.live_session().is_some()
    }

    /// Returns the id of the ready session, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.live_session().map(|session| session.id())
    }

    /// Subscribes to state changes.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ConnectionOptions {
        &self.inner.options
    }
}

// ============================================================================
// ConnectionManager - Connection Protocol
// ============================================================================

impl ConnectionManager {
    /// Returns a live session, establishing one if needed.
    async fn ensure_connected(&self) -> Result<Arc<Session>> {
        if let Some(session) = self.live_session() {
            return Ok(session);
        }

        match self.try_claim() {
            Some(attempt) => self.initiate(attempt).await,
            None => self.wait_for_initiator().await,
        }
    }

    /// Fast path: the session, if the state is `Connected` and it is open.
    fn live_session(&self) -> Option<Arc<Session>> {
        if !self.state().is_connected() {
            return None;
        }
        self.inner
            .slot
            .read()
            .session
            .as_ref()
            .filter(|session| session.is_open())
            .cloned()
    }

    /// Moves `Disconnected → Connecting` and returns the new attempt.
    ///
    /// Returns `None` if another caller holds the claim or a session is up.
    fn try_claim(&self) -> Option<AttemptId> {
        let mut slot = self.inner.slot.write();
        if self.state() != ConnectionState::Disconnected {
            return None;
        }

        let attempt = AttemptId::next();
        slot.attempt = attempt;
        self.inner.set_state(ConnectionState::Connecting);
        debug!(%attempt, "Claimed connection attempt");
        Some(attempt)
    }

    /// Runs a connection attempt as its single initiator.
    async fn initiate(&self, attempt: AttemptId) -> Result<Arc<Session>> {
        let timeout_dur = self.inner.options.connect_timeout();
        let now = Instant::now();
        let deadline = now.checked_add(timeout_dur).unwrap_or(now + FAR_FUTURE);
        let timeout_ms = self.inner.options.connect_timeout_ms;
        let mut guard = ConnectingGuard::new(Arc::clone(&self.inner), attempt);

        let lifecycle = timeout_at(deadline, self.inner.lifecycle.lock())
            .await
            .map_err(|_| Error::connection_timeout(timeout_ms))?;

        // Tear down whatever an earlier attempt left behind.
        let stale = self.inner.with_current(attempt, |slot| slot.session.take())?;
        if let Some(stale) = stale {
            debug!(session_id = %stale.id(), "Tearing down stale session");
            match timeout_at(deadline, stale.shutdown(false)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Stale session teardown failed"),
                Err(_) => return Err(Error::connection_timeout(timeout_ms)),
            }
        }

        let session = Arc::new(Session::new(attempt, Arc::clone(&self.inner.service)));
        self.inner.with_current(attempt, |slot| {
            slot.session = Some(Arc::clone(&session));
        })?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let callback = make_callback(Arc::downgrade(&self.inner), attempt, ready_tx);

        debug!(%attempt, session_id = %session.id(), "Requesting display service binding");
        timeout_at(deadline, session.init(callback))
            .await
            .map_err(|_| Error::connection_timeout(timeout_ms))??;
        drop(lifecycle);

        let event = match timeout_at(deadline, ready_rx).await {
            Ok(Ok(event)) => event,
            Ok(Err(_)) => {
                return Err(Error::connection(
                    "display service dropped the connect callback",
                ));
            }
            Err(_) => {
                warn!(%attempt, timeout_ms, "Display service did not become ready");
                return Err(Error::connection_timeout(timeout_ms));
            }
        };

        if !event.is_connected() {
            warn!(%attempt, "Display service refused the binding");
            return Err(Error::ServiceRefused);
        }

        timeout_at(deadline, session.register(&self.inner.options.device_model))
            .await
            .map_err(|_| Error::connection_timeout(timeout_ms))??;

        self.inner.with_current(attempt, |_| {
            if session.is_open() {
                self.inner.set_state(ConnectionState::Connected);
                Ok(())
            } else {
                Err(Error::ConnectionClosed)
            }
        })??;
        guard.disarm();

        info!(
            %attempt,
            session_id = %session.id(),
            device = %self.inner.options.device_model,
            "Display session connected"
        );

        Ok(session)
    }

    /// Waits for another caller's attempt to resolve.
    async fn wait_for_initiator(&self) -> Result<Arc<Session>> {
        let timeout_dur = self.inner.options.connect_timeout();
        let mut rx = self.inner.state.subscribe();

        debug!("Waiting for in-flight connection attempt");

        let resolved = timeout(
            timeout_dur,
            rx.wait_for(|state| !state.is_connecting()),
        )
        .await
        .map(|changed| changed.map(|state| *state));

        match resolved {
            Ok(Ok(ConnectionState::Connected)) => {
                self.live_session().ok_or(Error::ConnectionClosed)
            }
            Ok(Ok(_)) => Err(Error::connection("connection attempt failed")),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let timeout_ms = self.inner.options.connect_timeout_ms;
                warn!(timeout_ms, "Timed out waiting for connection attempt");
                Err(Error::connection_timeout(timeout_ms))
            }
        }
    }
}

// ============================================================================
// ManagerInner
// ============================================================================

impl ManagerInner {
    /// Publishes a state. Caller must hold the slot write lock.
    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "Connection state changed");
        }
    }

    /// Runs `f` under the slot lock if `attempt` is still current.
    ///
    /// # Errors
    ///
    /// [`Error::ConnectionClosed`] if the attempt was superseded.
    fn with_current<T>(
        &self,
        attempt: AttemptId,
        f: impl FnOnce(&mut SessionSlot) -> T,
    ) -> Result<T> {
        let mut slot = self.slot.write();
        if slot.attempt != attempt {
            debug!(%attempt, current = %slot.attempt, "Attempt superseded");
            return Err(Error::ConnectionClosed);
        }
        Ok(f(&mut slot))
    }

    /// Handles session loss reported by the service.
    fn on_session_lost(&self, attempt: AttemptId) {
        let mut slot = self.slot.write();
        if slot.attempt != attempt {
            debug!(%attempt, "Ignoring disconnect from stale attempt");
            return;
        }

        if let Some(ref session) = slot.session
            && session.attempt() == attempt
        {
            session.close();
        }

        // While connecting, the initiator notices the closed session itself.
        let connected = self.state.borrow().is_connected();
        if connected {
            slot.session = None;
            self.set_state(ConnectionState::Disconnected);
            warn!(%attempt, "Display session lost");
        }
    }
}

// ============================================================================
// Service Callback
// ============================================================================

/// Builds the callback handed to `init` for one attempt.
///
/// The first event resolves the attempt. A later `Disconnected` reports
/// session loss; events for superseded attempts are ignored.
fn make_callback(
    inner: Weak<ManagerInner>,
    attempt: AttemptId,
    ready_tx: oneshot::Sender<ServiceEvent>,
) -> ServiceCallback {
    let ready = Mutex::new(Some(ready_tx));

    Arc::new(move |event: ServiceEvent| {
        if let Some(tx) = ready.lock().take() {
            debug!(%attempt, %event, "Connection attempt resolved");
            let _ = tx.send(event);
            return;
        }

        match event {
            ServiceEvent::Disconnected => {
                if let Some(inner) = inner.upgrade() {
                    inner.on_session_lost(attempt);
                }
            }
            ServiceEvent::Connected => {
                debug!(%attempt, "Ignoring repeated connect event");
            }
        }
    })
}

// ============================================================================
// ConnectingGuard
// ============================================================================

/// Reverts an abandoned attempt to `Disconnected`.
///
/// Armed while the initiator runs. Dropped armed (error, timeout, or the
/// caller's future being dropped), it releases the claim and closes the
/// half-open session, unless the attempt was already superseded.
struct ConnectingGuard {
    inner: Arc<ManagerInner>,
    attempt: AttemptId,
    armed: bool,
}

impl ConnectingGuard {
    fn new(inner: Arc<ManagerInner>, attempt: AttemptId) -> Self {
        Self {
            inner,
            attempt,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ConnectingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let slot = self.inner.slot.write();
        if slot.attempt != self.attempt {
            return;
        }

        // The closed session stays in the slot; the next initiator or
        // `release` tears it down.
        if let Some(ref session) = slot.session {
            session.close();
        }
        self.inner.set_state(ConnectionState::Disconnected);

        debug!(attempt = %self.attempt, "Connection attempt abandoned");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::transport::{ConnectBehavior, LoopbackService};

    fn manager_with(service: &LoopbackService, timeout_ms: u64) -> ConnectionManager {
        ConnectionManager::builder()
            .service(service.clone())
            .connect_timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("build manager")
    }

    #[tokio::test]
    async fn test_send_connects_and_forwards() {
        let service = LoopbackService::new();
        let manager = manager_with(&service, 1000);

        assert_eq!(manager.state(), ConnectionState::Disconnected);
        manager.send(&Grid::filled(255)).await.expect("send");

        assert_eq!(manager.state(), ConnectionState::Connected);
        assert!(manager.is_connected());
        assert_eq!(service.init_calls(), 1);
        assert_eq!(service.register_calls(), 1);
        assert_eq!(service.registered_model().map(|m| m.code().to_string()), Some("23112".into()));
        assert_eq!(service.last_frame(), Some(Grid::filled(255)));
    }

    #[tokio::test]
    async fn test_connected_calls_reuse_session() {
        let service = LoopbackService::new();
        let manager = manager_with(&service, 1000);

        manager.send(&Grid::empty()).await.expect("first send");
        let session_id = manager.session_id();
        manager.send(&Grid::filled(17)).await.expect("second send");
        manager.clear().await.expect("clear");

        assert_eq!(manager.session_id(), session_id);
        assert_eq!(service.init_calls(), 1);
        assert_eq!(service.frames().len(), 2);
        assert!(!service.is_display_on());
    }

    #[tokio::test]
    async fn test_timeout_reverts_to_disconnected() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Silent);
        let manager = manager_with(&service, 100);

        let err = manager.send(&Grid::empty()).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_manager_recovers_after_failure() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Silent);
        let manager = manager_with(&service, 100);

        assert!(manager.clear().await.is_err());

        service.set_behavior(ConnectBehavior::Accept);
        manager.clear().await.expect("clear after recovery");
        assert_eq!(service.init_calls(), 2);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn test_refused_binding() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Refuse);
        let manager = manager_with(&service, 1000);

        let err = manager.send(&Grid::empty()).await.unwrap_err();
        assert!(matches!(err, Error::ServiceRefused));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_init_failure_is_reported() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::FailInit);
        let manager = manager_with(&service, 1000);

        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, Error::Service { operation: "init", .. }));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let service = LoopbackService::new();
        let manager = manager_with(&service, 1000);

        manager.release().await.expect("release when never connected");
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        manager.send(&Grid::filled(255)).await.expect("send");
        manager.release().await.expect("first release");
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        manager.release().await.expect("second release");
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        assert_eq!(service.teardown_calls(), 1);
        assert_eq!(service.close_display_calls(), 1);
        assert!(!service.is_bound());
    }

    #[tokio::test]
    async fn test_release_without_clear() {
        let service = LoopbackService::new();
        let manager = ConnectionManager::builder()
            .service(service.clone())
            .clear_on_release(false)
            .build()
            .expect("build");

        manager.send(&Grid::filled(255)).await.expect("send");
        manager.release().await.expect("release");
        assert_eq!(service.close_display_calls(), 0);
        assert_eq!(service.teardown_calls(), 1);
    }

    #[tokio::test]
    async fn test_session_loss_triggers_reconnect() {
        let service = LoopbackService::new();
        let manager = manager_with(&service, 1000);

        manager.send(&Grid::empty()).await.expect("send");
        let first = manager.session_id();

        assert!(service.disconnect());
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        manager.send(&Grid::filled(34)).await.expect("send after loss");
        assert_ne!(manager.session_id(), first);
        assert_eq!(service.init_calls(), 2);
    }

    #[tokio::test]
    async fn test_dropped_initiator_releases_claim() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Silent);
        let manager = manager_with(&service, 5000);

        let result = tokio::time::timeout(Duration::from_millis(50), manager.connect()).await;
        assert!(result.is_err(), "connect should still be pending");
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        service.set_behavior(ConnectBehavior::Accept);
        manager.connect().await.expect("connect after cancel");
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn test_release_supersedes_attempt_in_flight() {
        let service = LoopbackService::new().with_connect_delay(Duration::from_millis(100));
        let manager = manager_with(&service, 1000);

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.connect().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(manager.state(), ConnectionState::Connecting);
        manager.release().await.expect("release");
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        let outcome = pending.await.expect("join");
        assert!(outcome.is_err());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_subscribe_observes_transitions() {
        let service = LoopbackService::new().with_connect_delay(Duration::from_millis(20));
        let manager = manager_with(&service, 1000);
        let mut rx = manager.subscribe();

        let connect = manager.connect();
        tokio::pin!(connect);

        tokio::select! {
            _ = &mut connect => panic!("connect finished before first transition"),
            changed = rx.changed() => {
                changed.expect("sender alive");
                assert_eq!(*rx.borrow_and_update(), ConnectionState::Connecting);
            }
        }

        connect.await.expect("connect");
        assert_eq!(*rx.borrow_and_update(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_huge_timeout_does_not_overflow_deadline() {
        let service = LoopbackService::new();
        let manager = ConnectionManager::builder()
            .service(service.clone())
            .connect_timeout(Duration::MAX)
            .build()
            .expect("build");

        manager.connect().await.expect("connect");
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn test_separately_built_managers_do_not_share_a_session() {
        let service = LoopbackService::new();
        let first = manager_with(&service, 1000);
        let second = manager_with(&service, 1000);
        let clone = first.clone();

        first.connect().await.expect("first connect");
        assert_eq!(clone.session_id(), first.session_id());
        assert!(!second.is_connected());

        second.connect().await.expect("second connect");
        assert_ne!(first.session_id(), second.session_id());
        assert_eq!(service.init_calls(), 2);
    }

    #[test]
    fn test_manager_is_clone_and_debug() {
        fn assert_clone<T: Clone>() {}
        fn assert_debug<T: std::fmt::Debug>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<ConnectionManager>();
        assert_debug::<ConnectionManager>();
        assert_send_sync::<ConnectionManager>();
    }

    #[test]
    fn test_shared_instance_is_created_once() {
        let first = ConnectionManager::shared_or_init(|| {
            ConnectionManager::builder()
                .service(LoopbackService::new())
                .build()
        })
        .expect("shared manager");

        let second = ConnectionManager::shared_or_init(|| {
            panic!("init must not run twice");
        })
        .expect("shared manager");

        assert!(Arc::ptr_eq(&first.inner, &second.inner));
        let third = ConnectionManager::shared().expect("shared manager exists");
        assert!(Arc::ptr_eq(&first.inner, &third.inner));
    }
}
