//! Single-flight session refresh for authenticated API calls
//!
//! Every call goes through [`AuthCoordinator::send`]. When a call comes back
//! with 401 the coordinator refreshes the session and replays the call once.
//! Concurrent 401s share one refresh:
//!
//! ```text
//!  caller A ──401──► leader ──POST /auth/refresh──► settle ──► replay A
//!  caller B ──401──► queued (oneshot) ─────────────────┤──────► replay B
//!  caller C ──401──► queued (oneshot) ─────────────────┘──────► replay C
//! ```
//!
//! The in-flight flag and the waiter queue sit behind one `std::sync::Mutex`.
//! Check-and-set and drain each happen inside a single critical section and
//! the lock is never held across an `.await`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use super::error::{error_message, ClientError};
use super::navigation::Navigator;
use super::request::{ApiRequest, ApiResponse, REFRESH_PATH};
use super::transport::Transport;
use crate::config::SessionConfig;

type RefreshOutcome = Result<(), ClientError>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

enum RefreshRole {
    Leader,
    Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Counters describing refresh activity since construction
#[derive(Debug, Default)]
struct RefreshCounters {
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
    queued: AtomicU64,
    retried: AtomicU64,
}

/// Snapshot of [`AuthCoordinator`] activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Refresh calls issued
    pub refreshes: u64,
    /// Refresh calls that failed
    pub refresh_failures: u64,
    /// Requests that waited on another caller's refresh
    pub queued: u64,
    /// Requests replayed after a refresh
    pub retried: u64,
}

/// Authenticated request coordinator
///
/// Construct once at startup, share behind an `Arc`, and hand it to whatever
/// issues API calls.
pub struct AuthCoordinator {
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    session: SessionConfig,
    state: Mutex<RefreshState>,
    counters: RefreshCounters,
}

impl AuthCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        session: SessionConfig,
    ) -> Self {
        Self {
            transport,
            navigator,
            session,
            state: Mutex::new(RefreshState::default()),
            counters: RefreshCounters::default(),
        }
    }

    /// Send `request`, transparently recovering from one session expiry
    ///
    /// # Errors
    ///
    /// - `NetworkUnreachable` if no response arrived
    /// - `ExemptEndpoint` for a 401 from login/register/refresh
    /// - `UnauthenticatedContext` for a 401 on a public route or an
    ///   opted-out request
    /// - `RefreshFailed` if the shared refresh failed
    /// - `SessionExpired` if the replay got 401 again
    /// - `Http` for any other error status
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        match self.attempt(&request).await {
            Err(ClientError::SessionExpired { .. }) if !request.is_retried() => {}
            outcome => return outcome,
        }

        match self.join_refresh() {
            RefreshRole::Leader => self.lead_refresh().await?,
            RefreshRole::Follower(receiver) => {
                tracing::debug!(path = %request.path, "Waiting for in-flight refresh");
                receiver.await.unwrap_or_else(|_| {
                    Err(ClientError::RefreshFailed {
                        reason: "refresh abandoned".to_string(),
                    })
                })?;
            }
        }

        self.counters.retried.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(method = %request.method, path = %request.path, "Replaying request");
        self.attempt(&request.into_retry()).await
    }

    /// Send `request` and decode a JSON success body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        self.send(request).await?.json()
    }

    /// Whether a refresh call is outstanding
    pub fn refresh_in_flight(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Number of requests waiting on the outstanding refresh
    pub fn pending_waiters(&self) -> usize {
        self.lock_state().waiters.len()
    }

    pub fn stats(&self) -> RefreshStats {
        RefreshStats {
            refreshes: self.counters.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.counters.refresh_failures.load(Ordering::Relaxed),
            queued: self.counters.queued.load(Ordering::Relaxed),
            retried: self.counters.retried.load(Ordering::Relaxed),
        }
    }

    /// One dispatch with 401 classification; never refreshes
    async fn attempt(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.execute(request).await.map_err(|e| {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                timeout = e.timeout,
                error = %e,
                "No response"
            );
            if e.timeout {
                ClientError::NetworkUnreachable(format!("timed out: {e}"))
            } else {
                ClientError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = response.status();
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            retried = request.is_retried(),
            "Response received"
        );

        if status.is_success() {
            return Ok(response);
        }

        if status != reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::from_response(&response));
        }

        Err(self.classify_unauthorized(request, &response))
    }

    fn classify_unauthorized(&self, request: &ApiRequest, response: &ApiResponse) -> ClientError {
        if request.is_auth_endpoint() {
            return ClientError::ExemptEndpoint {
                path: request.path.clone(),
                message: error_message(response),
            };
        }

        if !request.auto_refresh() {
            return ClientError::UnauthenticatedContext {
                path: request.path.clone(),
                route: None,
            };
        }

        let route = self.navigator.current_route();
        if self.session.is_public_route(&route) {
            return ClientError::UnauthenticatedContext {
                path: request.path.clone(),
                route: Some(route),
            };
        }

        ClientError::SessionExpired {
            path: request.path.clone(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn join_refresh(&self) -> RefreshRole {
        let mut state = self.lock_state();
        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            self.counters.queued.fetch_add(1, Ordering::Relaxed);
            RefreshRole::Follower(receiver)
        } else {
            state.in_flight = true;
            RefreshRole::Leader
        }
    }

    /// Clear the flag and release every waiter with `outcome`
    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        let released = waiters.len();
        for waiter in waiters {
            // A dropped receiver means that caller gave up; nothing to deliver.
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    async fn lead_refresh(&self) -> RefreshOutcome {
        let mut guard = LeaderGuard {
            coordinator: self,
            settled: false,
        };

        self.counters.refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Session expired, refreshing");

        let outcome = self.refresh_session().await;
        guard.settled = true;
        let released = self.settle(&outcome);

        match &outcome {
            Ok(()) => {
                tracing::info!(queued = released, "Session refreshed");
            }
            Err(e) => {
                self.counters.refresh_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(queued = released, error = %e, "Session refresh failed");
                self.redirect_to_login();
            }
        }

        outcome
    }

    async fn refresh_session(&self) -> RefreshOutcome {
        let request = ApiRequest::post(REFRESH_PATH).with_body(serde_json::json!({}));

        match self.transport.execute(&request).await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(ClientError::RefreshFailed {
                reason: format!(
                    "refresh rejected ({}): {}",
                    response.status().as_u16(),
                    error_message(&response)
                ),
            }),
            Err(e) => Err(ClientError::RefreshFailed {
                reason: e.to_string(),
            }),
        }
    }

    fn redirect_to_login(&self) {
        let route = self.navigator.current_route();
        if route.contains(&self.session.login_path) {
            return;
        }
        tracing::warn!(from = %route, to = %self.session.login_path, "Redirecting to login");
        self.navigator.redirect_to(&self.session.login_path);
    }
}

/// Releases waiters if the leading caller is dropped mid-refresh
struct LeaderGuard<'a> {
    coordinator: &'a AuthCoordinator,
    settled: bool,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Refresh abandoned by its caller");
            self.coordinator.settle(&Err(ClientError::RefreshFailed {
                reason: "refresh abandoned".to_string(),
            }));
        }
    }
}
