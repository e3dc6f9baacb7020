//! Session bootstrap state machine
//!
//! Drives the path from a sign-in event to a usable team list:
//!
//! `Init -> AwaitingSession -> FetchingTeams -> Ready`
//!
//! with `Error` reachable from either waiting state once its retry ceiling
//! is exhausted, and an explicit sign-out resetting everything to `Init`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::TeamId;

use tokio::sync::broadcast::error::RecvError;

use super::backoff;
use super::error::FetchError;
use super::selection::TeamSelectionStore;
use super::session::{AuthContext, AuthEvent, SessionProvider};

/// One entry of the principal's membership list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub role: String,
}

/// Fetch the caller's membership list from the server
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn fetch_teams(&self) -> Result<Vec<TeamSummary>, FetchError>;
}

/// Observable machine states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    Init,
    AwaitingSession,
    FetchingTeams,
    /// Terminal success. An empty team list is a valid terminal state.
    Ready(Vec<TeamSummary>),
    /// Terminal failure after retry exhaustion.
    Error(String),
}

/// Retry ceilings and delays for the bootstrap stages
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Fixed interval between session polls
    pub session_poll_interval: Duration,
    /// Attempts to observe a non-empty session token after sign-in
    pub session_poll_attempts: u32,
    /// Attempts per membership fetch round
    pub fetch_attempts: u32,
    /// Base delay for the doubling fetch backoff
    pub fetch_base_delay: Duration,
    /// Wait before the single empty-result recovery refetch
    pub recovery_delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            session_poll_interval: backoff::session_poll_delay(),
            session_poll_attempts: 5,
            fetch_attempts: 4,
            fetch_base_delay: Duration::from_millis(500),
            recovery_delay: Duration::from_secs(1),
        }
    }
}

/// The bootstrap machine. One instance per session.
pub struct SessionBootstrap {
    provider: Arc<dyn SessionProvider>,
    directory: Arc<dyn TeamDirectory>,
    selection: Arc<TeamSelectionStore>,
    config: BootstrapConfig,
    state: Mutex<BootstrapState>,
    /// Coalesces concurrent runs: a sign-in arriving while a run is in
    /// flight is dropped, not queued.
    in_flight: AtomicBool,
    /// The empty-result recovery fires at most once per sign-in.
    recovered: AtomicBool,
    /// Bumped on sign-out; a run that observes a newer epoch abandons
    /// itself without touching the state.
    epoch: AtomicU64,
}

impl SessionBootstrap {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        directory: Arc<dyn TeamDirectory>,
        selection: Arc<TeamSelectionStore>,
        config: BootstrapConfig,
    ) -> Self {
        Self {
            provider,
            directory,
            selection,
            config,
            state: Mutex::new(BootstrapState::Init),
            in_flight: AtomicBool::new(false),
            recovered: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state.lock().unwrap().clone()
    }

    /// Run the machine in response to a sign-in event.
    ///
    /// Returns the state observed when the run finishes or is coalesced
    /// away. Only one run makes progress at a time.
    pub async fn handle_sign_in(&self) -> BootstrapState {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Bootstrap already in flight; coalescing sign-in");
            return self.state();
        }

        self.recovered.store(false, Ordering::SeqCst);
        let epoch = self.epoch.load(Ordering::SeqCst);

        self.run(epoch).await;
        self.in_flight.store(false, Ordering::SeqCst);
        self.state()
    }

    /// Reset to `Init`, cancelling any retry sequence still in flight.
    pub fn handle_sign_out(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = BootstrapState::Init;
        debug!("Bootstrap reset on sign-out");
    }

    fn cancelled(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) != epoch
    }

    /// Set the state unless this run has been cancelled by a sign-out.
    fn transition(&self, epoch: u64, next: BootstrapState) -> bool {
        if self.cancelled(epoch) {
            return false;
        }
        *self.state.lock().unwrap() = next;
        true
    }

    async fn run(&self, epoch: u64) {
        if !self.transition(epoch, BootstrapState::AwaitingSession) {
            return;
        }

        if !self.await_session(epoch).await {
            return;
        }

        let Some(mut teams) = self.fetch_with_backoff(epoch).await else {
            return;
        };
        self.selection
            .reconcile(&teams.iter().map(|t| t.id).collect::<Vec<_>>());

        // An empty list just after sign-in may mean the fetch raced ahead of
        // server-side provisioning. Refetch once after a short delay instead
        // of trusting the empty result permanently.
        if teams.is_empty() && !self.recovered.swap(true, Ordering::SeqCst) {
            debug!("Empty team list after sign-in; scheduling one recovery refetch");
            tokio::time::sleep(self.config.recovery_delay).await;
            if self.cancelled(epoch) {
                return;
            }

            if !self.transition(epoch, BootstrapState::FetchingTeams) {
                return;
            }
            let Some(recovered) = self.fetch_with_backoff(epoch).await else {
                return;
            };
            teams = recovered;
            self.selection
                .reconcile(&teams.iter().map(|t| t.id).collect::<Vec<_>>());
        }

        self.transition(epoch, BootstrapState::Ready(teams));
    }

    /// Poll for a non-empty access token with a fixed interval and a small
    /// bounded attempt count. True once a token is observed.
    async fn await_session(&self, epoch: u64) -> bool {
        for attempt in 1..=self.config.session_poll_attempts {
            if self.cancelled(epoch) {
                return false;
            }

            match self.provider.get_session().await {
                Ok(Some(session)) if !session.access_token.is_empty() => {
                    debug!(attempt, "Session observed");
                    return self.transition(epoch, BootstrapState::FetchingTeams);
                }
                Ok(_) => {
                    debug!(attempt, "Session not yet available");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Session lookup failed");
                }
            }

            if attempt < self.config.session_poll_attempts {
                tokio::time::sleep(self.config.session_poll_interval).await;
            }
        }

        self.transition(
            epoch,
            BootstrapState::Error("Session never became available after sign-in".to_string()),
        );
        false
    }

    /// One bounded round of membership fetches with doubling backoff.
    /// `None` means the run ended (error state set or cancelled).
    async fn fetch_with_backoff(&self, epoch: u64) -> Option<Vec<TeamSummary>> {
        for attempt in 1..=self.config.fetch_attempts {
            if self.cancelled(epoch) {
                return None;
            }

            match self.directory.fetch_teams().await {
                Ok(teams) => {
                    debug!(attempt, count = teams.len(), "Fetched team list");
                    return Some(teams);
                }
                Err(e) if e.is_transient() && attempt < self.config.fetch_attempts => {
                    let delay = backoff::team_fetch_delay(attempt, self.config.fetch_base_delay);
                    warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Team fetch failed; backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Team fetch failed terminally");
                    self.transition(epoch, BootstrapState::Error(e.to_string()));
                    return None;
                }
            }
        }

        // Unreachable: the loop always returns, but keep the machine sane.
        self.transition(
            epoch,
            BootstrapState::Error("Team fetch retries exhausted".to_string()),
        );
        None
    }
}

/// Subscribe a bootstrap machine to auth lifecycle events.
///
/// The subscription is taken before the task is spawned, so an event emitted
/// right after this returns is never missed. The task ends once every
/// [`AuthContext`] handle is dropped.
pub fn spawn_auth_driver(
    bootstrap: Arc<SessionBootstrap>,
    events: &AuthContext,
) -> tokio::task::JoinHandle<()> {
    let mut rx = events.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(AuthEvent::SignedIn) => {
                    bootstrap.handle_sign_in().await;
                }
                Ok(AuthEvent::SignedOut) => bootstrap.handle_sign_out(),
                Ok(AuthEvent::TokenRefreshed) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
