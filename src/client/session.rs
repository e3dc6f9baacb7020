//! Session access and auth lifecycle events
//!
//! The identity provider is consumed through the [`SessionProvider`] trait;
//! lifecycle events flow through an [`AuthContext`] constructed once at
//! application start and passed down explicitly. There is no global
//! singleton to reach for.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use super::error::FetchError;

/// A live session issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Read and refresh access to the identity provider's session
///
/// `get_session` may legitimately return `None` for a short window after
/// sign-in while the provider finishes writing the session to storage.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>, FetchError>;

    /// Force a token refresh. Used at most once per call chain on 401.
    async fn refresh(&self) -> Result<Session, FetchError>;
}

/// Auth lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Typed event fan-out for auth lifecycle changes
///
/// Wraps a broadcast channel; subscribers drop out by dropping their
/// receiver, so there is no listener bookkeeping to leak.
#[derive(Debug, Clone)]
pub struct AuthContext {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers. A send with no subscribers
    /// is not an error.
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}
