//! Client-side error taxonomy
//!
//! The split that matters downstream is retryable versus not: a `Transient`
//! failure can be offered a "retry" affordance, while a `Denied` response
//! cannot succeed again without a state change on the server.

use thiserror::Error;

/// Errors surfaced by the authenticated client layer
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or server-side infrastructure error. Safe to retry.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// The server answered with a denial. Retrying without a state change
    /// cannot succeed.
    #[error("Request denied ({status} {code}): {message}")]
    Denied {
        status: u16,
        code: String,
        message: String,
    },

    /// A 401 survived the single refresh-and-replay.
    #[error("Authentication failed after token refresh")]
    AuthExhausted,

    /// No active session is available to authenticate the call.
    #[error("No active session")]
    NoSession,

    /// Team-scoped call issued with no current team selection.
    #[error("No team selected")]
    NoTeamSelected,

    /// The server answered 2xx but the payload did not parse.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
