//! Backoff schedules as pure functions
//!
//! Each retrying loop in the client asks one of these functions for its next
//! delay instead of chaining timers inline. `attempt` is 1-based: the delay
//! returned for attempt N is the wait after the Nth failure.

use std::time::Duration;

/// Upper bound on any computed delay
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Fixed interval between session polls after sign-in
pub fn session_poll_delay() -> Duration {
    Duration::from_millis(200)
}

/// Exponential backoff for membership fetches: the base delay doubles with
/// each failed attempt, capped at [`MAX_DELAY`].
pub fn team_fetch_delay(attempt: u32, base: Duration) -> Duration {
    let attempt = attempt.max(1);
    let factor = 2_u32.saturating_pow(attempt - 1);
    base.saturating_mul(factor).min(MAX_DELAY)
}

/// Linear backoff for network-level failures on authenticated calls
pub fn network_retry_delay(attempt: u32, step: Duration) -> Duration {
    step.saturating_mul(attempt.max(1)).min(MAX_DELAY)
}
