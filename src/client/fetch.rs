//! Authenticated HTTP calls
//!
//! Every team-scoped request carries the current bearer token and a
//! `team_id` sourced from the [`TeamSelectionStore`], never from the caller.
//! A stale view cannot address the wrong team that way.
//!
//! Retry policy, in two distinct layers:
//! - first 401 in a call chain: exactly one session refresh and one replay,
//!   a second 401 is terminal
//! - network-level failures (not HTTP error statuses): linear backoff up to
//!   a small fixed ceiling

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::TeamId;

use super::backoff;
use super::bootstrap::{TeamDirectory, TeamSummary};
use super::error::FetchError;
use super::selection::TeamSelectionStore;
use super::session::SessionProvider;

/// Whether a request targets a team-scoped endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    Global,
    TeamScoped,
}

/// Network retry knobs
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub network_attempts: u32,
    pub network_retry_step: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            network_attempts: 3,
            network_retry_step: Duration::from_millis(250),
        }
    }
}

/// HTTP client wrapper enforcing the auth and team-scoping rules
pub struct AuthenticatedFetch {
    client: reqwest::Client,
    base_url: String,
    provider: Arc<dyn SessionProvider>,
    selection: Arc<TeamSelectionStore>,
    config: FetchConfig,
}

impl AuthenticatedFetch {
    pub fn new(
        base_url: impl Into<String>,
        provider: Arc<dyn SessionProvider>,
        selection: Arc<TeamSelectionStore>,
    ) -> Self {
        Self::with_config(base_url, provider, selection, FetchConfig::default())
    }

    pub fn with_config(
        base_url: impl Into<String>,
        provider: Arc<dyn SessionProvider>,
        selection: Arc<TeamSelectionStore>,
        config: FetchConfig,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            provider,
            selection,
            config,
        }
    }

    /// Issue an authenticated request.
    ///
    /// For [`RequestScope::TeamScoped`] calls the current team id is attached
    /// as a `team_id` query parameter; a missing selection fails before any
    /// network traffic.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        scope: RequestScope,
        body: Option<&Value>,
    ) -> Result<Response, FetchError> {
        let session = self
            .provider
            .get_session()
            .await?
            .ok_or(FetchError::NoSession)?;

        let team_id = match scope {
            RequestScope::TeamScoped => {
                Some(self.selection.current().ok_or(FetchError::NoTeamSelected)?)
            }
            RequestScope::Global => None,
        };

        let response = self
            .send_with_retry(&method, path, team_id, body, &session.access_token)
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::finish(response).await;
        }

        // One refresh, one replay. No loop.
        debug!(path, "Got 401; refreshing session and replaying once");
        let refreshed = self.provider.refresh().await?;

        let response = self
            .send_with_retry(&method, path, team_id, body, &refreshed.access_token)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "Replay after refresh still unauthorized");
            return Err(FetchError::AuthExhausted);
        }

        Self::finish(response).await
    }

    /// GET a JSON payload.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: RequestScope,
    ) -> Result<T, FetchError> {
        let response = self.call(Method::GET, path, scope, None).await?;

        response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }

    /// Send one logical request, retrying only network-level failures.
    async fn send_with_retry(
        &self,
        method: &Method,
        path: &str,
        team_id: Option<TeamId>,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Response, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 1..=self.config.network_attempts {
            let mut request = self.client.request(method.clone(), &url).bearer_auth(token);

            if let Some(team_id) = team_id {
                request = request.query(&[("team_id", team_id.to_string())]);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.config.network_attempts => {
                    let delay = backoff::network_retry_delay(attempt, self.config.network_retry_step);
                    warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Network failure; retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(FetchError::Transient(e.to_string())),
            }
        }

        Err(FetchError::Transient("Network retries exhausted".to_string()))
    }

    /// Map a non-401 response: pass through success, classify the rest.
    async fn finish(response: Response) -> Result<Response, FetchError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.is_server_error() {
            return Err(FetchError::Transient(format!(
                "Server error: {}",
                status
            )));
        }

        let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
        Err(FetchError::Denied {
            status: status.as_u16(),
            code: envelope.code,
            message: envelope.error,
        })
    }
}

/// The server's error envelope, as much of it as the client needs
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    error: String,
    code: String,
}

impl Default for ErrorEnvelope {
    fn default() -> Self {
        Self {
            error: "Request failed".to_string(),
            code: "UNKNOWN".to_string(),
        }
    }
}

/// [`TeamDirectory`] backed by the server's `/v1/teams` endpoint
pub struct HttpTeamDirectory {
    fetch: Arc<AuthenticatedFetch>,
}

impl HttpTeamDirectory {
    pub fn new(fetch: Arc<AuthenticatedFetch>) -> Self {
        Self { fetch }
    }
}

#[derive(Debug, Deserialize)]
struct ListTeamsPayload {
    teams: Vec<TeamSummary>,
}

#[async_trait]
impl TeamDirectory for HttpTeamDirectory {
    async fn fetch_teams(&self) -> Result<Vec<TeamSummary>, FetchError> {
        let payload: ListTeamsPayload = self
            .fetch
            .get_json("/v1/teams", RequestScope::Global)
            .await?;

        Ok(payload.teams)
    }
}
