//! Authentication API endpoints
//!
//! Token issuance for development and test environments, plus an
//! introspection endpoint for the verified principal.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{AuthenticatedUser, RoleHint, UserId};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(issue_token))
        .route("/me", get(get_current_user))
}

/// Token issuance request
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    /// Fixed user id to mint the token for. Generated when absent.
    pub user_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role_hint: RoleHint,
}

/// Token issuance response
#[derive(Debug, Serialize)]
pub struct IssueTokenResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Issue a signed bearer token for the given identity
///
/// POST /auth/token
///
/// There is no credential check here; the endpoint exists so local
/// clients can mint tokens without a separate identity provider.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<Json<IssueTokenResponse>, ApiError> {
    if request.email.trim().is_empty() {
        return Err(ApiError::validation("Email must not be empty"));
    }

    let user_id = match request.user_id.as_deref() {
        Some(raw) => UserId::parse(raw)?,
        None => UserId::new(Uuid::new_v4()),
    };

    let user = AuthenticatedUser::new(user_id, request.email, request.role_hint);
    let token = state.issuer.issue(&user)?;

    tracing::info!(user_id = %user.id, "Issued development token");

    Ok(Json(IssueTokenResponse { token, user }))
}

/// Return the principal behind the presented token
///
/// GET /auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<AuthenticatedUser>, ApiError> {
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_token_request_defaults_role_hint() {
        let request: IssueTokenRequest =
            serde_json::from_value(serde_json::json!({ "email": "dev@example.com" })).unwrap();

        assert!(request.user_id.is_none());
        assert_eq!(request.role_hint, RoleHint::Employee);
    }

    #[test]
    fn test_issue_token_request_parses_owner_hint() {
        let request: IssueTokenRequest = serde_json::from_value(serde_json::json!({
            "email": "founder@example.com",
            "role_hint": "owner"
        }))
        .unwrap();

        assert_eq!(request.role_hint, RoleHint::Owner);
    }
}
