//! Team access validation
//!
//! The single authorization-critical check per request: given the verified
//! principal and a team id, look up the unique membership row. Handlers never
//! run unscoped queries and filter afterwards; every downstream data access is
//! constrained by the team id validated here.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::membership::Membership;
use crate::domain::{AuthenticatedUser, TeamId};

use super::auth::RequireUser;

/// The principal together with the team scope it was validated against
#[derive(Debug, Clone)]
pub struct TeamScope {
    pub user: AuthenticatedUser,
    pub team_id: TeamId,
    pub membership: Membership,
}

/// Validate that the principal is a member of the team.
///
/// A missing team and a missing membership are indistinguishable to the
/// caller.
pub async fn validate_membership(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: &TeamId,
) -> Result<Membership, ApiError> {
    state
        .membership_service
        .validate(user, team_id)
        .await
        .map_err(ApiError::from)
}

/// Validate membership and additionally require the admin role.
pub async fn validate_admin(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: &TeamId,
) -> Result<Membership, ApiError> {
    state
        .membership_service
        .validate_admin(user, team_id)
        .await
        .map_err(ApiError::from)
}

#[derive(Debug, Deserialize)]
struct TeamIdQuery {
    team_id: Option<String>,
}

/// Parse the mandatory `team_id` query parameter
fn team_id_from_query(parts: &Parts) -> Result<TeamId, ApiError> {
    let query: Query<TeamIdQuery> = Query::try_from_uri(&parts.uri)
        .map_err(|_| ApiError::validation("Invalid query string"))?;

    let raw = query
        .0
        .team_id
        .ok_or_else(|| {
            ApiError::validation("team_id query parameter is required")
                .with_details(serde_json::json!({"param": "team_id"}))
        })?;

    TeamId::parse(&raw).map_err(ApiError::from)
}

/// Extractor for team-scoped endpoints: authenticates, parses `?team_id` and
/// validates membership
#[derive(Debug, Clone)]
pub struct RequireTeamMember(pub TeamScope);

impl FromRequestParts<AppState> for RequireTeamMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        let team_id = team_id_from_query(parts)?;
        let membership = validate_membership(state, &user, &team_id).await?;

        Ok(RequireTeamMember(TeamScope {
            user,
            team_id,
            membership,
        }))
    }
}

/// Parse the `team_id` path segment on membership routes
async fn team_id_from_path(parts: &mut Parts, state: &AppState) -> Result<TeamId, ApiError> {
    let Path(params): Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::validation("Invalid path parameters"))?;

    let raw = params.get("team_id").ok_or_else(|| {
        ApiError::validation("team_id path parameter is required")
            .with_details(serde_json::json!({"param": "team_id"}))
    })?;

    TeamId::parse(raw).map_err(ApiError::from)
}

/// Extractor for admin-gated membership endpoints: authenticates, reads the
/// `team_id` path segment and requires an admin membership
#[derive(Debug, Clone)]
pub struct RequireTeamAdmin(pub TeamScope);

impl FromRequestParts<AppState> for RequireTeamAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        let team_id = team_id_from_path(parts, state).await?;
        let membership = validate_admin(state, &user, &team_id).await?;

        Ok(RequireTeamAdmin(TeamScope {
            user,
            team_id,
            membership,
        }))
    }
}
