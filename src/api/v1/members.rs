//! Membership endpoints

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{
    authorize, validate_membership, OperationClass, RequireTeamAdmin, RequireUser,
};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::membership::{Membership, TeamRole};
use crate::domain::{TeamId, UserId};

/// Request to add or re-role a member
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
    pub role: String,
}

/// Membership response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub user_id: String,
    pub team_id: String,
    pub role: String,
    pub joined_at: String,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            user_id: membership.user_id().to_string(),
            team_id: membership.team_id().to_string(),
            role: membership.role().to_string(),
            joined_at: membership.joined_at().to_rfc3339(),
        }
    }
}

/// List members response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMembersResponse {
    pub members: Vec<MembershipResponse>,
    pub total: usize,
}

fn parse_team_id(raw: &str) -> Result<TeamId, ApiError> {
    TeamId::parse(raw).map_err(ApiError::from)
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::parse(raw).map_err(ApiError::from)
}

/// GET /v1/teams/{team_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;

    let membership = validate_membership(&state, &user, &team_id).await?;
    authorize(OperationClass::Read, membership.role())?;

    let members = state.membership_service.list_members(&team_id).await?;

    let responses: Vec<MembershipResponse> =
        members.iter().map(MembershipResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListMembersResponse {
        members: responses,
        total,
    }))
}

/// POST /v1/teams/{team_id}/members
///
/// Admin-gated; upsert semantics, so re-adding an existing member updates the
/// role instead of erroring.
pub async fn add_member(
    State(state): State<AppState>,
    RequireTeamAdmin(scope): RequireTeamAdmin,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let target = parse_user_id(&request.user_id)?;
    let role: TeamRole = request
        .role
        .parse()
        .map_err(|e: String| ApiError::validation(e))?;

    debug!(actor = %scope.user.id, target = %target, team_id = %scope.team_id, "Adding member");

    let added = state
        .membership_service
        .add_member(scope.team_id, target, role)
        .await?;

    Ok(Json(MembershipResponse::from(&added)))
}

/// DELETE /v1/teams/{team_id}/members/{user_id}
///
/// Admin-gated for others; members may remove their own membership.
pub async fn remove_member(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((team_id, user_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let target = parse_user_id(&user_id)?;
    let self_target = target == user.id;

    let membership = validate_membership(&state, &user, &team_id).await?;
    authorize(
        OperationClass::RemoveMembership { self_target },
        membership.role(),
    )?;

    debug!(actor = %user.id, target = %target, team_id = %team_id, "Removing member");

    state
        .membership_service
        .remove_member(&team_id, &target)
        .await?;

    Ok(Json(serde_json::json!({
        "removed": true,
        "user_id": target.to_string(),
        "team_id": team_id.to_string(),
    })))
}
