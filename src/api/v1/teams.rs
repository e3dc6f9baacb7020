//! Team endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::team::{CreateTeamRequest, TeamWithRole};

/// Request to create a new team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A team with the caller's role in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<&TeamWithRole> for TeamResponse {
    fn from(entry: &TeamWithRole) -> Self {
        Self {
            id: entry.team.id().to_string(),
            name: entry.team.name().to_string(),
            description: entry.team.description().map(String::from),
            role: entry.role.to_string(),
            created_at: entry.team.created_at().to_rfc3339(),
        }
    }
}

/// List teams response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTeamsResponse {
    pub teams: Vec<TeamResponse>,
    pub total: usize,
}

/// GET /v1/teams
///
/// The caller's teams, derived from their membership rows.
pub async fn list_teams(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    debug!(user_id = %user.id, "Listing caller's teams");

    let teams = state.team_service.list_for_user(&user.id).await?;

    let responses: Vec<TeamResponse> = teams.iter().map(TeamResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListTeamsResponse {
        teams: responses,
        total,
    }))
}

/// POST /v1/teams
///
/// Any authenticated principal may create a team; the creator becomes its
/// first admin member.
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(user_id = %user.id, name = %request.name, "Creating team");

    let team = state
        .team_service
        .create(
            CreateTeamRequest {
                name: request.name,
                description: request.description,
            },
            user.id,
        )
        .await?;

    Ok(Json(TeamResponse {
        id: team.id().to_string(),
        name: team.name().to_string(),
        description: team.description().map(String::from),
        role: crate::domain::TeamRole::Admin.to_string(),
        created_at: team.created_at().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_request_deserialization() {
        let json = r#"{"name": "Design"}"#;

        let request: CreateTeamApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Design");
        assert!(request.description.is_none());
    }

    #[test]
    fn test_create_team_request_with_description() {
        let json = r#"{"name": "Design", "description": "UI reviews"}"#;

        let request: CreateTeamApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.description, Some("UI reviews".to_string()));
    }

    #[test]
    fn test_list_teams_response_serialization() {
        let response = ListTeamsResponse {
            teams: vec![],
            total: 0,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"teams\":[]"));
        assert!(json.contains("\"total\":0"));
    }
}
