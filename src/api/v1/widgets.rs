//! Widget endpoints - structural team-scoped resource

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::middleware::{authorize, OperationClass, RequireTeamMember};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::widget::{Widget, WidgetId, WidgetKind};
use crate::infrastructure::widget::{CreateWidgetRequest, UpdateWidgetRequest};

/// Request to create a widget
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWidgetApiRequest {
    pub title: String,
    pub kind: WidgetKind,
    #[serde(default)]
    pub position: i32,
}

/// Partial widget update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWidgetApiRequest {
    pub title: Option<String>,
    pub kind: Option<WidgetKind>,
    pub position: Option<i32>,
    pub active: Option<bool>,
    pub config: Option<Value>,
}

/// Widget response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetResponse {
    pub id: String,
    pub team_id: String,
    pub title: String,
    pub kind: WidgetKind,
    pub position: i32,
    pub active: bool,
    pub config: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Widget> for WidgetResponse {
    fn from(widget: &Widget) -> Self {
        Self {
            id: widget.id().to_string(),
            team_id: widget.team_id().to_string(),
            title: widget.title().to_string(),
            kind: widget.kind(),
            position: widget.position(),
            active: widget.active(),
            config: widget.config().clone(),
            created_at: widget.created_at().to_rfc3339(),
            updated_at: widget.updated_at().to_rfc3339(),
        }
    }
}

/// List widgets response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWidgetsResponse {
    pub widgets: Vec<WidgetResponse>,
    pub total: usize,
}

/// GET /v1/widgets?team_id=...
pub async fn list_widgets(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
) -> Result<Json<ListWidgetsResponse>, ApiError> {
    authorize(OperationClass::Read, scope.membership.role())?;

    debug!(team_id = %scope.team_id, "Listing widgets");

    let widgets = state.widget_service.list(&scope.team_id).await?;

    let responses: Vec<WidgetResponse> = widgets.iter().map(WidgetResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListWidgetsResponse {
        widgets: responses,
        total,
    }))
}

/// POST /v1/widgets?team_id=...
///
/// Structural resource: creation is admin-gated.
pub async fn create_widget(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Json(request): Json<CreateWidgetApiRequest>,
) -> Result<Json<WidgetResponse>, ApiError> {
    authorize(OperationClass::CreateStructural, scope.membership.role())?;

    let widget = state
        .widget_service
        .create(
            scope.team_id,
            CreateWidgetRequest {
                title: request.title,
                kind: request.kind,
                position: request.position,
            },
        )
        .await?;

    Ok(Json(WidgetResponse::from(&widget)))
}

/// GET /v1/widgets/{id}?team_id=...
pub async fn get_widget(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
) -> Result<Json<WidgetResponse>, ApiError> {
    authorize(OperationClass::Read, scope.membership.role())?;

    let id = WidgetId::parse(&id)?;
    let widget = state.widget_service.get(&scope.team_id, &id).await?;

    Ok(Json(WidgetResponse::from(&widget)))
}

/// PUT /v1/widgets/{id}?team_id=...
///
/// Kind, position, activation and title are structural fields; only the
/// config payload is content.
pub async fn update_widget(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
    Json(request): Json<UpdateWidgetApiRequest>,
) -> Result<Json<WidgetResponse>, ApiError> {
    let id = WidgetId::parse(&id)?;

    let update = UpdateWidgetRequest {
        title: request.title,
        kind: request.kind,
        position: request.position,
        active: request.active,
        config: request.config,
    };

    let op = if update.is_structural() {
        OperationClass::UpdateStructural
    } else {
        OperationClass::UpdateContent
    };
    authorize(op, scope.membership.role())?;

    let widget = state
        .widget_service
        .update(&scope.team_id, &id, update)
        .await?;

    Ok(Json(WidgetResponse::from(&widget)))
}

/// DELETE /v1/widgets/{id}?team_id=...
pub async fn delete_widget(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(OperationClass::Delete, scope.membership.role())?;

    let id = WidgetId::parse(&id)?;
    state.widget_service.delete(&scope.team_id, &id).await?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": id.to_string(),
    })))
}
