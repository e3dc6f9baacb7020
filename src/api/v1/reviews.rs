//! Review endpoints - business team-scoped resource

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{authorize, OperationClass, RequireTeamMember};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::review::{Review, ReviewId};
use crate::infrastructure::review::{CreateReviewRequest, UpdateReviewRequest};

/// Request to create a review
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewApiRequest {
    pub title: String,
    pub body: String,
    pub rating: i32,
}

/// Partial review update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewApiRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i32>,
}

/// Review response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub team_id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub rating: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            team_id: review.team_id().to_string(),
            author_id: review.author_id().to_string(),
            title: review.title().to_string(),
            body: review.body().to_string(),
            rating: review.rating(),
            created_at: review.created_at().to_rfc3339(),
            updated_at: review.updated_at().to_rfc3339(),
        }
    }
}

/// List reviews response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub total: usize,
}

/// GET /v1/reviews?team_id=...
pub async fn list_reviews(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
) -> Result<Json<ListReviewsResponse>, ApiError> {
    authorize(OperationClass::Read, scope.membership.role())?;

    debug!(team_id = %scope.team_id, "Listing reviews");

    let reviews = state.review_service.list(&scope.team_id).await?;

    let responses: Vec<ReviewResponse> = reviews.iter().map(ReviewResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListReviewsResponse {
        reviews: responses,
        total,
    }))
}

/// POST /v1/reviews?team_id=...
///
/// Business resource: any member may create.
pub async fn create_review(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Json(request): Json<CreateReviewApiRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    authorize(OperationClass::CreateBusiness, scope.membership.role())?;

    let review = state
        .review_service
        .create(
            scope.team_id,
            scope.user.id,
            CreateReviewRequest {
                title: request.title,
                body: request.body,
                rating: request.rating,
            },
        )
        .await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// GET /v1/reviews/{id}?team_id=...
pub async fn get_review(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
) -> Result<Json<ReviewResponse>, ApiError> {
    authorize(OperationClass::Read, scope.membership.role())?;

    let id = ReviewId::parse(&id)?;
    let review = state.review_service.get(&scope.team_id, &id).await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// PUT /v1/reviews/{id}?team_id=...
///
/// Updating the title is a structural change and admin-gated; content fields
/// are open to any member.
pub async fn update_review(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
    Json(request): Json<UpdateReviewApiRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let id = ReviewId::parse(&id)?;

    let update = UpdateReviewRequest {
        title: request.title,
        body: request.body,
        rating: request.rating,
    };

    let op = if update.is_structural() {
        OperationClass::UpdateStructural
    } else {
        OperationClass::UpdateContent
    };
    authorize(op, scope.membership.role())?;

    let review = state
        .review_service
        .update(&scope.team_id, &id, update)
        .await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// DELETE /v1/reviews/{id}?team_id=...
pub async fn delete_review(
    State(state): State<AppState>,
    RequireTeamMember(scope): RequireTeamMember,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(OperationClass::Delete, scope.membership.role())?;

    let id = ReviewId::parse(&id)?;
    state.review_service.delete(&scope.team_id, &id).await?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": id.to_string(),
    })))
}
