//! Review service - team-scoped business resource
//!
//! Every lookup is constrained by the validated team id; a review belonging
//! to another team is indistinguishable from a missing one.

use std::sync::Arc;

use tracing::info;

use crate::domain::principal::UserId;
use crate::domain::review::{Review, ReviewId};
use crate::domain::storage::Storage;
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Request for creating a review
#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    pub title: String,
    pub body: String,
    pub rating: i32,
}

/// Partial update of a review
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i32>,
}

impl UpdateReviewRequest {
    /// True if the update touches a structural field
    pub fn is_structural(&self) -> bool {
        self.title.is_some()
    }
}

/// Review service
#[derive(Debug)]
pub struct ReviewService {
    storage: Arc<dyn Storage<Review>>,
}

impl ReviewService {
    pub fn new(storage: Arc<dyn Storage<Review>>) -> Self {
        Self { storage }
    }

    /// List the team's reviews
    pub async fn list(&self, team_id: &TeamId) -> Result<Vec<Review>, DomainError> {
        let mut reviews: Vec<Review> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|r| r.team_id() == *team_id)
            .collect();
        reviews.sort_by_key(|r| r.created_at());
        Ok(reviews)
    }

    /// Create a review in the team
    pub async fn create(
        &self,
        team_id: TeamId,
        author_id: UserId,
        request: CreateReviewRequest,
    ) -> Result<Review, DomainError> {
        info!(team_id = %team_id, author = %author_id, "Creating review");

        let review = Review::new(team_id, author_id, request.title, request.body, request.rating)?;
        self.storage.create(review).await
    }

    /// Get a review within the team
    pub async fn get(&self, team_id: &TeamId, id: &ReviewId) -> Result<Review, DomainError> {
        self.storage
            .get(id)
            .await?
            .filter(|r| r.team_id() == *team_id)
            .ok_or_else(|| DomainError::not_found(format!("Review '{}' not found", id)))
    }

    /// Apply a partial update within the team
    pub async fn update(
        &self,
        team_id: &TeamId,
        id: &ReviewId,
        request: UpdateReviewRequest,
    ) -> Result<Review, DomainError> {
        info!(team_id = %team_id, review_id = %id, "Updating review");

        let mut review = self.get(team_id, id).await?;

        if let Some(title) = request.title {
            review.set_title(title)?;
        }
        if let Some(body) = request.body {
            review.set_body(body);
        }
        if let Some(rating) = request.rating {
            review.set_rating(rating)?;
        }

        self.storage.update(review).await
    }

    /// Delete a review within the team
    pub async fn delete(&self, team_id: &TeamId, id: &ReviewId) -> Result<(), DomainError> {
        info!(team_id = %team_id, review_id = %id, "Deleting review");

        // Scoped lookup first so a foreign team's review reads as missing.
        self.get(team_id, id).await?;
        self.storage.delete(id).await?;
        Ok(())
    }
}
