//! Review entity - a business team-scoped resource
//!
//! Any member may create reviews and edit their content fields; the title is
//! a structural field and follows the structural mutation policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::UserId;
use super::storage::{StorageEntity, StorageKey};
use super::team::TeamId;
use super::DomainError;

/// Review identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid review id", value)))
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ReviewId {
    fn encode(&self) -> String {
        self.0.to_string()
    }
}

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

fn validate_rating(rating: i32) -> Result<(), DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

/// Review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    team_id: TeamId,
    author_id: UserId,
    title: String,
    body: String,
    rating: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        team_id: TeamId,
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        rating: i32,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("Review title must not be empty"));
        }
        validate_rating(rating)?;

        let now = Utc::now();
        Ok(Self {
            id: ReviewId::generate(),
            team_id,
            author_id,
            title,
            body: body.into(),
            rating,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> ReviewId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Structural field
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("Review title must not be empty"));
        }
        self.title = title;
        self.touch();
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.touch();
    }

    pub fn set_rating(&mut self, rating: i32) -> Result<(), DomainError> {
        validate_rating(rating)?;
        self.rating = rating;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Review {
    type Key = ReviewId;

    fn key(&self) -> ReviewId {
        self.id
    }
}
