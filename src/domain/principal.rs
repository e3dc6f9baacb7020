//! Authenticated principal types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

/// User identifier - a UUID issued by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a UUID-shaped string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user id", value)))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse account type carried in verified claims.
///
/// Advisory only: it never grants team access by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleHint {
    #[default]
    Employee,
    Owner,
}

impl std::fmt::Display for RoleHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee => write!(f, "employee"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

/// The verified principal behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role_hint: RoleHint,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, role_hint: RoleHint) -> Self {
        Self {
            id,
            email: email.into(),
            role_hint,
        }
    }
}
