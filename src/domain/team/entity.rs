//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Team identifier - a UUID, the tenant boundary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a UUID-shaped string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid team id", value)))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TeamId {
    fn encode(&self) -> String {
        self.0.to_string()
    }
}

const MAX_TEAM_NAME_LEN: usize = 100;

/// Validate a team display name
pub fn validate_team_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::validation("Team name must not be empty"));
    }

    if trimmed.len() > MAX_TEAM_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Team name must be at most {} characters",
            MAX_TEAM_NAME_LEN
        )));
    }

    Ok(())
}

/// Team entity - the tenant boundary every protected resource belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Display name
    name: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with a generated id
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_team_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id: TeamId::generate(),
            name,
            description: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // Getters

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Team {
    type Key = TeamId;

    fn key(&self) -> TeamId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_id_parse() {
        let raw = "8b7e9a10-6a2e-4b3c-9f1d-2c4e6a8b0d1f";
        let id = TeamId::parse(raw).unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_team_id_parse_invalid() {
        assert!(TeamId::parse("design-team").is_err());
        assert!(TeamId::parse("").is_err());
    }

    #[test]
    fn test_team_creation() {
        let team = Team::new("Design").unwrap();
        assert_eq!(team.name(), "Design");
        assert!(team.description().is_none());
    }

    #[test]
    fn test_team_with_description() {
        let team = Team::new("Design").unwrap().with_description("UI reviews");
        assert_eq!(team.description(), Some("UI reviews"));
    }

    #[test]
    fn test_team_invalid_name() {
        assert!(Team::new("").is_err());
        assert!(Team::new("   ").is_err());
        assert!(Team::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_team_update_name() {
        let mut team = Team::new("Design").unwrap();
        let original_updated = team.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        team.set_name("Design & Research").unwrap();
        assert_eq!(team.name(), "Design & Research");
        assert!(team.updated_at() > original_updated);
    }
}
