//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::DomainError;

/// Repository for managing teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Get several teams by ID, skipping missing ones
    async fn get_many(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update an existing team
    async fn update(&self, team: Team) -> Result<Team, DomainError>;

    /// Delete a team by ID
    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// Check if a team exists
    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::mock::MockTeamRepository;
    use super::*;

    #[tokio::test]
    async fn test_mock_create_and_get() {
        let repo = MockTeamRepository::new();
        let team = Team::new("Design").unwrap();
        let id = team.id();

        repo.create(team).await.unwrap();

        let fetched = repo.get(&id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().name(), "Design");
    }

    #[tokio::test]
    async fn test_mock_get_many_skips_missing() {
        let repo = MockTeamRepository::new();
        let team = Team::new("Design").unwrap();
        let id = team.id();
        repo.create(team).await.unwrap();

        let fetched = repo.get_many(&[id, TeamId::generate()]).await.unwrap();
        assert_eq!(fetched.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_delete() {
        let repo = MockTeamRepository::new();
        let team = Team::new("Design").unwrap();
        let id = team.id();
        repo.create(team).await.unwrap();

        assert!(repo.exists(&id).await.unwrap());
        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.exists(&id).await.unwrap());
    }
}
