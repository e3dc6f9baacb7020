//! Storage-backed team repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::storage::Storage;
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::DomainError;

/// Team repository over the generic storage layer
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TeamRepository for StorageTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_many(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        let mut teams = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(team) = self.storage.get(id).await? {
                teams.push(team);
            }
        }
        Ok(teams)
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        self.storage.create(team).await
    }

    async fn update(&self, team: Team) -> Result<Team, DomainError> {
        self.storage.update(team).await
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError> {
        self.storage.exists(id).await
    }
}
