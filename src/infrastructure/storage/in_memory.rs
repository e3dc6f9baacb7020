//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory storage implementation
///
/// Backs the repository traits when no external store is wired in. Data is
/// lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self
            .entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entities.get(&key.encode()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self
            .entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entities.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().encode();
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().encode();
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    // Single lock acquisition; no exists-then-write gap.
    async fn save(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().encode();
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(entities.remove(&key.encode()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::Team;

    #[tokio::test]
    async fn test_create_and_get() {
        let storage = InMemoryStorage::<Team>::new();
        let team = Team::new("Design").unwrap();
        let id = team.id();

        storage.create(team).await.unwrap();

        let fetched = storage.get(&id).await.unwrap();
        assert_eq!(fetched.unwrap().name(), "Design");
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let storage = InMemoryStorage::<Team>::new();
        let team = Team::new("Design").unwrap();

        storage.create(team.clone()).await.unwrap();
        assert!(storage.create(team).await.is_err());
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let storage = InMemoryStorage::<Team>::new();
        let mut team = Team::new("Design").unwrap();
        let id = team.id();

        storage.save(team.clone()).await.unwrap();
        team.set_name("Research").unwrap();
        storage.save(team).await.unwrap();

        assert_eq!(storage.count().await.unwrap(), 1);
        assert_eq!(storage.get(&id).await.unwrap().unwrap().name(), "Research");
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let storage = InMemoryStorage::<Team>::new();
        let team = Team::new("Design").unwrap();

        assert!(storage.update(team).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = InMemoryStorage::<Team>::new();
        let team = Team::new("Design").unwrap();
        let id = team.id();

        storage.create(team).await.unwrap();
        assert!(storage.delete(&id).await.unwrap());
        assert!(!storage.delete(&id).await.unwrap());
    }
}
