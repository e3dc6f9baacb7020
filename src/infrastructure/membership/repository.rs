//! In-memory membership repository
//!
//! Memberships need invariants the generic storage layer cannot express: the
//! last-admin guard must run under the same lock as the delete, and upsert
//! must preserve the original join timestamp. Both mutations take the write
//! lock exactly once.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::membership::{Membership, MembershipKey, MembershipRepository};
use crate::domain::principal::UserId;
use crate::domain::team::TeamId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryMembershipRepository {
    rows: RwLock<HashMap<MembershipKey, Membership>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned<T>(e: T) -> DomainError
where
    T: std::fmt::Display,
{
    DomainError::storage(format!("Failed to acquire membership lock: {}", e))
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn get(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
    ) -> Result<Option<Membership>, DomainError> {
        let rows = self.rows.read().map_err(lock_poisoned)?;
        let key = MembershipKey {
            user_id: *user_id,
            team_id: *team_id,
        };
        Ok(rows.get(&key).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError> {
        let rows = self.rows.read().map_err(lock_poisoned)?;
        let mut result: Vec<Membership> = rows
            .values()
            .filter(|m| m.user_id() == *user_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.joined_at());
        Ok(result)
    }

    async fn list_for_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let rows = self.rows.read().map_err(lock_poisoned)?;
        let mut result: Vec<Membership> = rows
            .values()
            .filter(|m| m.team_id() == *team_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.joined_at());
        Ok(result)
    }

    async fn upsert(&self, membership: Membership) -> Result<Membership, DomainError> {
        let mut rows = self.rows.write().map_err(lock_poisoned)?;
        let key = membership.key();

        let stored = match rows.get(&key) {
            // Existing pair: update the role, keep the join timestamp.
            Some(existing) => existing.clone().with_role(membership.role()),
            None => membership,
        };

        rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn remove(&self, user_id: &UserId, team_id: &TeamId) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().map_err(lock_poisoned)?;
        let key = MembershipKey {
            user_id: *user_id,
            team_id: *team_id,
        };

        let Some(target) = rows.get(&key) else {
            return Ok(false);
        };

        if target.role().is_admin() {
            let admin_count = rows
                .values()
                .filter(|m| m.team_id() == *team_id && m.role().is_admin())
                .count();

            if admin_count <= 1 {
                return Err(DomainError::validation(
                    "Cannot remove the last admin of a team",
                ));
            }
        }

        Ok(rows.remove(&key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::TeamRole;
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = InMemoryMembershipRepository::new();
        let (user_id, team_id) = (user(), TeamId::generate());

        repo.upsert(Membership::new(user_id, team_id, TeamRole::Member))
            .await
            .unwrap();
        repo.upsert(Membership::new(user_id, team_id, TeamRole::Member))
            .await
            .unwrap();

        let rows = repo.list_for_team(&team_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role(), TeamRole::Member);
    }

    #[tokio::test]
    async fn test_upsert_updates_role_keeps_joined_at() {
        let repo = InMemoryMembershipRepository::new();
        let (user_id, team_id) = (user(), TeamId::generate());

        let first = repo
            .upsert(Membership::new(user_id, team_id, TeamRole::Member))
            .await
            .unwrap();

        let promoted = repo
            .upsert(Membership::new(user_id, team_id, TeamRole::Admin))
            .await
            .unwrap();

        assert_eq!(promoted.role(), TeamRole::Admin);
        assert_eq!(promoted.joined_at(), first.joined_at());
    }

    #[tokio::test]
    async fn test_remove_missing_is_false() {
        let repo = InMemoryMembershipRepository::new();
        assert!(!repo.remove(&user(), &TeamId::generate()).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_last_admin_rejected() {
        let repo = InMemoryMembershipRepository::new();
        let (admin, team_id) = (user(), TeamId::generate());

        repo.upsert(Membership::new(admin, team_id, TeamRole::Admin))
            .await
            .unwrap();
        repo.upsert(Membership::new(user(), team_id, TeamRole::Member))
            .await
            .unwrap();

        let result = repo.remove(&admin, &team_id).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_remove_admin_with_another_admin_present() {
        let repo = InMemoryMembershipRepository::new();
        let (first, second, team_id) = (user(), user(), TeamId::generate());

        repo.upsert(Membership::new(first, team_id, TeamRole::Admin))
            .await
            .unwrap();
        repo.upsert(Membership::new(second, team_id, TeamRole::Admin))
            .await
            .unwrap();

        assert!(repo.remove(&first, &team_id).await.unwrap());
        assert_eq!(repo.list_for_team(&team_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_user_spans_teams() {
        let repo = InMemoryMembershipRepository::new();
        let user_id = user();

        repo.upsert(Membership::new(user_id, TeamId::generate(), TeamRole::Admin))
            .await
            .unwrap();
        repo.upsert(Membership::new(user_id, TeamId::generate(), TeamRole::Member))
            .await
            .unwrap();
        repo.upsert(Membership::new(user(), TeamId::generate(), TeamRole::Member))
            .await
            .unwrap();

        assert_eq!(repo.list_for_user(&user_id).await.unwrap().len(), 2);
    }
}
