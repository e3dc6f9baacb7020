//! Membership repository trait
//!
//! Mutations are single atomic operations inside the store. Callers never
//! check-then-write: `upsert` and `remove` must hold their invariants under
//! concurrent admin-role changes.

use async_trait::async_trait;

use super::entity::Membership;
use crate::domain::principal::UserId;
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository for the (user, team) -> role relation
#[async_trait]
pub trait MembershipRepository: Send + Sync + std::fmt::Debug {
    /// Get the unique membership row for a (user, team) pair
    async fn get(&self, user_id: &UserId, team_id: &TeamId)
        -> Result<Option<Membership>, DomainError>;

    /// All memberships held by a user
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError>;

    /// All memberships of a team
    async fn list_for_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError>;

    /// Insert or update in one atomic step.
    ///
    /// If the (user, team) pair already exists the role is updated and the
    /// original join timestamp kept, so retries are idempotent.
    async fn upsert(&self, membership: Membership) -> Result<Membership, DomainError>;

    /// Delete the membership row, returns true if a row was removed.
    ///
    /// Fails with a validation error if the row is the team's last admin
    /// membership; the check runs inside the same atomic step as the delete.
    async fn remove(&self, user_id: &UserId, team_id: &TeamId) -> Result<bool, DomainError>;
}
