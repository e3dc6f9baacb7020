//! Membership service - access validation and membership mutations

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::membership::{Membership, MembershipRepository, TeamRole};
use crate::domain::principal::UserId;
use crate::domain::team::TeamId;
use crate::domain::{AuthenticatedUser, DomainError};

/// Membership service wrapping the (user, team) -> role relation
#[derive(Debug)]
pub struct MembershipService<M: MembershipRepository> {
    memberships: Arc<M>,
}

impl<M: MembershipRepository> MembershipService<M> {
    pub fn new(memberships: Arc<M>) -> Self {
        Self { memberships }
    }

    /// Validate that the principal holds a membership for the team.
    ///
    /// A missing row and a lookup failure both collapse into `AccessDenied`,
    /// so a non-member cannot learn whether the team exists.
    pub async fn validate(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError> {
        match self.memberships.get(&user.id, team_id).await {
            Ok(Some(membership)) => Ok(membership),
            Ok(None) => {
                debug!(user_id = %user.id, team_id = %team_id, "No membership for team");
                Err(DomainError::access_denied("Team membership required"))
            }
            Err(e) => {
                warn!(user_id = %user.id, team_id = %team_id, error = %e, "Membership lookup failed");
                Err(DomainError::access_denied("Team membership required"))
            }
        }
    }

    /// Validate membership and additionally require the admin role
    pub async fn validate_admin(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError> {
        let membership = self.validate(user, team_id).await?;

        if !membership.role().is_admin() {
            debug!(user_id = %user.id, team_id = %team_id, "Member lacks admin role");
            return Err(DomainError::admin_required("Team admin role required"));
        }

        Ok(membership)
    }

    /// Add a user to a team, or update their role if already a member
    pub async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, DomainError> {
        info!(user_id = %user_id, team_id = %team_id, role = %role, "Adding team member");
        self.memberships
            .upsert(Membership::new(user_id, team_id, role))
            .await
    }

    /// Remove a user from a team
    pub async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        info!(user_id = %user_id, team_id = %team_id, "Removing team member");

        if !self.memberships.remove(user_id, team_id).await? {
            return Err(DomainError::not_found(format!(
                "User '{}' is not a member of team '{}'",
                user_id, team_id
            )));
        }

        Ok(())
    }

    /// List a team's memberships
    pub async fn list_members(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        self.memberships.list_for_team(team_id).await
    }

    /// List a user's memberships
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError> {
        self.memberships.list_for_user(user_id).await
    }
}
