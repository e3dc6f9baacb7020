//! Team service - team creation and membership-scoped listing

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::membership::{Membership, MembershipRepository, TeamRole};
use crate::domain::principal::UserId;
use crate::domain::team::{validate_team_name, Team, TeamId, TeamRepository};
use crate::domain::DomainError;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

/// A team together with the caller's role in it
#[derive(Debug, Clone)]
pub struct TeamWithRole {
    pub team: Team,
    pub role: TeamRole,
}

/// Team service
#[derive(Debug)]
pub struct TeamService<T: TeamRepository, M: MembershipRepository> {
    teams: Arc<T>,
    memberships: Arc<M>,
}

impl<T: TeamRepository, M: MembershipRepository> TeamService<T, M> {
    pub fn new(teams: Arc<T>, memberships: Arc<M>) -> Self {
        Self { teams, memberships }
    }

    /// Create a team; the creator becomes its first admin member.
    ///
    /// The creator's admin membership is installed with the creation. If the
    /// membership write fails the team row is rolled back so no team exists
    /// without an admin.
    pub async fn create(
        &self,
        request: CreateTeamRequest,
        creator: UserId,
    ) -> Result<Team, DomainError> {
        info!(name = %request.name, creator = %creator, "Creating team");

        validate_team_name(&request.name)?;

        let mut team = Team::new(&request.name)?;
        if let Some(desc) = request.description {
            team.set_description(Some(desc));
        }

        let team = self.teams.create(team).await?;

        let membership = Membership::new(creator, team.id(), TeamRole::Admin);
        if let Err(e) = self.memberships.upsert(membership).await {
            warn!(team_id = %team.id(), error = %e, "Rolling back team creation");
            self.teams.delete(&team.id()).await.ok();
            return Err(e);
        }

        Ok(team)
    }

    /// Get a team by ID
    pub async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.teams.get(id).await
    }

    /// Teams the user belongs to, with their role in each
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TeamWithRole>, DomainError> {
        let memberships = self.memberships.list_for_user(user_id).await?;
        let team_ids: Vec<TeamId> = memberships.iter().map(|m| m.team_id()).collect();
        let teams = self.teams.get_many(&team_ids).await?;

        Ok(teams
            .into_iter()
            .filter_map(|team| {
                memberships
                    .iter()
                    .find(|m| m.team_id() == team.id())
                    .map(|m| TeamWithRole {
                        role: m.role(),
                        team,
                    })
            })
            .collect())
    }
}
