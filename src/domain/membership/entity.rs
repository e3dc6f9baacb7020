//! Membership entity - the (user, team) -> role relation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::principal::UserId;
use crate::domain::storage::StorageKey;
use crate::domain::team::TeamId;

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Can manage members and perform structural mutations
    Admin,
    /// Regular team member
    #[default]
    Member,
}

impl TeamRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(format!("unknown team role '{}'", other)),
        }
    }
}

/// Composite key of a membership row, unique per (user, team)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MembershipKey {
    pub user_id: UserId,
    pub team_id: TeamId,
}

impl StorageKey for MembershipKey {
    fn encode(&self) -> String {
        format!("{}/{}", self.user_id, self.team_id)
    }
}

/// Membership entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    user_id: UserId,
    team_id: TeamId,
    role: TeamRole,
    joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: UserId, team_id: TeamId, role: TeamRole) -> Self {
        Self {
            user_id,
            team_id,
            role,
            joined_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn key(&self) -> MembershipKey {
        MembershipKey {
            user_id: self.user_id,
            team_id: self.team_id,
        }
    }

    /// Change the role, keeping the original join timestamp
    pub fn with_role(mut self, role: TeamRole) -> Self {
        self.role = role;
        self
    }
}
