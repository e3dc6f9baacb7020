//! Domain layer - entities, repository traits and core errors

pub mod error;
pub mod membership;
pub mod principal;
pub mod review;
pub mod storage;
pub mod team;
pub mod widget;

pub use error::DomainError;
pub use membership::{Membership, MembershipRepository, TeamRole};
pub use principal::{AuthenticatedUser, RoleHint, UserId};
pub use review::{Review, ReviewId};
pub use team::{Team, TeamId, TeamRepository};
pub use widget::{Widget, WidgetId, WidgetKind};
