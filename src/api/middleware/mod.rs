//! API middleware components

pub mod auth;
pub mod envelope;
pub mod gate;
pub mod team_access;

pub use auth::RequireUser;
pub use envelope::error_envelope;
pub use gate::{authorize, OperationClass};
pub use team_access::{
    validate_admin, validate_membership, RequireTeamAdmin, RequireTeamMember, TeamScope,
};
