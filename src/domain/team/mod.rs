//! Team domain - the tenant boundary

mod entity;
mod repository;

pub use entity::{validate_team_name, Team, TeamId};
pub use repository::TeamRepository;

#[cfg(test)]
pub use repository::mock;
