//! Membership domain - grants team access

mod entity;
mod repository;

pub use entity::{Membership, MembershipKey, TeamRole};
pub use repository::MembershipRepository;
