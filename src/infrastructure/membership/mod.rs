//! Membership infrastructure

mod repository;
mod service;

pub use repository::InMemoryMembershipRepository;
pub use service::MembershipService;
