//! Infrastructure layer - services, storage backends and credential plumbing

pub mod auth;
pub mod logging;
pub mod membership;
pub mod review;
pub mod storage;
pub mod team;
pub mod widget;
