//! Shared API types

mod error;
mod json;

pub use error::{ApiError, ErrorBody, ErrorCode};
pub use json::Json;
