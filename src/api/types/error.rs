//! Wire error envelope
//!
//! Every error response shares the shape
//! `{error, code, details?, timestamp, path}`. The request path is filled in
//! by the envelope middleware; handlers never know it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthRequired,
    AuthInvalid,
    TeamMembershipRequired,
    TeamAdminRequired,
    PermissionDenied,
    ValidationError,
    ResourceNotFound,
    DatabaseError,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthInvalid => "AUTH_INVALID",
            Self::TeamMembershipRequired => "TEAM_MEMBERSHIP_REQUIRED",
            Self::TeamAdminRequired => "TEAM_ADMIN_REQUIRED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Serialized error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                code,
                details: None,
                timestamp: Utc::now(),
                path: String::new(),
            },
        }
    }

    /// Attach field-level detail
    pub fn with_details(mut self, details: Value) -> Self {
        self.body.details = Some(details);
        self
    }

    /// Missing credential
    pub fn auth_required() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthRequired,
            "Authentication required. Provide a credential via 'Authorization: Bearer <token>'",
        )
    }

    /// Malformed, expired or otherwise unverifiable credential
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::AuthInvalid, message)
    }

    /// Caller holds no membership for the team
    pub fn membership_required(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            ErrorCode::TeamMembershipRequired,
            message,
        )
    }

    /// Caller is a member but the operation is admin-gated
    pub fn admin_required(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorCode::TeamAdminRequired, message)
    }

    /// Caller is a member but lacks a capability
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorCode::PermissionDenied, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError,
            message,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::ResourceNotFound,
            message,
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(&self.body)).into_response();
        // Stashed for the envelope middleware, which fills in the path.
        response.extensions_mut().insert(self.body);
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::validation(message),
            DomainError::InvalidId { message } => Self::validation(message),
            DomainError::Conflict { message } => Self::validation(message),
            DomainError::Credential { message } => Self::auth_invalid(message),
            DomainError::AccessDenied { message } => Self::membership_required(message),
            DomainError::AdminRequired { message } => Self::admin_required(message),
            DomainError::PermissionDenied { capability } => Self::permission_denied(format!(
                "Permission denied: missing capability '{}'",
                capability
            ))
            .with_details(serde_json::json!({ "capability": capability })),
            DomainError::Storage { message } => Self::database(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.body.code, self.body.error)
    }
}

impl std::error::Error for ApiError {}
