//! Request authentication
//!
//! Two paths yield the same principal: a gateway layer may have pre-populated
//! the request extensions, otherwise the bearer credential is verified here.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::AuthenticatedUser;

/// Extractor that requires a verified principal
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Pre-populated by an upstream gateway; the fallback below must agree
        // on output shape.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            debug!(user_id = %user.id, "Principal from forwarded request metadata");
            return Ok(RequireUser(user.clone()));
        }

        let token = extract_bearer_token(&parts.headers)?;

        let user = state
            .verifier
            .verify(&token)
            .await
            .map_err(|e| ApiError::auth_invalid(e.to_string()))?;

        debug!(user_id = %user.id, "Principal from bearer credential");
        Ok(RequireUser(user))
    }
}

/// Extract the bearer credential from the Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::validation("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::auth_required())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ErrorCode;
    use axum::http::HeaderMap;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiJ9.test".parse().unwrap(),
        );

        let result = extract_bearer_token(&headers);
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token_is_auth_required() {
        let headers = HeaderMap::new();

        let err = extract_bearer_token(&headers).unwrap_err();
        assert_eq!(err.body.code, ErrorCode::AuthRequired);
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_auth_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_trimmed_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer   token-with-spaces   ".parse().unwrap(),
        );

        assert_eq!(extract_bearer_token(&headers).unwrap(), "token-with-spaces");
    }
}
