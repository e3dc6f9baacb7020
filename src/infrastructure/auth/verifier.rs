//! Bearer credential verification
//!
//! The identity provider owns credential issuance; this module only validates
//! the opaque bearer token it hands out and derives the verified principal.
//! `JwtVerifier` is the HS256 implementation used in development and tests,
//! where it also stands in for the provider's issuance side.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedUser, DomainError, RoleHint, UserId};

/// Verified claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Verified email address
    pub email: String,
    /// Coarse account type from profile metadata; advisory only
    #[serde(default)]
    pub role_hint: RoleHint,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user: &AuthenticatedUser, ttl_hours: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role_hint: user.role_hint,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    /// Build the principal from verified claims
    pub fn principal(&self) -> Result<AuthenticatedUser, DomainError> {
        let id = UserId::parse(&self.sub)
            .map_err(|_| DomainError::credential("Token subject is not a valid user id"))?;
        Ok(AuthenticatedUser::new(id, &self.email, self.role_hint))
    }
}

/// Validates an opaque bearer credential and yields the verified principal
#[async_trait]
pub trait TokenVerifier: Send + Sync + Debug {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, DomainError>;
}

/// Issues bearer credentials; used by the development token endpoint
pub trait TokenIssuer: Send + Sync + Debug {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, DomainError>;
}

/// Configuration for the JWT verifier
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for HS256
    pub secret: String,
    /// Issued-token lifetime in hours
    pub ttl_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            ttl_hours: 24,
        }
    }
}

/// HS256 JWT verifier
#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("ttl_hours", &self.config.ttl_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let validation = Validation::default();

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::credential(format!("Token validation failed: {}", e)))
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        self.decode_claims(token)?.principal()
    }
}

impl TokenIssuer for JwtVerifier {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, DomainError> {
        let claims = TokenClaims::new(user, self.config.ttl_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(JwtConfig {
            secret: "test-secret".to_string(),
            ttl_hours: 1,
        })
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(Uuid::new_v4()),
            "dev@example.com",
            RoleHint::Employee,
        )
    }

    #[tokio::test]
    async fn test_issue_and_verify_round_trip() {
        let verifier = verifier();
        let user = user();

        let token = verifier.issue(&user).unwrap();
        let principal = verifier.verify(&token).await.unwrap();

        assert_eq!(principal, user);
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let verifier = verifier();
        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_secret() {
        let user = user();
        let token = verifier().issue(&user).unwrap();

        let other = JwtVerifier::new(JwtConfig {
            secret: "different-secret".to_string(),
            ttl_hours: 1,
        });
        assert!(other.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_rejects_expired() {
        let verifier = verifier();
        let user = user();

        let mut claims = TokenClaims::new(&user, 1);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        claims.iat = claims.exp - 60;

        let token = encode(&Header::default(), &claims, &verifier.encoding_key).unwrap();
        assert!(verifier.verify(&token).await.is_err());
    }

    #[test]
    fn test_claims_default_role_hint() {
        let json = r#"{"sub":"2f0b9a44-9c1d-4f7e-8b3a-0d6f1c2e5a71","email":"a@b.c","iat":0,"exp":0}"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role_hint, RoleHint::Employee);
    }
}
