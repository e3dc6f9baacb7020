//! Credential verification infrastructure

mod verifier;

pub use verifier::{JwtConfig, JwtVerifier, TokenClaims, TokenIssuer, TokenVerifier};
