//! Session validation port for bearer token validation.
//!
//! Provider-agnostic: the OIDC adapter validates JWTs against a JWKS endpoint,
//! and the mock adapter maps fixed tokens to identities for tests.
//!
//! All real implementations MUST validate issuer, audience and expiry.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts the caller's external identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient provider failures
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
