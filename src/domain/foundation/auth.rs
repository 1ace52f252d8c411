//! Caller identity as seen by the onboarding workflow.
//!
//! Populated by a `SessionValidator` from a verified bearer token; nothing
//! here depends on a particular identity provider.

use super::ExternalIdentityId;
use thiserror::Error;

/// Authenticated caller extracted from a validated JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Opaque identity key from the auth provider.
    pub identity: ExternalIdentityId,

    /// Email claim, when the provider includes one.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(identity: ExternalIdentityId, email: Option<String>) -> Self {
        Self { identity, email }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// JWKS fetch or provider discovery failed
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
