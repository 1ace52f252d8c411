//! OIDC adapter for bearer JWT validation.
//!
//! Works with any provider that publishes a JWKS document (Clerk, Auth0,
//! Zitadel, Keycloak). Validation steps:
//!
//! 1. Fetch and cache the provider's JWKS
//! 2. Verify the JWT signature with the key named by the `kid` header
//! 3. Validate issuer, audience (when configured) and expiry
//! 4. Map `sub` to an `ExternalIdentityId`
//!
//! # Example
//!
//! ```ignore
//! let config = OidcConfig::new("https://clerk.example.com")
//!     .with_audience("career-coach-api");
//! let validator = OidcSessionValidator::new(config)?;
//! let caller = validator.validate("eyJ...").await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::domain::foundation::{AuthError, AuthenticatedUser, ExternalIdentityId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(3600);

/// Configuration for the OIDC adapter.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Expected `iss` claim; also the base for JWKS discovery.
    pub issuer_url: String,
    /// Expected `aud` claim. Some providers (Clerk session tokens) omit it.
    pub audience: Option<String>,
    /// Overrides `{issuer}/.well-known/jwks.json`.
    pub jwks_url: Option<String>,
    pub jwks_cache_duration: Duration,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: None,
            jwks_url: None,
            jwks_cache_duration: DEFAULT_JWKS_CACHE,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    fn jwks_url(&self) -> String {
        self.jwks_url.clone().unwrap_or_else(|| {
            format!(
                "{}/.well-known/jwks.json",
                self.issuer_url.trim_end_matches('/')
            )
        })
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// OIDC session validator. Keys are fetched lazily on first use.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl OidcSessionValidator {
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        debug!(url = %url, "fetching JWKS");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })
    }

    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() <= self.config.jwks_cache_duration {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        *self.jwks_cache.write().await = Some(JwksCache {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });
        Ok(jwks)
    }

    fn decoding_key(kid: &str, jwks: &JwkSet) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwk = jwks.find(kid).ok_or_else(|| {
            warn!(kid, "no JWKS key for kid");
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                warn!(algorithm = ?other, "unsupported JWKS algorithm");
                return Err(AuthError::InvalidToken);
            }
        };

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            warn!(error = %e, "failed to build decoding key");
            AuthError::InvalidToken
        })?;
        Ok((key, algorithm))
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "failed to decode JWT header");
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let jwks = self.get_jwks().await?;
        let (key, algorithm) = Self::decoding_key(&kid, &jwks)?;

        let claims = decode::<Claims>(token, &key, &self.validation(algorithm))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    warn!(error = %e, "token validation failed");
                    AuthError::InvalidToken
                }
            })?
            .claims;

        let identity = ExternalIdentityId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(identity, claims.email))
    }
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
