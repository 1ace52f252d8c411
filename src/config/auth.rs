//! Authentication configuration (OIDC)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::OidcConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// OIDC issuer URL
    pub issuer: String,

    /// Expected `aud` claim; audience is not checked when unset
    pub audience: Option<String>,

    /// JWKS endpoint override; defaults to the issuer's well-known path
    pub jwks_url: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Builds the validator configuration.
    pub fn oidc_config(&self) -> OidcConfig {
        let mut oidc = OidcConfig::new(&self.issuer).with_cache_duration(self.jwks_cache_ttl());
        if let Some(audience) = self.audience.as_deref().filter(|a| !a.is_empty()) {
            oidc = oidc.with_audience(audience);
        }
        if let Some(url) = self.jwks_url.as_deref().filter(|u| !u.is_empty()) {
            oidc = oidc.with_jwks_url(url);
        }
        oidc
    }

    /// Production requires an HTTPS issuer.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_ISSUER"));
        }
        if *environment == Environment::Production && !self.issuer.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: None,
            jwks_url: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
