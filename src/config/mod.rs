//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `CAREER_COACH` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use career_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod onboarding;
mod redis;
mod server;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use onboarding::OnboardingConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Cached view invalidation; optional
    #[serde(default)]
    pub redis: RedisConfig,

    pub auth: AuthConfig,

    /// Insight generation; disabled without an API key
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub onboarding: OnboardingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` if present, then variables such as
    /// `CAREER_COACH__SERVER__PORT=8080` -> `server.port = 8080`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAREER_COACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.onboarding.validate()?;
        self.onboarding.fits_within(self.server.request_timeout())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CAREER_COACH__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("CAREER_COACH__AUTH__ISSUER", "https://auth.example.com");
    }

    fn clear_env() {
        for key in [
            "CAREER_COACH__DATABASE__URL",
            "CAREER_COACH__AUTH__ISSUER",
            "CAREER_COACH__REDIS__URL",
            "CAREER_COACH__SERVER__PORT",
            "CAREER_COACH__SERVER__ENVIRONMENT",
            "CAREER_COACH__SERVER__REQUEST_TIMEOUT_SECS",
            "CAREER_COACH__ONBOARDING__TRANSACTION_TIMEOUT_MS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert!(config.redis.url().is_none());
        assert!(!config.ai.is_enabled());
        assert_eq!(config.onboarding.insight_refresh_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_shorter_than_transaction_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAREER_COACH__SERVER__REQUEST_TIMEOUT_SECS", "10");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutBelowTransaction {
                request_ms: 10_000,
                transaction_ms: 15_000,
            })
        ));
    }

    #[test]
    fn test_missing_database_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CAREER_COACH__AUTH__ISSUER", "https://auth.example.com");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAREER_COACH__SERVER__PORT", "3000");
        env::set_var("CAREER_COACH__SERVER__ENVIRONMENT", "production");
        env::set_var("CAREER_COACH__REDIS__URL", "redis://localhost:6379");
        env::set_var("CAREER_COACH__ONBOARDING__TRANSACTION_TIMEOUT_MS", "5000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.redis.url(), Some("redis://localhost:6379"));
        assert_eq!(
            config.onboarding.transaction_timeout(),
            std::time::Duration::from_secs(5)
        );
    }
}
