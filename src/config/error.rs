//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Auth issuer must use HTTPS in production")]
    IssuerMustBeHttps,

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,

    #[error("Onboarding timeout must be greater than zero: {0}")]
    ZeroTimeout(&'static str),

    #[error("Insight refresh interval must be at least one day")]
    InvalidRefreshDays,

    #[error("Generation timeout ({generation_ms}ms) must be shorter than the transaction timeout ({transaction_ms}ms)")]
    GenerationTimeoutExceedsTransaction {
        generation_ms: u64,
        transaction_ms: u64,
    },

    #[error("Request timeout ({request_ms}ms) must be longer than the transaction timeout ({transaction_ms}ms)")]
    RequestTimeoutBelowTransaction {
        request_ms: u64,
        transaction_ms: u64,
    },
}
