//! Insight generator port - produces industry insight content.
//!
//! The generator is an untrusted external collaborator. Callers must treat
//! every error as recoverable and validate successful output before persisting.

use async_trait::async_trait;

use crate::domain::insight::{IndustryKey, InsightContent};

/// Produces structured insight content for an industry.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Generate insight content for `industry`.
    ///
    /// # Errors
    ///
    /// - `GenerationError::Timeout` - the provider did not answer in time
    /// - `GenerationError::Provider` - the provider call failed
    /// - `GenerationError::MalformedOutput` - the answer did not match the schema
    async fn generate(&self, industry: &IndustryKey) -> Result<InsightContent, GenerationError>;
}

/// Why generation failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("insight generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("insight provider error: {0}")]
    Provider(String),

    #[error("malformed insight output: {0}")]
    MalformedOutput(String),
}

impl GenerationError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput(message.into())
    }
}
