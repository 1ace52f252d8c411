//! Onboarding workflow tuning.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::insight::DEFAULT_REFRESH_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// Upper bound on the whole onboarding unit of work
    #[serde(default = "default_transaction_timeout_ms")]
    pub transaction_timeout_ms: u64,

    /// Upper bound on a single insight generation call
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,

    /// Days until a new insight is due for refresh
    #[serde(default = "default_refresh_days")]
    pub insight_refresh_days: i64,
}

impl OnboardingConfig {
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.transaction_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout("transaction_timeout_ms"));
        }
        if self.generation_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout("generation_timeout_ms"));
        }
        if self.insight_refresh_days < 1 {
            return Err(ValidationError::InvalidRefreshDays);
        }
        // Generation runs inside the transaction, so its fallback must fire first.
        if self.generation_timeout_ms >= self.transaction_timeout_ms {
            return Err(ValidationError::GenerationTimeoutExceedsTransaction {
                generation_ms: self.generation_timeout_ms,
                transaction_ms: self.transaction_timeout_ms,
            });
        }
        Ok(())
    }

    /// Checks that an outer request deadline leaves room for the transaction
    /// to time out and report its own error.
    pub fn fits_within(&self, request_timeout: Duration) -> Result<(), ValidationError> {
        if request_timeout <= self.transaction_timeout() {
            return Err(ValidationError::RequestTimeoutBelowTransaction {
                request_ms: u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX),
                transaction_ms: self.transaction_timeout_ms,
            });
        }
        Ok(())
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: default_transaction_timeout_ms(),
            generation_timeout_ms: default_generation_timeout_ms(),
            insight_refresh_days: default_refresh_days(),
        }
    }
}

fn default_transaction_timeout_ms() -> u64 {
    15_000
}

fn default_generation_timeout_ms() -> u64 {
    10_000
}

fn default_refresh_days() -> i64 {
    DEFAULT_REFRESH_DAYS
}
