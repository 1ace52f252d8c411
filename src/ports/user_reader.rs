//! UserReader port - read-only, non-transactional user queries.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExternalIdentityId};
use crate::domain::insight::IndustryKey;

/// Onboarding-relevant projection of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingState {
    pub industry: Option<IndustryKey>,
}

impl OnboardingState {
    pub fn is_onboarded(&self) -> bool {
        self.industry.is_some()
    }
}

/// Read-side access to users.
#[async_trait]
pub trait UserReader: Send + Sync {
    /// Returns `None` when no profile exists for `identity`.
    async fn onboarding_state(
        &self,
        identity: &ExternalIdentityId,
    ) -> Result<Option<OnboardingState>, DomainError>;
}
