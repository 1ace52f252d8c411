//! Onboarding handlers.
//!
//! - `CompleteOnboardingHandler` - ensure insight + attach industry, one transaction
//! - `GetOnboardingStatusHandler` - read-only onboarding check
//!
//! `IndustryInsightStore` and `UserProfileStore` are the transactional building
//! blocks the command handler composes.

mod complete_onboarding;
mod get_onboarding_status;
mod insight_store;
mod profile_store;

pub use complete_onboarding::{
    CompleteOnboardingCommand, CompleteOnboardingHandler, CompleteOnboardingResult,
    DEFAULT_TRANSACTION_TIMEOUT,
};
pub use get_onboarding_status::{
    GetOnboardingStatusHandler, GetOnboardingStatusQuery, OnboardingStatus,
};
pub use insight_store::IndustryInsightStore;
pub use profile_store::UserProfileStore;
