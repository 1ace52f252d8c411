//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod onboarding;

pub use onboarding::{
    CompleteOnboardingCommand, CompleteOnboardingHandler, CompleteOnboardingResult,
    GetOnboardingStatusHandler, GetOnboardingStatusQuery, IndustryInsightStore,
    OnboardingStatus, UserProfileStore, DEFAULT_TRANSACTION_TIMEOUT,
};
