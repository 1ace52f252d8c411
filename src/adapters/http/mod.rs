//! HTTP adapters - REST API implementations.

pub mod middleware;
pub mod onboarding;

pub use onboarding::{onboarding_routes, OnboardingHandlers};
