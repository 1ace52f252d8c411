//! Onboarding HTTP adapter.
//!
//! - `POST /api/onboarding` - complete onboarding (authenticated)
//! - `GET /api/onboarding/status` - onboarding status (anonymous allowed)

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{complete_onboarding, get_onboarding_status, OnboardingHandlers};
pub use routes::onboarding_routes;
