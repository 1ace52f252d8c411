//! HTTP routes for onboarding endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{complete_onboarding, get_onboarding_status, OnboardingHandlers};

/// Onboarding router, to be nested under `/api/onboarding`.
pub fn onboarding_routes<Tx: Send + 'static>(handlers: OnboardingHandlers<Tx>) -> Router {
    Router::new()
        .route("/", post(complete_onboarding::<Tx>))
        .route("/status", get(get_onboarding_status::<Tx>))
        .with_state(handlers)
}
