//! HTTP handlers for onboarding endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::onboarding::{
    CompleteOnboardingCommand, CompleteOnboardingHandler, GetOnboardingStatusHandler,
    GetOnboardingStatusQuery,
};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::dto::{CompleteOnboardingRequest, OnboardingResponse};

/// Shared state for the onboarding routes.
pub struct OnboardingHandlers<Tx: Send + 'static> {
    complete_handler: Arc<CompleteOnboardingHandler<Tx>>,
    status_handler: Arc<GetOnboardingStatusHandler>,
}

impl<Tx: Send + 'static> Clone for OnboardingHandlers<Tx> {
    fn clone(&self) -> Self {
        Self {
            complete_handler: self.complete_handler.clone(),
            status_handler: self.status_handler.clone(),
        }
    }
}

impl<Tx: Send + 'static> OnboardingHandlers<Tx> {
    pub fn new(
        complete_handler: Arc<CompleteOnboardingHandler<Tx>>,
        status_handler: Arc<GetOnboardingStatusHandler>,
    ) -> Self {
        Self {
            complete_handler,
            status_handler,
        }
    }
}

/// POST /api/onboarding - Complete onboarding for the caller
pub async fn complete_onboarding<Tx: Send + 'static>(
    State(handlers): State<OnboardingHandlers<Tx>>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CompleteOnboardingRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "malformed onboarding body");
            return (
                StatusCode::BAD_REQUEST,
                Json(OnboardingResponse::failed(rejection.body_text())),
            )
                .into_response();
        }
    };

    let cmd = CompleteOnboardingCommand {
        caller: Some(user),
        input: req.into(),
    };

    match handlers.complete_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(OnboardingResponse::ok(&result.user))).into_response(),
        Err(e) => handle_onboarding_error(e),
    }
}

/// GET /api/onboarding/status - Whether the caller has onboarded
pub async fn get_onboarding_status<Tx: Send + 'static>(
    State(handlers): State<OnboardingHandlers<Tx>>,
    OptionalAuth(user): OptionalAuth,
) -> Response {
    let status = handlers
        .status_handler
        .handle(GetOnboardingStatusQuery { caller: user })
        .await;
    (StatusCode::OK, Json(status)).into_response()
}

fn handle_onboarding_error(error: DomainError) -> Response {
    let status = match error.code() {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::TransactionTimeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(OnboardingResponse::failed(error.user_message()))).into_response()
}
