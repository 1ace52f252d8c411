//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - validates Bearer tokens and records the outcome in
//!   request extensions
//! - `RequireAuth` - extractor that rejects unauthenticated requests
//! - `OptionalAuth` - extractor that yields `None` for anonymous callers
//!
//! The middleware never rejects on its own. A bad token is recorded as an
//! `AuthFailure` so that read-only routes can treat the caller as anonymous
//! while `RequireAuth` still reports the precise reason.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser | AuthFailure in extensions
//!                                      ↓
//!                  Handler → RequireAuth / OptionalAuth read extensions
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Why a presented token was not accepted.
#[derive(Debug, Clone)]
pub struct AuthFailure(pub AuthError);

/// Validates `Authorization: Bearer <token>` when present.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => {
                match &e {
                    AuthError::ServiceUnavailable(msg) => {
                        error!(error = %msg, "auth service unavailable")
                    }
                    other => debug!(error = %other, "rejected bearer token"),
                }
                request.extensions_mut().insert(AuthFailure(e));
            }
        }
    }

    next.run(request).await
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(RequireAuth(user.clone()));
        }
        Err(match parts.extensions.get::<AuthFailure>() {
            Some(AuthFailure(AuthError::TokenExpired)) => AuthRejection::TokenExpired,
            Some(AuthFailure(AuthError::ServiceUnavailable(_))) => AuthRejection::ServiceUnavailable,
            Some(AuthFailure(AuthError::InvalidToken)) => AuthRejection::InvalidToken,
            None => AuthRejection::Unauthenticated,
        })
    }
}

/// Extractor for optional authentication. Rejected tokens count as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthenticated,
    InvalidToken,
    TokenExpired,
    ServiceUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthRejection::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthRejection::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthRejection::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/required",
                get(|RequireAuth(user): RequireAuth| async move {
                    user.identity.to_string()
                }),
            )
            .route(
                "/optional",
                get(|OptionalAuth(user): OptionalAuth| async move {
                    user.map(|u| u.identity.to_string())
                        .unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, path: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_required_route() {
        let validator = MockSessionValidator::new().with_identity("good", "user_1");
        let (status, body) = call(app(validator), "/required", Some("good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user_1");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_on_required_route() {
        let (status, body) = call(app(MockSessionValidator::new()), "/required", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"success\":false"));
    }

    #[tokio::test]
    async fn bad_token_is_anonymous_on_optional_route() {
        let (status, body) = call(app(MockSessionValidator::new()), "/optional", Some("bad")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn provider_outage_is_503_on_required_route() {
        let validator = MockSessionValidator::new()
            .with_error(AuthError::service_unavailable("jwks down"));
        let (status, _) = call(app(validator), "/required", Some("any")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
