//! Career Coach API server.

use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use career_coach::adapters::ai::{DisabledInsightGenerator, LlmInsightGenerator, OpenAIProvider};
use career_coach::adapters::auth::OidcSessionValidator;
use career_coach::adapters::cache::{NoopViewInvalidator, RedisViewInvalidator};
use career_coach::adapters::http::middleware::{auth_middleware, AuthState};
use career_coach::adapters::http::{onboarding_routes, OnboardingHandlers};
use career_coach::adapters::postgres::{
    PgTx, PostgresIndustryInsightRepository, PostgresUnitOfWork, PostgresUserReader,
    PostgresUserRepository,
};
use career_coach::application::handlers::onboarding::{
    CompleteOnboardingHandler, GetOnboardingStatusHandler, IndustryInsightStore, UserProfileStore,
};
use career_coach::config::{AppConfig, ServerConfig};
use career_coach::ports::{InsightGenerator, ViewInvalidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("migrations applied");
    }

    let generator: Arc<dyn InsightGenerator> = match config.ai.provider_config() {
        Some(provider_config) => {
            let provider = OpenAIProvider::new(provider_config)?;
            info!(model = %config.ai.model, "insight generation enabled");
            Arc::new(LlmInsightGenerator::new(Arc::new(provider)))
        }
        None => {
            warn!("no AI key configured, insights will use default content");
            Arc::new(DisabledInsightGenerator)
        }
    };

    let invalidator: Arc<dyn ViewInvalidator> = match config.redis.url() {
        Some(url) => Arc::new(RedisViewInvalidator::connect(url).await?),
        None => {
            warn!("no Redis configured, cached view invalidation disabled");
            Arc::new(NoopViewInvalidator::new())
        }
    };

    let onboarding = &config.onboarding;
    let insights = IndustryInsightStore::<PgTx>::new(
        Arc::new(PostgresIndustryInsightRepository::new()),
        generator,
        onboarding.generation_timeout(),
        onboarding.insight_refresh_days,
    );
    let profiles = UserProfileStore::<PgTx>::new(Arc::new(PostgresUserRepository::new()));
    let uow = Arc::new(PostgresUnitOfWork::new(
        pool.clone(),
        onboarding.transaction_timeout(),
    ));
    let complete = CompleteOnboardingHandler::new(uow, insights, profiles, invalidator)
        .with_transaction_timeout(onboarding.transaction_timeout());
    let status = GetOnboardingStatusHandler::new(Arc::new(PostgresUserReader::new(pool)));
    let handlers = OnboardingHandlers::new(Arc::new(complete), Arc::new(status));

    let validator: AuthState = Arc::new(OidcSessionValidator::new(config.auth.oidc_config())?);

    let app = Router::new()
        .nest("/api/onboarding", onboarding_routes(handlers))
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
            }
        })
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
