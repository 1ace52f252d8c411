//! Postgres adapter tests.
//!
//! These need a disposable database and are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgresql://localhost/career_coach_test cargo test -- --ignored
//! ```

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use career_coach::adapters::postgres::{
    PostgresIndustryInsightRepository, PostgresUnitOfWork, PostgresUserRepository,
};
use career_coach::domain::foundation::{ErrorCode, ExternalIdentityId, Timestamp, UserId};
use career_coach::domain::insight::{
    DemandLevel, IndustryInsight, IndustryKey, InsightContent, InsightOrigin, MarketOutlook,
};
use career_coach::domain::onboarding::OnboardingUpdate;
use career_coach::ports::{IndustryInsightRepository, UnitOfWork, UserRepository};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("test database should accept connections");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations should apply");
    pool
}

fn unique_industry(prefix: &str) -> IndustryKey {
    IndustryKey::new(format!("{prefix} {}", Uuid::new_v4())).unwrap()
}

fn generated(industry: &IndustryKey) -> IndustryInsight {
    let content = InsightContent {
        growth_rate: 12.5,
        demand_level: DemandLevel::High,
        market_outlook: MarketOutlook::Positive,
        top_skills: vec!["Rust".to_string()],
        ..InsightContent::fallback()
    };
    IndustryInsight::new(
        industry.clone(),
        content,
        InsightOrigin::Generated,
        Timestamp::now(),
        7,
    )
}

fn defaulted(industry: &IndustryKey) -> IndustryInsight {
    IndustryInsight::new(
        industry.clone(),
        InsightContent::fallback(),
        InsightOrigin::Default,
        Timestamp::now(),
        7,
    )
}

async fn seed_user(pool: &PgPool) -> (UserId, ExternalIdentityId) {
    let id = Uuid::new_v4();
    let identity = ExternalIdentityId::new(format!("ext-{id}")).unwrap();
    sqlx::query("INSERT INTO users (id, external_identity_id) VALUES ($1, $2)")
        .bind(id)
        .bind(identity.as_str())
        .execute(pool)
        .await
        .unwrap();
    (UserId::from_uuid(id), identity)
}

#[tokio::test]
#[ignore]
async fn insert_that_loses_the_race_returns_the_winning_row() {
    let pool = pool().await;
    let uow = PostgresUnitOfWork::new(pool.clone(), Duration::from_secs(5));
    let industry = unique_industry("Race");

    let mut winner = uow.begin().await.unwrap();
    let outcome = PostgresIndustryInsightRepository::new()
        .insert_if_absent(&mut winner, &generated(&industry))
        .await
        .unwrap();
    assert!(outcome.was_inserted());

    // The second insert blocks on the uncommitted row until the winner commits.
    let mut loser = uow.begin().await.unwrap();
    let candidate = defaulted(&industry);
    let pending = tokio::spawn(async move {
        let outcome = PostgresIndustryInsightRepository::new()
            .insert_if_absent(&mut loser, &candidate)
            .await;
        (loser, outcome)
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!pending.is_finished());
    uow.commit(winner).await.unwrap();

    let (loser, outcome) = pending.await.unwrap();
    let outcome = outcome.unwrap();
    assert!(!outcome.was_inserted());
    let existing = outcome.into_insight();
    assert_eq!(existing.origin(), InsightOrigin::Generated);
    assert_eq!(existing.content().growth_rate, 12.5);
    uow.rollback(loser).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM industry_insights WHERE industry = $1")
        .bind(industry.as_str())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn onboarding_an_unknown_industry_is_a_foreign_key_violation() {
    let pool = pool().await;
    let (user_id, _) = seed_user(&pool).await;
    let uow = PostgresUnitOfWork::new(pool.clone(), Duration::from_secs(5));
    let update = OnboardingUpdate {
        industry: unique_industry("Missing"),
        experience: Some(3),
        bio: None,
        skills: Vec::new(),
    };

    let mut tx = uow.begin().await.unwrap();
    let err = PostgresUserRepository::new()
        .apply_onboarding(&mut tx, &user_id, &update)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ForeignKeyViolation);
    uow.rollback(tx).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn lock_wait_past_statement_timeout_is_a_transaction_timeout() {
    let pool = pool().await;
    let (_, identity) = seed_user(&pool).await;
    let patient = PostgresUnitOfWork::new(pool.clone(), Duration::from_secs(5));
    let impatient = PostgresUnitOfWork::new(pool.clone(), Duration::from_millis(100));
    let users = PostgresUserRepository::new();

    let mut holder = patient.begin().await.unwrap();
    users
        .find_by_external_identity(&mut holder, &identity)
        .await
        .unwrap()
        .expect("seeded user should exist");

    let mut waiter = impatient.begin().await.unwrap();
    let err = users
        .find_by_external_identity(&mut waiter, &identity)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TransactionTimeout);

    impatient.rollback(waiter).await.unwrap();
    patient.rollback(holder).await.unwrap();
}
