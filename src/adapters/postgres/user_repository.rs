//! PostgreSQL adapters for UserRepository and UserReader.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ExternalIdentityId, Timestamp, UserId};
use crate::domain::insight::IndustryKey;
use crate::domain::onboarding::{OnboardingUpdate, User};
use crate::ports::{OnboardingState, UserReader, UserRepository};

use super::{map_db_error, PgTx};

const USER_COLUMNS: &str =
    "id, external_identity_id, email, industry, experience, bio, skills, created_at, updated_at";

#[derive(Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    pub fn new() -> Self {
        Self
    }
}

fn user_from_row(row: &PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| map_db_error("Failed to read user row", e);

    let id: Uuid = row.try_get("id").map_err(read)?;
    let identity: String = row.try_get("external_identity_id").map_err(read)?;
    let industry: Option<String> = row.try_get("industry").map_err(read)?;
    let experience: Option<i32> = row.try_get("experience").map_err(read)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(read)?;

    let corrupt = |e: String| {
        DomainError::new(ErrorCode::InternalError, format!("Corrupt user row {}: {}", id, e))
    };

    let experience = experience
        .map(u32::try_from)
        .transpose()
        .map_err(|e| corrupt(e.to_string()))?;

    Ok(User::reconstitute(
        UserId::from_uuid(id),
        ExternalIdentityId::new(identity).map_err(|e| corrupt(e.to_string()))?,
        row.try_get("email").map_err(read)?,
        industry
            .map(IndustryKey::new)
            .transpose()
            .map_err(|e| corrupt(e.to_string()))?,
        experience,
        row.try_get("bio").map_err(read)?,
        row.try_get("skills").map_err(read)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

#[async_trait]
impl UserRepository<PgTx> for PostgresUserRepository {
    async fn find_by_external_identity(
        &self,
        tx: &mut PgTx,
        identity: &ExternalIdentityId,
    ) -> Result<Option<User>, DomainError> {
        // Lock the row so concurrent onboardings of one user serialize.
        let sql = format!(
            "SELECT {} FROM users WHERE external_identity_id = $1 FOR UPDATE",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(identity.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_db_error("Failed to fetch user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn apply_onboarding(
        &self,
        tx: &mut PgTx,
        user_id: &UserId,
        update: &OnboardingUpdate,
    ) -> Result<User, DomainError> {
        let experience = update
            .experience
            .map(i32::try_from)
            .transpose()
            .map_err(|e| DomainError::validation("experience", e.to_string()))?;

        let sql = format!(
            r#"
            UPDATE users
            SET industry = $2, experience = $3, bio = $4, skills = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .bind(update.industry.as_str())
            .bind(experience)
            .bind(update.bio.as_deref())
            .bind(&update.skills)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_db_error("Failed to update user", e))?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(DomainError::new(
                ErrorCode::NotFound,
                format!("User not found: {}", user_id),
            )),
        }
    }
}

/// Pool-backed reads outside any unit of work.
#[derive(Clone)]
pub struct PostgresUserReader {
    pool: PgPool,
}

impl PostgresUserReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserReader for PostgresUserReader {
    async fn onboarding_state(
        &self,
        identity: &ExternalIdentityId,
    ) -> Result<Option<OnboardingState>, DomainError> {
        let row = sqlx::query("SELECT industry FROM users WHERE external_identity_id = $1")
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to fetch onboarding state", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let industry: Option<String> = row
            .try_get("industry")
            .map_err(|e| map_db_error("Failed to read industry", e))?;
        let industry = industry
            .map(IndustryKey::new)
            .transpose()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        Ok(Some(OnboardingState { industry }))
    }
}
