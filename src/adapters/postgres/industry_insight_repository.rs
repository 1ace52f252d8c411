//! PostgreSQL adapter for IndustryInsightRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::insight::{
    IndustryInsight, IndustryKey, InsightContent, SalaryRange,
};
use crate::ports::{IndustryInsightRepository, InsertOutcome};

use super::{map_db_error, PgTx};

const INSIGHT_COLUMNS: &str = "industry, salary_ranges, growth_rate, demand_level, top_skills, \
     market_outlook, recommended_skills, key_trends, origin, last_updated, next_update";

#[derive(Default)]
pub struct PostgresIndustryInsightRepository;

impl PostgresIndustryInsightRepository {
    pub fn new() -> Self {
        Self
    }

    fn from_row(row: &PgRow) -> Result<IndustryInsight, DomainError> {
        let industry: String = get(row, "industry")?;
        let salary_ranges: serde_json::Value = get(row, "salary_ranges")?;
        let salary_ranges: Vec<SalaryRange> = serde_json::from_value(salary_ranges).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to deserialize salary ranges: {}", e),
            )
        })?;
        let demand_level: String = get(row, "demand_level")?;
        let market_outlook: String = get(row, "market_outlook")?;
        let origin: String = get(row, "origin")?;
        let last_updated: chrono::DateTime<chrono::Utc> = get(row, "last_updated")?;
        let next_update: chrono::DateTime<chrono::Utc> = get(row, "next_update")?;

        let content = InsightContent {
            salary_ranges,
            growth_rate: get(row, "growth_rate")?,
            demand_level: demand_level.parse().map_err(corrupt)?,
            top_skills: get(row, "top_skills")?,
            market_outlook: market_outlook.parse().map_err(corrupt)?,
            recommended_skills: get(row, "recommended_skills")?,
            key_trends: get(row, "key_trends")?,
        };

        Ok(IndustryInsight::reconstitute(
            IndustryKey::new(industry).map_err(corrupt)?,
            content,
            origin.parse().map_err(corrupt)?,
            Timestamp::from_datetime(last_updated),
            Timestamp::from_datetime(next_update),
        ))
    }
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| map_db_error(&format!("Failed to read column {}", column), e))
}

fn corrupt(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Corrupt industry insight row: {}", err),
    )
}

#[async_trait]
impl IndustryInsightRepository<PgTx> for PostgresIndustryInsightRepository {
    async fn find_by_industry(
        &self,
        tx: &mut PgTx,
        industry: &IndustryKey,
    ) -> Result<Option<IndustryInsight>, DomainError> {
        let sql = format!(
            "SELECT {} FROM industry_insights WHERE industry = $1",
            INSIGHT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(industry.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_db_error("Failed to fetch industry insight", e))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn insert_if_absent(
        &self,
        tx: &mut PgTx,
        insight: &IndustryInsight,
    ) -> Result<InsertOutcome, DomainError> {
        let content = insight.content();
        let salary_ranges = serde_json::to_value(&content.salary_ranges).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize salary ranges: {}", e),
            )
        })?;

        // A concurrent uncommitted insert for the same key blocks here until
        // that transaction finishes; DO NOTHING then yields no row.
        let sql = format!(
            r#"
            INSERT INTO industry_insights ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (industry) DO NOTHING
            RETURNING {cols}
            "#,
            cols = INSIGHT_COLUMNS
        );
        let inserted = sqlx::query(&sql)
            .bind(insight.industry().as_str())
            .bind(salary_ranges)
            .bind(content.growth_rate)
            .bind(content.demand_level.as_str())
            .bind(&content.top_skills)
            .bind(content.market_outlook.as_str())
            .bind(&content.recommended_skills)
            .bind(&content.key_trends)
            .bind(insight.origin().as_str())
            .bind(*insight.last_updated().as_datetime())
            .bind(*insight.next_update().as_datetime())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_db_error("Failed to insert industry insight", e))?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Inserted(Self::from_row(&row)?));
        }

        match self.find_by_industry(tx, insight.industry()).await? {
            Some(existing) => Ok(InsertOutcome::Existing(existing)),
            None => Err(DomainError::new(
                ErrorCode::NotFound,
                format!(
                    "Industry insight '{}' conflicted on insert but is not visible",
                    insight.industry()
                ),
            )),
        }
    }
}
