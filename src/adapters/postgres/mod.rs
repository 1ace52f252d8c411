//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUnitOfWork` - transactions with a per-transaction statement timeout
//! - `PostgresIndustryInsightRepository` - insert-if-absent on the industry key
//! - `PostgresUserRepository` - row-locked user reads and onboarding updates
//! - `PostgresUserReader` - pool-backed onboarding status reads

mod industry_insight_repository;
mod unit_of_work;
mod user_repository;

pub use industry_insight_repository::PostgresIndustryInsightRepository;
pub use unit_of_work::PostgresUnitOfWork;
pub use user_repository::{PostgresUserReader, PostgresUserRepository};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Transaction handle threaded through the Postgres repositories.
pub type PgTx = sqlx::Transaction<'static, sqlx::Postgres>;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const QUERY_CANCELED: &str = "57014";

/// Maps a sqlx error onto the domain taxonomy.
pub(crate) fn map_db_error(context: &str, err: sqlx::Error) -> DomainError {
    let code = match &err {
        sqlx::Error::Database(db) => classify_sqlstate(db.code().as_deref()),
        _ => ErrorCode::DatabaseError,
    };
    DomainError::new(code, format!("{}: {}", context, err))
}

fn classify_sqlstate(sqlstate: Option<&str>) -> ErrorCode {
    match sqlstate {
        Some(FOREIGN_KEY_VIOLATION) => ErrorCode::ForeignKeyViolation,
        // Raised when `statement_timeout` cancels a statement or lock wait
        Some(QUERY_CANCELED) => ErrorCode::TransactionTimeout,
        _ => ErrorCode::DatabaseError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_map_to_database_error() {
        let err = map_db_error("Failed to fetch", sqlx::Error::RowNotFound);
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert!(err.message().starts_with("Failed to fetch"));
    }

    #[test]
    fn missing_insight_reference_maps_to_foreign_key_violation() {
        assert_eq!(classify_sqlstate(Some("23503")), ErrorCode::ForeignKeyViolation);
    }

    #[test]
    fn cancelled_statement_maps_to_transaction_timeout() {
        assert_eq!(classify_sqlstate(Some("57014")), ErrorCode::TransactionTimeout);
    }

    #[test]
    fn other_sqlstates_map_to_database_error() {
        // unique_violation, serialization_failure, no code at all
        for sqlstate in [Some("23505"), Some("40001"), None] {
            assert_eq!(classify_sqlstate(sqlstate), ErrorCode::DatabaseError);
        }
    }
}
