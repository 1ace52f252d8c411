//! PostgreSQL unit of work.
//!
//! Each transaction gets a local `statement_timeout`, so a single stuck
//! statement cannot hold row locks past the onboarding time bound.

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tracing::debug;

use crate::domain::foundation::DomainError;
use crate::ports::UnitOfWork;

use super::{map_db_error, PgTx};

pub struct PostgresUnitOfWork {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PostgresUnitOfWork {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", self.statement_timeout.as_millis()))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to set statement timeout", e))?;

        debug!("began onboarding transaction");
        Ok(tx)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), DomainError> {
        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit transaction", e))
    }

    async fn rollback(&self, tx: PgTx) -> Result<(), DomainError> {
        tx.rollback()
            .await
            .map_err(|e| map_db_error("Failed to roll back transaction", e))
    }
}
