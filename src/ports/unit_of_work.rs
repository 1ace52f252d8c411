//! UnitOfWork port - explicit transaction boundaries.
//!
//! Repositories that take part in a unit of work receive the transaction
//! handle as a parameter on every call. No operation relies on an ambient or
//! thread-local transaction.
//!
//! # Contract
//!
//! - `begin` opens an isolated transaction
//! - `commit` makes every write made through the handle visible atomically
//! - `rollback` discards them
//! - Dropping an uncommitted handle MUST behave like `rollback`, so a cancelled
//!   future never leaves partial writes behind
//!
//! # Example
//!
//! ```ignore
//! let mut tx = uow.begin().await?;
//! let insight = insights.ensure_insight(&mut tx, &industry).await?;
//! let user = profiles.apply_onboarding(&mut tx, user.id(), &update).await?;
//! uow.commit(tx).await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Transaction handle threaded through repository calls.
    type Tx: Send + 'static;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;

    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError>;
}
