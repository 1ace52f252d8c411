//! IndustryInsightRepository port - transactional access to insight records.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::insight::{IndustryInsight, IndustryKey};

/// Outcome of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// This call created the record.
    Inserted(IndustryInsight),
    /// Another transaction already owned the key; its record is returned.
    Existing(IndustryInsight),
}

impl InsertOutcome {
    pub fn into_insight(self) -> IndustryInsight {
        match self {
            InsertOutcome::Inserted(insight) | InsertOutcome::Existing(insight) => insight,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Repository for industry insights.
///
/// # Contract
///
/// `insert_if_absent` is atomic against the unique industry key. When another
/// transaction holds an uncommitted insert for the same key, the call waits for
/// it to finish; it then returns `Existing` with the committed record, or
/// inserts if the other transaction rolled back. It never fails with a
/// duplicate-key error and never overwrites an existing record.
#[async_trait]
pub trait IndustryInsightRepository<Tx: Send>: Send + Sync {
    /// Point lookup by industry key, visible to `tx`.
    async fn find_by_industry(
        &self,
        tx: &mut Tx,
        industry: &IndustryKey,
    ) -> Result<Option<IndustryInsight>, DomainError>;

    /// Atomic conditional insert keyed by `insight.industry()`.
    async fn insert_if_absent(
        &self,
        tx: &mut Tx,
        insight: &IndustryInsight,
    ) -> Result<InsertOutcome, DomainError>;
}
