//! IndustryInsightStore - ensures the canonical insight record for an industry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::insight::{IndustryInsight, IndustryKey, InsightContent, InsightOrigin};
use crate::ports::{GenerationError, IndustryInsightRepository, InsightGenerator};

/// Ensure-exists access to industry insights within a caller's transaction.
///
/// Generator failures and lost insert races are absorbed here; only storage
/// errors reach the caller.
pub struct IndustryInsightStore<Tx: Send + 'static> {
    repository: Arc<dyn IndustryInsightRepository<Tx>>,
    generator: Arc<dyn InsightGenerator>,
    generation_timeout: Duration,
    refresh_days: i64,
}

impl<Tx: Send + 'static> IndustryInsightStore<Tx> {
    pub fn new(
        repository: Arc<dyn IndustryInsightRepository<Tx>>,
        generator: Arc<dyn InsightGenerator>,
        generation_timeout: Duration,
        refresh_days: i64,
    ) -> Self {
        Self {
            repository,
            generator,
            generation_timeout,
            refresh_days,
        }
    }

    /// Returns the record for `industry`, creating it if absent.
    ///
    /// An existing record is returned unchanged, even when stale.
    pub async fn ensure_insight(
        &self,
        tx: &mut Tx,
        industry: &IndustryKey,
    ) -> Result<IndustryInsight, DomainError> {
        if let Some(existing) = self.repository.find_by_industry(tx, industry).await? {
            debug!(industry = %industry, "industry insight already exists");
            return Ok(existing);
        }

        let (content, origin) = self.generate_or_fallback(industry).await;
        let candidate = IndustryInsight::new(
            industry.clone(),
            content,
            origin,
            Timestamp::now(),
            self.refresh_days,
        );

        let outcome = self.repository.insert_if_absent(tx, &candidate).await?;
        let inserted = outcome.was_inserted();
        let insight = outcome.into_insight();
        if inserted {
            info!(
                industry = %industry,
                origin = insight.origin().as_str(),
                "created industry insight"
            );
        } else {
            debug!(
                industry = %industry,
                code = %ErrorCode::StorageConflict,
                "insight created concurrently, using committed record"
            );
        }
        Ok(insight)
    }

    async fn generate_or_fallback(&self, industry: &IndustryKey) -> (InsightContent, InsightOrigin) {
        match self.generate_validated(industry).await {
            Ok(content) => (content, InsightOrigin::Generated),
            Err(err) => {
                warn!(
                    industry = %industry,
                    code = %ErrorCode::ProviderDegraded,
                    error = %err,
                    "insight generation failed, using default content"
                );
                (InsightContent::fallback(), InsightOrigin::Default)
            }
        }
    }

    async fn generate_validated(&self, industry: &IndustryKey) -> Result<InsightContent, GenerationError> {
        let generated = tokio::time::timeout(self.generation_timeout, self.generator.generate(industry))
            .await
            .map_err(|_| GenerationError::Timeout {
                timeout_ms: u64::try_from(self.generation_timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        generated
            .validate()
            .map_err(|e| GenerationError::malformed(e.to_string()))?;
        Ok(generated)
    }
}
