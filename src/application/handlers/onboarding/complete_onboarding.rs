//! CompleteOnboarding - Command handler that attaches an industry to a user.
//!
//! Runs ensure-insight then apply-onboarding inside one transaction. The
//! insight write must be visible before the user row references it, so the
//! two steps are never reordered or split across transactions.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ExternalIdentityId};
use crate::domain::insight::IndustryInsight;
use crate::domain::onboarding::{OnboardingInput, OnboardingUpdate, User};
use crate::ports::{CachedView, UnitOfWork, ViewInvalidator};

use super::{IndustryInsightStore, UserProfileStore};

/// Default upper bound on the whole unit of work.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Command to complete onboarding for the calling user.
#[derive(Debug, Clone)]
pub struct CompleteOnboardingCommand {
    /// `None` when the request carried no valid credentials.
    pub caller: Option<AuthenticatedUser>,
    pub input: OnboardingInput,
}

/// Result of a committed onboarding.
#[derive(Debug, Clone)]
pub struct CompleteOnboardingResult {
    pub user: User,
    pub insight: IndustryInsight,
}

/// Handler for completing onboarding.
pub struct CompleteOnboardingHandler<Tx: Send + 'static> {
    uow: Arc<dyn UnitOfWork<Tx = Tx>>,
    insights: IndustryInsightStore<Tx>,
    profiles: UserProfileStore<Tx>,
    invalidator: Arc<dyn ViewInvalidator>,
    transaction_timeout: Duration,
}

impl<Tx: Send + 'static> CompleteOnboardingHandler<Tx> {
    pub fn new(
        uow: Arc<dyn UnitOfWork<Tx = Tx>>,
        insights: IndustryInsightStore<Tx>,
        profiles: UserProfileStore<Tx>,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            uow,
            insights,
            profiles,
            invalidator,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: CompleteOnboardingCommand,
    ) -> Result<CompleteOnboardingResult, DomainError> {
        // 1. Normalize before touching storage
        let update = cmd.input.normalize().map_err(|e| {
            warn!(error = %e, "rejected onboarding input");
            DomainError::from(e)
        })?;

        // 2. Require an authenticated caller
        let caller = cmd.caller.ok_or_else(|| {
            DomainError::new(ErrorCode::Unauthorized, "Authentication required")
        })?;

        info!(
            identity = %caller.identity,
            industry = %update.industry,
            "starting onboarding transaction"
        );

        // 3. Run the unit of work under the time bound. Dropping the future on
        // timeout drops the open transaction, which rolls it back.
        let result = match tokio::time::timeout(
            self.transaction_timeout,
            self.run_unit(&caller.identity, &update),
        )
        .await
        {
            Ok(result) => result.map_err(abort_storage_errors)?,
            Err(_) => {
                error!(
                    identity = %caller.identity,
                    timeout_ms = millis(self.transaction_timeout),
                    "onboarding transaction timed out"
                );
                return Err(DomainError::new(
                    ErrorCode::TransactionTimeout,
                    format!(
                        "Onboarding did not complete within {}ms",
                        millis(self.transaction_timeout)
                    ),
                ));
            }
        };

        info!(
            user_id = %result.user.id(),
            industry = %update.industry,
            "onboarding completed"
        );

        // 4. Post-commit: mark cached views stale
        for view in CachedView::ALL {
            if let Err(e) = self.invalidator.invalidate(&caller.identity, view).await {
                warn!(identity = %caller.identity, %view, error = %e, "failed to invalidate cached view");
            }
        }

        Ok(result)
    }

    async fn run_unit(
        &self,
        identity: &ExternalIdentityId,
        update: &OnboardingUpdate,
    ) -> Result<CompleteOnboardingResult, DomainError> {
        let mut tx = self.uow.begin().await?;

        match self.steps(&mut tx, identity, update).await {
            Ok(result) => {
                self.uow.commit(tx).await?;
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = self.uow.rollback(tx).await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn steps(
        &self,
        tx: &mut Tx,
        identity: &ExternalIdentityId,
        update: &OnboardingUpdate,
    ) -> Result<CompleteOnboardingResult, DomainError> {
        let user = self.profiles.resolve(tx, identity).await?;
        let insight = self.insights.ensure_insight(tx, &update.industry).await?;
        let user = self.profiles.apply_onboarding(tx, user.id(), update).await?;
        Ok(CompleteOnboardingResult { user, insight })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Storage failures surface as an aborted transaction; detail stays in the log.
fn abort_storage_errors(err: DomainError) -> DomainError {
    match err.code() {
        ErrorCode::DatabaseError | ErrorCode::InternalError => {
            error!(error = %err, "onboarding transaction aborted");
            DomainError::new(ErrorCode::TransactionAborted, "Onboarding transaction aborted")
                .with_detail("cause", err.message())
        }
        ErrorCode::ForeignKeyViolation => {
            error!(error = %err, "insight missing when attaching industry");
            err
        }
        _ => {
            warn!(error = %err, "onboarding transaction rolled back");
            err
        }
    }
}
