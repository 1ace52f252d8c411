//! UserRepository port - transactional access to user profile records.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExternalIdentityId, UserId};
use crate::domain::onboarding::{OnboardingUpdate, User};

/// Repository for users taking part in the onboarding unit of work.
#[async_trait]
pub trait UserRepository<Tx: Send>: Send + Sync {
    /// Resolve the caller's external identity to a user, visible to `tx`.
    ///
    /// Implementations may lock the row for the rest of the transaction.
    async fn find_by_external_identity(
        &self,
        tx: &mut Tx,
        identity: &ExternalIdentityId,
    ) -> Result<Option<User>, DomainError>;

    /// Write the onboarding fields and return the updated record.
    ///
    /// # Errors
    ///
    /// - `ErrorCode::NotFound` - no user with `user_id`
    /// - `ErrorCode::ForeignKeyViolation` - no insight exists for `update.industry`
    async fn apply_onboarding(
        &self,
        tx: &mut Tx,
        user_id: &UserId,
        update: &OnboardingUpdate,
    ) -> Result<User, DomainError>;
}
