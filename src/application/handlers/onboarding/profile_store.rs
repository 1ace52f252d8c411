//! UserProfileStore - resolves users and writes onboarding fields.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, ExternalIdentityId, UserId};
use crate::domain::onboarding::{OnboardingUpdate, User};
use crate::ports::UserRepository;

pub struct UserProfileStore<Tx: Send + 'static> {
    repository: Arc<dyn UserRepository<Tx>>,
}

impl<Tx: Send + 'static> UserProfileStore<Tx> {
    pub fn new(repository: Arc<dyn UserRepository<Tx>>) -> Self {
        Self { repository }
    }

    /// Resolve the caller to a user inside `tx`, failing with NotFound.
    pub async fn resolve(
        &self,
        tx: &mut Tx,
        identity: &ExternalIdentityId,
    ) -> Result<User, DomainError> {
        self.repository
            .find_by_external_identity(tx, identity)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::NotFound, "User profile not found")
                    .with_detail("identity", identity.as_str())
            })
    }

    /// Attach the industry and the other onboarding fields.
    ///
    /// The insight for `update.industry` must already be visible in `tx`.
    pub async fn apply_onboarding(
        &self,
        tx: &mut Tx,
        user_id: &UserId,
        update: &OnboardingUpdate,
    ) -> Result<User, DomainError> {
        let user = self.repository.apply_onboarding(tx, user_id, update).await?;
        debug!(
            user_id = %user_id,
            industry = %update.industry,
            skills = update.skills.len(),
            "updated user onboarding fields"
        );
        Ok(user)
    }
}
