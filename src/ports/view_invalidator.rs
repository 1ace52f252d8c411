//! ViewInvalidator port - marks cached read views stale after a commit.
//!
//! Invalidation is best effort: callers log failures and carry on.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::ExternalIdentityId;

/// A cached read view that depends on a user's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachedView {
    /// Landing page, which reads onboarding status.
    Home,
    /// Industry insights dashboard.
    Dashboard,
}

impl CachedView {
    /// Every view that reads a user's onboarding state.
    pub const ALL: [CachedView; 2] = [CachedView::Home, CachedView::Dashboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            CachedView::Home => "home",
            CachedView::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for CachedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("view invalidation failed: {0}")]
pub struct InvalidationError(pub String);

#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn invalidate(
        &self,
        identity: &ExternalIdentityId,
        view: CachedView,
    ) -> Result<(), InvalidationError>;
}
