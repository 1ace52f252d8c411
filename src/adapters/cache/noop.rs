//! View invalidator for deployments without a shared cache.
//!
//! Nothing is cached outside the process, so there is nothing to evict. Calls
//! are logged and dropped; no state is kept.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::ExternalIdentityId;
use crate::ports::{CachedView, InvalidationError, ViewInvalidator};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewInvalidator;

impl NoopViewInvalidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ViewInvalidator for NoopViewInvalidator {
    async fn invalidate(
        &self,
        identity: &ExternalIdentityId,
        view: CachedView,
    ) -> Result<(), InvalidationError> {
        debug!(identity = %identity, %view, "no shared cache configured, skipping invalidation");
        Ok(())
    }
}
