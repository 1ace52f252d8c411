//! Recording view invalidator for tests.
//!
//! Keeps every invalidation so tests can assert on them. The log is never
//! trimmed, so servers use `NoopViewInvalidator` instead.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ExternalIdentityId;
use crate::ports::{CachedView, InvalidationError, ViewInvalidator};

#[derive(Debug, Clone, Default)]
pub struct InMemoryViewInvalidator {
    invalidated: Arc<RwLock<Vec<(ExternalIdentityId, CachedView)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryViewInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An invalidator whose every call fails.
    pub fn failing() -> Self {
        let invalidator = Self::default();
        invalidator.failing.store(true, Ordering::SeqCst);
        invalidator
    }

    /// Invalidations recorded so far, in call order.
    pub async fn invalidated(&self) -> Vec<(ExternalIdentityId, CachedView)> {
        self.invalidated.read().await.clone()
    }
}

#[async_trait]
impl ViewInvalidator for InMemoryViewInvalidator {
    async fn invalidate(
        &self,
        identity: &ExternalIdentityId,
        view: CachedView,
    ) -> Result<(), InvalidationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InvalidationError("cache unavailable".to_string()));
        }
        self.invalidated.write().await.push((identity.clone(), view));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_invalidations_in_order() {
        let invalidator = InMemoryViewInvalidator::new();
        let identity = ExternalIdentityId::new("ext-1").unwrap();

        invalidator.invalidate(&identity, CachedView::Home).await.unwrap();
        invalidator.invalidate(&identity, CachedView::Dashboard).await.unwrap();

        assert_eq!(
            invalidator.invalidated().await,
            vec![
                (identity.clone(), CachedView::Home),
                (identity, CachedView::Dashboard)
            ]
        );
    }

    #[tokio::test]
    async fn failing_invalidator_errors() {
        let invalidator = InMemoryViewInvalidator::failing();
        let identity = ExternalIdentityId::new("ext-1").unwrap();
        assert!(invalidator.invalidate(&identity, CachedView::Home).await.is_err());
    }
}
