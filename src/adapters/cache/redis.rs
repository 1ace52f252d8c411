//! Redis-backed view invalidation.
//!
//! Cached views are stored under `view:{view}:{identity}`. Invalidation deletes
//! the key; the next read rebuilds it.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use crate::domain::foundation::ExternalIdentityId;
use crate::ports::{CachedView, InvalidationError, ViewInvalidator};

#[derive(Clone)]
pub struct RedisViewInvalidator {
    conn: MultiplexedConnection,
}

impl RedisViewInvalidator {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connect to `url` and build an invalidator on a multiplexed connection.
    pub async fn connect(url: &str) -> Result<Self, InvalidationError> {
        let client =
            redis::Client::open(url).map_err(|e| InvalidationError(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| InvalidationError(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

pub(crate) fn view_key(identity: &ExternalIdentityId, view: CachedView) -> String {
    format!("view:{}:{}", view.as_str(), identity.as_str())
}

#[async_trait]
impl ViewInvalidator for RedisViewInvalidator {
    async fn invalidate(
        &self,
        identity: &ExternalIdentityId,
        view: CachedView,
    ) -> Result<(), InvalidationError> {
        let key = view_key(identity, view);
        let mut conn = self.conn.clone();

        let removed: i64 = conn
            .del(&key)
            .await
            .map_err(|e: redis::RedisError| InvalidationError(e.to_string()))?;

        debug!(key = %key, removed, "invalidated cached view");
        Ok(())
    }
}
