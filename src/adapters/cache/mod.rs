//! View invalidation adapters.
//!
//! - `RedisViewInvalidator` - production, deletes cached view keys
//! - `NoopViewInvalidator` - production without Redis, logs and drops calls
//! - `InMemoryViewInvalidator` - tests, records every call

mod in_memory;
mod noop;
mod redis;

pub use self::redis::RedisViewInvalidator;
pub use in_memory::InMemoryViewInvalidator;
pub use noop::NoopViewInvalidator;
