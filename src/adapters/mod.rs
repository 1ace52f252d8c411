//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language model providers and the insight generator
//! - `auth` - Session validation (OIDC, mock)
//! - `cache` - Cached view invalidation (Redis, no-op, recording)
//! - `http` - REST API (axum)
//! - `memory` - In-memory transactional store for tests and local runs
//! - `postgres` - PostgreSQL repositories and unit of work

pub mod ai;
pub mod auth;
pub mod cache;
pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryDatabase, InMemoryTx};
