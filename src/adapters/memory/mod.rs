//! In-memory storage adapters for tests and local development.

mod database;

pub use database::{InMemoryDatabase, InMemoryTx};
