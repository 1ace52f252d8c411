//! Career Coach - profile onboarding backend
//!
//! Completing onboarding attaches a user to an industry and guarantees a
//! market insight exists for that industry, generating one with an LLM (or
//! falling back to defaults) inside the same transaction.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
