//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `insight` - Industry insight records and their content
//! - `onboarding` - User profile fields and onboarding input normalization

pub mod foundation;
pub mod insight;
pub mod onboarding;
