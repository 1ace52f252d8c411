//! Onboarding module - user profile fields captured at onboarding.
//!
//! # Domain Invariants
//!
//! 1. `industry` stays null until onboarding completes
//! 2. A non-null `industry` references an existing industry insight
//! 3. Input is normalized before any storage access; invalid input mutates nothing

mod input;
mod user;

pub use input::{
    ExperienceInput, OnboardingInput, OnboardingUpdate, SkillsInput, MAX_BIO_LEN,
    MAX_EXPERIENCE_YEARS, MAX_SKILLS,
};
pub use user::User;
