//! Insight module - industry insight reference records.
//!
//! # Domain Invariants
//!
//! 1. Exactly one insight exists per industry key
//! 2. An existing insight is never regenerated by onboarding, even when stale
//! 3. `next_update` is always `last_updated` plus the refresh interval
//! 4. Generated content is validated before it is persisted

mod industry_key;
#[allow(clippy::module_inception)]
mod insight;

pub use industry_key::IndustryKey;
pub use insight::{
    DemandLevel, IndustryInsight, InsightContent, InsightOrigin, MarketOutlook, SalaryRange,
    DEFAULT_REFRESH_DAYS,
};
