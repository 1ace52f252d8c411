//! IndustryInsight aggregate and its content value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

use super::IndustryKey;

/// Days between creation and the scheduled refresh of an insight.
pub const DEFAULT_REFRESH_DAYS: i64 = 7;

/// Upper bound on entries in any generated list.
const MAX_LIST_ENTRIES: usize = 50;

/// Market demand for an industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandLevel::Low => "LOW",
            DemandLevel::Medium => "MEDIUM",
            DemandLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(DemandLevel::Low),
            "MEDIUM" => Ok(DemandLevel::Medium),
            "HIGH" => Ok(DemandLevel::High),
            other => Err(ValidationError::invalid_format(
                "demand_level",
                format!("unknown demand level '{}'", other),
            )),
        }
    }
}

/// Overall market outlook for an industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

impl MarketOutlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOutlook::Positive => "POSITIVE",
            MarketOutlook::Neutral => "NEUTRAL",
            MarketOutlook::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for MarketOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketOutlook {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(MarketOutlook::Positive),
            "NEUTRAL" => Ok(MarketOutlook::Neutral),
            "NEGATIVE" => Ok(MarketOutlook::Negative),
            other => Err(ValidationError::invalid_format(
                "market_outlook",
                format!("unknown market outlook '{}'", other),
            )),
        }
    }
}

/// Salary band for one role within an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub location: String,
}

impl SalaryRange {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.role.trim().is_empty() {
            return Err(ValidationError::empty_field("salary_ranges.role"));
        }
        let values = [self.min, self.median, self.max];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ValidationError::invalid_format(
                "salary_ranges",
                format!("non-finite or negative salary for role '{}'", self.role),
            ));
        }
        if !(self.min <= self.median && self.median <= self.max) {
            return Err(ValidationError::invalid_format(
                "salary_ranges",
                format!("expected min <= median <= max for role '{}'", self.role),
            ));
        }
        Ok(())
    }
}

/// Whether insight content came from the generator or the fallback defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightOrigin {
    Generated,
    Default,
}

impl InsightOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightOrigin::Generated => "GENERATED",
            InsightOrigin::Default => "DEFAULT",
        }
    }
}

impl FromStr for InsightOrigin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GENERATED" => Ok(InsightOrigin::Generated),
            "DEFAULT" => Ok(InsightOrigin::Default),
            other => Err(ValidationError::invalid_format(
                "origin",
                format!("unknown insight origin '{}'", other),
            )),
        }
    }
}

/// The generated (or defaulted) body of an industry insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightContent {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub recommended_skills: Vec<String>,
    pub key_trends: Vec<String>,
}

impl InsightContent {
    /// Content used when generation fails.
    pub fn fallback() -> Self {
        Self {
            salary_ranges: Vec::new(),
            growth_rate: 0.0,
            demand_level: DemandLevel::Medium,
            top_skills: Vec::new(),
            market_outlook: MarketOutlook::Neutral,
            recommended_skills: Vec::new(),
            key_trends: Vec::new(),
        }
    }

    /// Checks content from an untrusted source before it is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.growth_rate.is_finite() || !(-100.0..=1000.0).contains(&self.growth_rate) {
            return Err(ValidationError::invalid_format(
                "growth_rate",
                format!("{} is not a plausible percentage", self.growth_rate),
            ));
        }
        if self.salary_ranges.len() > MAX_LIST_ENTRIES {
            return Err(ValidationError::too_long("salary_ranges", MAX_LIST_ENTRIES));
        }
        for range in &self.salary_ranges {
            range.validate()?;
        }
        validate_list("top_skills", &self.top_skills)?;
        validate_list("recommended_skills", &self.recommended_skills)?;
        validate_list("key_trends", &self.key_trends)?;
        Ok(())
    }
}

fn validate_list(field: &str, items: &[String]) -> Result<(), ValidationError> {
    if items.len() > MAX_LIST_ENTRIES {
        return Err(ValidationError::too_long(field, MAX_LIST_ENTRIES));
    }
    if items.iter().any(|s| s.trim().is_empty()) {
        return Err(ValidationError::invalid_format(field, "contains a blank entry"));
    }
    Ok(())
}

/// The single canonical insight record for an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryInsight {
    industry: IndustryKey,
    content: InsightContent,
    origin: InsightOrigin,
    last_updated: Timestamp,
    next_update: Timestamp,
}

impl IndustryInsight {
    /// Creates a fresh record whose refresh is due `refresh_days` after `now`.
    pub fn new(
        industry: IndustryKey,
        content: InsightContent,
        origin: InsightOrigin,
        now: Timestamp,
        refresh_days: i64,
    ) -> Self {
        Self {
            industry,
            content,
            origin,
            last_updated: now,
            next_update: now.add_days(refresh_days),
        }
    }

    /// Rebuilds a record loaded from storage.
    pub fn reconstitute(
        industry: IndustryKey,
        content: InsightContent,
        origin: InsightOrigin,
        last_updated: Timestamp,
        next_update: Timestamp,
    ) -> Self {
        Self {
            industry,
            content,
            origin,
            last_updated,
            next_update,
        }
    }

    pub fn industry(&self) -> &IndustryKey {
        &self.industry
    }

    pub fn content(&self) -> &InsightContent {
        &self.content
    }

    pub fn origin(&self) -> InsightOrigin {
        self.origin
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    pub fn next_update(&self) -> Timestamp {
        self.next_update
    }
}
