//! UTC instants used for insight refresh scheduling and profile audit fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A point in time, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Signed: negative when `earlier` is actually later than `self`.
    pub fn duration_since(&self, earlier: &Timestamp) -> Duration {
        self.0.signed_duration_since(earlier.0)
    }

    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> Timestamp {
        let dt = DateTime::parse_from_rfc3339(rfc3339).unwrap();
        Timestamp::from_datetime(dt.with_timezone(&Utc))
    }

    #[test]
    fn refresh_date_crosses_month_boundary() {
        let created = at("2024-01-29T09:00:00Z");
        let due = created.add_days(7);

        assert_eq!(due, at("2024-02-05T09:00:00Z"));
        assert_eq!(due.duration_since(&created).num_days(), 7);
        assert!(created.duration_since(&due) < Duration::zero());
    }

    #[test]
    fn serializes_as_bare_rfc3339_string() {
        let json = serde_json::to_string(&at("2024-01-15T10:30:00Z")).unwrap();
        assert_eq!(json, "\"2024-01-15T10:30:00Z\"");
    }
}
