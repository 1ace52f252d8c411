//! IndustryKey value object - the natural key of an industry insight.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Stable industry identifier, e.g. `tech-software-development`.
///
/// Surrounding whitespace is trimmed; the remaining text is kept verbatim so
/// the key matches what the onboarding form submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndustryKey(String);

impl IndustryKey {
    pub const MAX_LEN: usize = 100;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("industry"));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::too_long("industry", Self::MAX_LEN));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::invalid_format(
                "industry",
                "must not contain control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndustryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IndustryKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IndustryKey> for String {
    fn from(key: IndustryKey) -> Self {
        key.0
    }
}
