//! Onboarding form input and its normalization.
//!
//! The form submits `skills` either as a list or as one comma-separated string,
//! and `experience` either as a number or as numeric text. Both shapes are
//! modelled as untagged unions and collapsed into an `OnboardingUpdate` before
//! any storage is touched.

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::insight::IndustryKey;

pub const MAX_EXPERIENCE_YEARS: i64 = 100;
pub const MAX_BIO_LEN: usize = 2000;
pub const MAX_SKILLS: usize = 50;

/// Years of experience as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExperienceInput {
    Years(i64),
    Text(String),
}

impl ExperienceInput {
    /// Converts to whole years, failing closed on anything non-numeric.
    pub fn normalize(&self) -> Result<u32, ValidationError> {
        let years = match self {
            ExperienceInput::Years(n) => *n,
            ExperienceInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::empty_field("experience"));
                }
                trimmed.parse::<i64>().map_err(|_| {
                    ValidationError::invalid_format(
                        "experience",
                        format!("'{}' is not a whole number of years", trimmed),
                    )
                })?
            }
        };

        if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
            return Err(ValidationError::out_of_range(
                "experience",
                0,
                MAX_EXPERIENCE_YEARS,
                years,
            ));
        }
        Ok(years as u32)
    }
}

/// Skills as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Delimited(String),
}

impl SkillsInput {
    /// Trims entries and drops blanks, preserving order. Duplicates are kept.
    pub fn normalize(&self) -> Result<Vec<String>, ValidationError> {
        let skills: Vec<String> = match self {
            SkillsInput::List(items) => clean(items.iter().map(String::as_str)),
            SkillsInput::Delimited(text) => clean(text.split(',')),
        };
        if skills.len() > MAX_SKILLS {
            return Err(ValidationError::too_long("skills", MAX_SKILLS));
        }
        Ok(skills)
    }
}

fn clean<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw onboarding submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OnboardingInput {
    pub industry: String,
    #[serde(default)]
    pub experience: Option<ExperienceInput>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

impl OnboardingInput {
    pub fn normalize(&self) -> Result<OnboardingUpdate, ValidationError> {
        let industry = IndustryKey::new(&self.industry)?;
        let experience = self
            .experience
            .as_ref()
            .map(ExperienceInput::normalize)
            .transpose()?;

        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(ValidationError::too_long("bio", MAX_BIO_LEN));
            }
        }

        let skills = match &self.skills {
            Some(skills) => skills.normalize()?,
            None => Vec::new(),
        };

        Ok(OnboardingUpdate {
            industry,
            experience,
            bio: self.bio.clone(),
            skills,
        })
    }
}

/// Validated profile fields written by onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingUpdate {
    pub industry: IndustryKey,
    pub experience: Option<u32>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(experience: Option<ExperienceInput>, skills: Option<SkillsInput>) -> OnboardingInput {
        OnboardingInput {
            industry: "Tech".to_string(),
            experience,
            bio: Some("hi".to_string()),
            skills,
        }
    }

    #[test]
    fn delimited_skills_are_split_trimmed_and_compacted() {
        let skills = SkillsInput::Delimited("Python, SQL ,  , Excel".to_string());
        assert_eq!(skills.normalize().unwrap(), vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn list_skills_keep_order_and_duplicates() {
        let skills = SkillsInput::List(vec![
            "Go".to_string(),
            " ".to_string(),
            "Rust".to_string(),
            "Go".to_string(),
        ]);
        assert_eq!(skills.normalize().unwrap(), vec!["Go", "Rust", "Go"]);
    }

    #[test]
    fn too_many_skills_rejected() {
        let skills = SkillsInput::List((0..=MAX_SKILLS).map(|i| format!("s{}", i)).collect());
        assert!(skills.normalize().is_err());
    }

    #[test]
    fn numeric_text_experience_parses() {
        assert_eq!(ExperienceInput::Text("5".to_string()).normalize().unwrap(), 5);
        assert_eq!(ExperienceInput::Text(" 12 ".to_string()).normalize().unwrap(), 12);
        assert_eq!(ExperienceInput::Years(3).normalize().unwrap(), 3);
    }

    #[test]
    fn non_numeric_experience_fails_closed() {
        let err = ExperienceInput::Text("abc".to_string()).normalize().unwrap_err();
        assert_eq!(err.field(), "experience");
        assert!(ExperienceInput::Text("5 years".to_string()).normalize().is_err());
        assert!(ExperienceInput::Text("".to_string()).normalize().is_err());
    }

    #[test]
    fn negative_experience_rejected() {
        assert!(ExperienceInput::Years(-1).normalize().is_err());
        assert!(ExperienceInput::Text("-2".to_string()).normalize().is_err());
    }

    #[test]
    fn experience_above_limit_rejected() {
        assert!(ExperienceInput::Years(MAX_EXPERIENCE_YEARS + 1).normalize().is_err());
    }

    #[test]
    fn deserializes_both_shapes() {
        let json = r#"{"industry":"Tech","experience":"3","bio":"hi","skills":"Go,Rust"}"#;
        let parsed: OnboardingInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.experience, Some(ExperienceInput::Text("3".to_string())));
        assert_eq!(parsed.skills, Some(SkillsInput::Delimited("Go,Rust".to_string())));

        let json = r#"{"industry":"Tech","experience":3,"skills":["Go","Rust"]}"#;
        let parsed: OnboardingInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.experience, Some(ExperienceInput::Years(3)));
        assert_eq!(
            parsed.skills,
            Some(SkillsInput::List(vec!["Go".to_string(), "Rust".to_string()]))
        );
        assert_eq!(parsed.bio, None);
    }

    #[test]
    fn normalize_builds_update() {
        let update = input(
            Some(ExperienceInput::Text("3".to_string())),
            Some(SkillsInput::Delimited("Go,Rust".to_string())),
        )
        .normalize()
        .unwrap();

        assert_eq!(update.industry.as_str(), "Tech");
        assert_eq!(update.experience, Some(3));
        assert_eq!(update.bio.as_deref(), Some("hi"));
        assert_eq!(update.skills, vec!["Go", "Rust"]);
    }

    #[test]
    fn normalize_allows_missing_optional_fields() {
        let update = input(None, None).normalize().unwrap();
        assert_eq!(update.experience, None);
        assert!(update.skills.is_empty());
    }

    #[test]
    fn normalize_rejects_blank_industry() {
        let mut raw = input(None, None);
        raw.industry = "  ".to_string();
        assert_eq!(raw.normalize().unwrap_err().field(), "industry");
    }

    #[test]
    fn normalize_rejects_overlong_bio() {
        let mut raw = input(None, None);
        raw.bio = Some("x".repeat(MAX_BIO_LEN + 1));
        assert_eq!(raw.normalize().unwrap_err().field(), "bio");
    }

    proptest! {
        #[test]
        fn delimited_normalization_never_yields_blank_or_padded_entries(text in "[a-zA-Z ,]{0,64}") {
            let skills = SkillsInput::Delimited(text).normalize().unwrap();
            for skill in &skills {
                prop_assert!(!skill.is_empty());
                prop_assert_eq!(skill.trim(), skill.as_str());
                prop_assert!(!skill.contains(','));
            }
        }

        #[test]
        fn joining_a_clean_list_round_trips(items in proptest::collection::vec("[a-zA-Z]{1,8}", 0..10)) {
            let joined = items.join(", ");
            let skills = SkillsInput::Delimited(joined).normalize().unwrap();
            prop_assert_eq!(skills, items);
        }

        #[test]
        fn numeric_text_matches_integer_form(years in 0i64..=MAX_EXPERIENCE_YEARS) {
            let from_text = ExperienceInput::Text(years.to_string()).normalize().unwrap();
            let from_int = ExperienceInput::Years(years).normalize().unwrap();
            prop_assert_eq!(from_text, from_int);
        }
    }
}
