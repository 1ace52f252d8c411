//! Request and response bodies for the onboarding endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::onboarding::{ExperienceInput, OnboardingInput, SkillsInput, User};

/// POST /api/onboarding body.
///
/// `experience` may be a number or numeric text; `skills` may be a list or a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteOnboardingRequest {
    pub industry: String,
    #[serde(default)]
    pub experience: Option<ExperienceInput>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

impl From<CompleteOnboardingRequest> for OnboardingInput {
    fn from(req: CompleteOnboardingRequest) -> Self {
        OnboardingInput {
            industry: req.industry,
            experience: req.experience,
            bio: req.bio,
            skills: req.skills,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub industry: Option<String>,
    pub experience: Option<u32>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            industry: user.industry().map(|k| k.as_str().to_string()),
            experience: user.experience(),
            bio: user.bio().map(str::to_string),
            skills: user.skills().to_vec(),
            updated_at: user.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// `{ success, user }` on success, `{ success: false, error }` otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OnboardingResponse {
    pub fn ok(user: &User) -> Self {
        Self {
            success: true,
            user: Some(user.into()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(message.into()),
        }
    }
}
