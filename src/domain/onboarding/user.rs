//! User profile entity as seen by onboarding.

use serde::Serialize;

use crate::domain::foundation::{ExternalIdentityId, Timestamp, UserId};
use crate::domain::insight::IndustryKey;

use super::OnboardingUpdate;

/// A user record. Provisioned by the identity subsystem; onboarding only
/// writes `industry`, `experience`, `bio` and `skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    external_identity_id: ExternalIdentityId,
    email: Option<String>,
    industry: Option<IndustryKey>,
    experience: Option<u32>,
    bio: Option<String>,
    skills: Vec<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl User {
    /// A freshly provisioned user that has not been onboarded.
    pub fn provision(external_identity_id: ExternalIdentityId, email: Option<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::new(),
            external_identity_id,
            email,
            industry: None,
            experience: None,
            bio: None,
            skills: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a user loaded from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        external_identity_id: ExternalIdentityId,
        email: Option<String>,
        industry: Option<IndustryKey>,
        experience: Option<u32>,
        bio: Option<String>,
        skills: Vec<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            external_identity_id,
            email,
            industry,
            experience,
            bio,
            skills,
            created_at,
            updated_at,
        }
    }

    /// Writes the four onboarding fields and bumps `updated_at`.
    pub fn apply_onboarding(&mut self, update: &OnboardingUpdate, now: Timestamp) {
        self.industry = Some(update.industry.clone());
        self.experience = update.experience;
        self.bio = update.bio.clone();
        self.skills = update.skills.clone();
        self.updated_at = now;
    }

    pub fn is_onboarded(&self) -> bool {
        self.industry.is_some()
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn external_identity_id(&self) -> &ExternalIdentityId {
        &self.external_identity_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn industry(&self) -> Option<&IndustryKey> {
        self.industry.as_ref()
    }

    pub fn experience(&self) -> Option<u32> {
        self.experience
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ExternalIdentityId {
        ExternalIdentityId::new("user_abc").unwrap()
    }

    #[test]
    fn provisioned_user_is_not_onboarded() {
        let user = User::provision(identity(), None);
        assert!(!user.is_onboarded());
        assert!(user.skills().is_empty());
    }

    #[test]
    fn apply_onboarding_touches_only_profile_fields() {
        let mut user = User::provision(identity(), Some("a@example.com".to_string()));
        let before = user.clone();
        let later = before.updated_at().add_days(1);

        user.apply_onboarding(
            &OnboardingUpdate {
                industry: IndustryKey::new("Tech").unwrap(),
                experience: Some(3),
                bio: Some("hi".to_string()),
                skills: vec!["Go".to_string(), "Rust".to_string()],
            },
            later,
        );

        assert!(user.is_onboarded());
        assert_eq!(user.industry().map(IndustryKey::as_str), Some("Tech"));
        assert_eq!(user.experience(), Some(3));
        assert_eq!(user.bio(), Some("hi"));
        assert_eq!(user.skills(), ["Go".to_string(), "Rust".to_string()]);
        assert_eq!(user.updated_at(), later);

        assert_eq!(user.id(), before.id());
        assert_eq!(user.external_identity_id(), before.external_identity_id());
        assert_eq!(user.email(), before.email());
        assert_eq!(user.created_at(), before.created_at());
    }
}
