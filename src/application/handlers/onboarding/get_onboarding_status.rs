//! GetOnboardingStatus - Query handler for whether the caller has onboarded.
//!
//! Never fails: anonymous callers and unknown profiles are simply not
//! onboarded, and lookup failures are reported in `error`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::domain::foundation::AuthenticatedUser;
use crate::ports::UserReader;

#[derive(Debug, Clone)]
pub struct GetOnboardingStatusQuery {
    pub caller: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OnboardingStatus {
    fn not_onboarded() -> Self {
        Self {
            is_onboarded: false,
            error: None,
        }
    }
}

pub struct GetOnboardingStatusHandler {
    reader: Arc<dyn UserReader>,
}

impl GetOnboardingStatusHandler {
    pub fn new(reader: Arc<dyn UserReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetOnboardingStatusQuery) -> OnboardingStatus {
        let Some(caller) = query.caller else {
            debug!("onboarding status requested anonymously");
            return OnboardingStatus::not_onboarded();
        };

        match self.reader.onboarding_state(&caller.identity).await {
            Ok(Some(state)) => OnboardingStatus {
                is_onboarded: state.is_onboarded(),
                error: None,
            },
            Ok(None) => {
                debug!(identity = %caller.identity, "no profile for caller");
                OnboardingStatus::not_onboarded()
            }
            Err(err) => {
                error!(identity = %caller.identity, error = %err, "failed to check onboarding status");
                OnboardingStatus {
                    is_onboarded: false,
                    error: Some("Failed to check onboarding status".to_string()),
                }
            }
        }
    }
}
