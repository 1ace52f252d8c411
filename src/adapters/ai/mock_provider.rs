//! Mock AI Provider for testing.
//!
//! Returns queued responses in order, can simulate latency, and records every
//! request so tests can inspect the prompts that were sent.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response(r#"{"growthRate": 4.5, ...}"#)
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success { content: String },
    /// Content cut off at the token limit
    Truncated { content: String },
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// Mock AI provider. Clones share the response queue and call log.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    default_response: Option<String>,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful completion.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        locked(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
        });
        self
    }

    /// Queue a completion that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        locked(&self.responses).push_back(MockResponse::Truncated {
            content: content.into(),
        });
        self
    }

    /// Queue an error.
    pub fn with_error(self, error: MockError) -> Self {
        locked(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Content returned once the queue is empty. Without it an empty queue
    /// yields `AIError::Unavailable`.
    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = Some(content.into());
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        locked(&self.calls).clone()
    }

    fn next_response(&self) -> Option<MockResponse> {
        locked(&self.responses).pop_front().or_else(|| {
            self.default_response
                .clone()
                .map(|content| MockResponse::Success { content })
        })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        locked(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            Some(MockResponse::Success { content }) => Ok(CompletionResponse {
                content,
                model: "mock-model-1".to_string(),
                finish_reason: FinishReason::Stop,
            }),
            Some(MockResponse::Truncated { content }) => Ok(CompletionResponse {
                content,
                model: "mock-model-1".to_string(),
                finish_reason: FinishReason::Length,
            }),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Err(AIError::unavailable("mock provider has no queued response")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let provider = MockAIProvider::new()
            .with_response("first")
            .with_error(MockError::AuthenticationFailed)
            .with_response("second");

        let req = || CompletionRequest::new().with_message(MessageRole::User, "hi");

        assert_eq!(provider.complete(req()).await.unwrap().content, "first");
        assert!(matches!(
            provider.complete(req()).await,
            Err(AIError::AuthenticationFailed)
        ));
        assert_eq!(provider.complete(req()).await.unwrap().content, "second");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_queue_is_unavailable_unless_defaulted() {
        let empty = MockAIProvider::new();
        assert!(empty.complete(CompletionRequest::new()).await.is_err());

        let defaulted = MockAIProvider::new().with_default_response("{}");
        assert_eq!(defaulted.complete(CompletionRequest::new()).await.unwrap().content, "{}");
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockAIProvider::new().with_response("ok");
        provider
            .complete(CompletionRequest::new().with_message(MessageRole::User, "Fintech"))
            .await
            .unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls[0].messages[0].content, "Fintech");
    }
}
