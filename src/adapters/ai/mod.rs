//! AI adapters.
//!
//! - `OpenAIProvider` - OpenAI-compatible chat completions with retry/backoff
//! - `MockAIProvider` - queued responses for tests
//! - `LlmInsightGenerator` - `InsightGenerator` on top of any `AIProvider`
//! - `DisabledInsightGenerator` - always fails, forcing default insight content

mod llm_insight_generator;
mod mock_provider;
mod openai_provider;

pub use llm_insight_generator::{DisabledInsightGenerator, LlmInsightGenerator};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
