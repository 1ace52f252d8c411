//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Transactional Ports
//!
//! - `UnitOfWork` - Opens, commits and rolls back transactions
//! - `IndustryInsightRepository` - Insight lookups and atomic insert-if-absent
//! - `UserRepository` - User lookups and onboarding writes
//!
//! Both repositories are generic over the unit of work's transaction handle.
//!
//! ## Other Ports
//!
//! - `UserReader` - Non-transactional onboarding status queries
//! - `SessionValidator` - Bearer token validation
//! - `AIProvider` - Chat-completion backend
//! - `InsightGenerator` - Produces insight content for an industry
//! - `ViewInvalidator` - Marks cached read views stale

mod ai_provider;
mod industry_insight_repository;
mod insight_generator;
mod session_validator;
mod unit_of_work;
mod user_reader;
mod user_repository;
mod view_invalidator;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole,
};
pub use industry_insight_repository::{IndustryInsightRepository, InsertOutcome};
pub use insight_generator::{GenerationError, InsightGenerator};
pub use session_validator::SessionValidator;
pub use unit_of_work::UnitOfWork;
pub use user_reader::{OnboardingState, UserReader};
pub use user_repository::UserRepository;
pub use view_invalidator::{CachedView, InvalidationError, ViewInvalidator};
