//! Domain models for the agent service.

pub mod execution;
pub mod pricing;
pub mod profile;

pub use execution::{AgentResult, ExecutionResult, TextResult, TokenUsage};
pub use pricing::Pricing;
