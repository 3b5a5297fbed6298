pub mod agent;
pub mod interpreter;
pub mod providers;

pub use agent::{Agent, AgentError};
