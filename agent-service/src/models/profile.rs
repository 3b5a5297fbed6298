//! Static identity advertised by the root and info endpoints.

pub const SERVICE_NAME: &str = "Mindra Rust Agent";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const AGENT_ID: &str = "agent-rust-template";
pub const AGENT_NAME: &str = "Rust Template Agent";
pub const AGENT_DESCRIPTION: &str = "Template for building Rust-based agents";
pub const AGENT_CAPABILITIES: [&str; 3] =
    ["Data analysis", "Insight generation", "Custom processing"];

/// Rough per-run cost quoted to callers, not derived from live usage.
pub const ESTIMATED_COST: f64 = 0.45;
pub const CURRENCY: &str = "USD";
