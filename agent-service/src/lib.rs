//! Template agent service: forwards prompts to the Anthropic Messages API and
//! returns a normalized result with cost and usage metadata.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
