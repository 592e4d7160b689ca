//! Generative backend client for the strata query engine
//!
//! Wraps a hosted messages-style text-generation API behind the
//! `GenerativeBackend` trait, with fixed low-temperature settings and a
//! bounded output-token budget.

mod client;
mod config;

pub use client::GenerativeClient;
pub use config::LlmConfig;

// Re-export core types for convenience
pub use straq_core::{GeneratedAnswer, GenerationConfig, GenerativeBackend, UsageMetrics};
