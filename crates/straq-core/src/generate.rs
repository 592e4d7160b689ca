//! Generative backend trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for answer generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    /// Low and fixed, favouring factual determinism over creativity
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-3-opus-20240229-v1:0".to_string(),
            max_tokens: 1000,
            temperature: 0.3,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Token accounting reported by the generative backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub model_id: String,
    pub temperature: f32,
}

/// Raw model output plus usage metrics, produced once per query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub text: String,
    pub usage: UsageMetrics,
}

/// Trait for text-generation backends
///
/// The engine calls this once per query with a fully grounded prompt. The
/// backend must support the deterministic low-temperature mode configured in
/// `GenerationConfig`.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate a completion for a single-turn prompt
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedAnswer>;

    /// Model identifier this backend invokes
    fn model_id(&self) -> &str;
}
