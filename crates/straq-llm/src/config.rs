//! Generative backend configuration

use serde::{Deserialize, Serialize};
use std::env;
use straq_core::{Error, GenerationConfig, Result};

/// Configuration for the generative backend client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model_id: String,
}

impl LlmConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("LLM_API_URL").map_err(|_| {
            Error::Configuration("LLM_API_URL environment variable not found".to_string())
        })?;

        let api_key = env::var("LLM_API_KEY").map_err(|_| {
            Error::Configuration("LLM_API_KEY environment variable not found".to_string())
        })?;

        let model_id = env::var("LLM_MODEL_ID")
            .unwrap_or_else(|_| GenerationConfig::default().model_id);

        Ok(Self {
            api_url,
            api_key,
            model_id,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model_id: GenerationConfig::default().model_id,
        }
    }
}
