//! Messages-API generative client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use straq_core::{
    Error, GeneratedAnswer, GenerationConfig, GenerativeBackend, Result, UsageMetrics,
};

use crate::LlmConfig;

const API_VERSION: &str = "bedrock-2023-05-31";

/// HTTP client for a hosted messages-style generation API
pub struct GenerativeClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl GenerativeClient {
    /// Create a client with a dedicated HTTP connection pool
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::from_env()?)
    }

    async fn perform_generation(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedAnswer> {
        let request_body = MessagesRequest {
            anthropic_version: API_VERSION,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!(
            "{}/model/{}/invoke",
            self.config.api_url.trim_end_matches('/'),
            config.model_id
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "generation request failed with status {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Generation(
                "generation backend returned empty content".to_string(),
            ));
        }

        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "generation completed"
        );

        Ok(GeneratedAnswer {
            text,
            usage: UsageMetrics {
                input_tokens: parsed.usage.input_tokens,
                output_tokens: parsed.usage.output_tokens,
                model_id: config.model_id.clone(),
                temperature: config.temperature,
            },
        })
    }
}

#[async_trait]
impl GenerativeBackend for GenerativeClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedAnswer> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "generation exceeded {}s",
                config.timeout.as_secs()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}
