//! Graceful answer generation
//!
//! Retrieval work already done should not be wasted on a generation outage,
//! so failures here degrade to a fallback answer instead of propagating.

use tracing::error;

use straq_core::{GeneratedAnswer, GenerationConfig, GenerativeBackend, UsageMetrics};

/// Safe answer substituted when the generative backend fails
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I'm unable to generate a response at this time.";

/// Invoke the generative backend, degrading to the fallback answer on failure
pub async fn generate_grounded(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    config: &GenerationConfig,
) -> GeneratedAnswer {
    match backend.generate(prompt, config).await {
        Ok(answer) => answer,
        Err(err) => {
            error!(error = %err, model_id = backend.model_id(), "generation failed");
            GeneratedAnswer {
                text: FALLBACK_ANSWER.to_string(),
                usage: UsageMetrics::default(),
            }
        }
    }
}
