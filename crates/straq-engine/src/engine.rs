//! Query orchestration

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use straq_core::{
    Citation, Error, GeneratedAnswer, GenerationConfig, GenerativeBackend, QueryContext,
    QueryResult, Result, RetryPolicy, SearchBackend,
};

use crate::{build_prompt, extract_citations, generate_grounded, reconcile_citations};

/// Canned answer for the zero-evidence outcome
pub const NO_DOCUMENTS_ANSWER: &str = "I couldn't find any relevant documents to answer your \
question. Please ensure documents have been uploaded for your strata scheme.";

/// Answer substituted when the pipeline fails after validation
const ERROR_ANSWER: &str = "I encountered an error processing your query. Please try again.";

/// End-to-end query pipeline over injected backends.
///
/// Stateless between queries; everything owned here is immutable
/// configuration, so one engine serves concurrent queries for any mix of
/// tenants without locking.
pub struct QueryEngine {
    search: Arc<dyn SearchBackend>,
    generator: Arc<dyn GenerativeBackend>,
    retry: RetryPolicy,
    generation: GenerationConfig,
}

enum PipelineOutcome {
    NoEvidence,
    Answered {
        generated: GeneratedAnswer,
        citations: Vec<Citation>,
        cited: Vec<Citation>,
    },
}

impl QueryEngine {
    /// Create an engine with default retry and generation settings
    pub fn new(search: Arc<dyn SearchBackend>, generator: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            search,
            generator,
            retry: RetryPolicy::default(),
            generation: GenerationConfig::default(),
        }
    }

    /// Override the retry policy applied to search calls
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the generation settings
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Answer one question against the tenant's corpus.
    ///
    /// Only `Error::BadInput` surfaces to the caller; every failure past
    /// validation degrades into the returned `QueryResult` with the detail
    /// recorded in its diagnostic field.
    pub async fn answer(&self, context: QueryContext) -> Result<QueryResult> {
        if context.question.trim().is_empty() {
            return Err(Error::BadInput("question must not be empty".to_string()));
        }
        if context.max_results == 0 {
            return Err(Error::BadInput("max_results must be positive".to_string()));
        }

        let started = Instant::now();

        let result = match self.run_pipeline(&context).await {
            Ok(PipelineOutcome::NoEvidence) => {
                info!(tenant_id = %context.tenant_id, "no relevant documents found");
                self.assemble(&context, started, NO_DOCUMENTS_ANSWER.to_string(), vec![], vec![], None)
            }
            Ok(PipelineOutcome::Answered {
                generated,
                citations,
                cited,
            }) => {
                info!(
                    tenant_id = %context.tenant_id,
                    total_sources = citations.len(),
                    cited_sources = cited.len(),
                    "query answered"
                );
                self.assemble(&context, started, generated.text, citations, cited, None)
            }
            Err(err) => {
                error!(tenant_id = %context.tenant_id, error = %err, "query pipeline failed");
                self.assemble(
                    &context,
                    started,
                    ERROR_ANSWER.to_string(),
                    vec![],
                    vec![],
                    Some(err.to_string()),
                )
            }
        };

        Ok(result)
    }

    async fn run_pipeline(&self, context: &QueryContext) -> Result<PipelineOutcome> {
        info!(
            tenant_id = %context.tenant_id,
            backend = self.search.name(),
            "searching documents"
        );
        let hits = self.retry.run(|| self.search.search(context)).await?;

        let citations = extract_citations(context, &hits);
        if citations.is_empty() {
            // Generation without grounding evidence is never attempted.
            return Ok(PipelineOutcome::NoEvidence);
        }

        let prompt = build_prompt(context, &citations);
        let generated = generate_grounded(self.generator.as_ref(), &prompt, &self.generation).await;
        let cited = reconcile_citations(&generated.text, &citations);

        Ok(PipelineOutcome::Answered {
            generated,
            citations,
            cited,
        })
    }

    fn assemble(
        &self,
        context: &QueryContext,
        started: Instant,
        answer: String,
        citations: Vec<Citation>,
        cited: Vec<Citation>,
        error: Option<String>,
    ) -> QueryResult {
        QueryResult {
            answer,
            total_sources: citations.len(),
            cited_sources: cited.len(),
            citations: cited,
            processing_time_ms: started.elapsed().as_millis() as u64,
            tenant_id: context.tenant_id.clone(),
            timestamp: Utc::now(),
            error,
        }
    }
}
