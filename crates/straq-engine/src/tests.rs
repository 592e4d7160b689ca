//! Pipeline tests over mock backends

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use straq_core::{
    ConfidenceBucket, Error, GeneratedAnswer, GenerativeBackend, GenerationConfig, QueryContext,
    RelevanceSignal, Result, RetryPolicy, SearchBackend, SearchHit, UsageMetrics,
};

use crate::{FALLBACK_ANSWER, NO_DOCUMENTS_ANSWER, QueryEngine};

/// Search mock that throttles a fixed number of leading calls, then serves hits
struct ScriptedSearch {
    hits: Vec<SearchHit>,
    throttle_first: u32,
    calls: AtomicU32,
}

impl ScriptedSearch {
    fn serving(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            throttle_first: 0,
            calls: AtomicU32::new(0),
        })
    }

    fn throttling(hits: Vec<SearchHit>, throttle_first: u32) -> Arc<Self> {
        Arc::new(Self {
            hits,
            throttle_first,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn search(&self, _context: &QueryContext) -> Result<Vec<SearchHit>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.throttle_first {
            return Err(Error::Throttled("rate exceeded".to_string()));
        }
        Ok(self.hits.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Search mock that always fails fatally
struct BrokenSearch;

#[async_trait]
impl SearchBackend for BrokenSearch {
    async fn search(&self, _context: &QueryContext) -> Result<Vec<SearchHit>> {
        Err(Error::BackendUnavailable("index deleted".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Generator mock returning a fixed reply and counting invocations
struct ScriptedGenerator {
    reply: String,
    calls: AtomicU32,
}

impl ScriptedGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedAnswer {
            text: self.reply.clone(),
            usage: UsageMetrics {
                input_tokens: 240,
                output_tokens: 80,
                model_id: config.model_id.clone(),
                temperature: config.temperature,
            },
        })
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }
}

/// Generator mock that always fails
struct FailingGenerator;

#[async_trait]
impl GenerativeBackend for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<GeneratedAnswer> {
        Err(Error::Generation("model endpoint unreachable".to_string()))
    }

    fn model_id(&self) -> &str {
        "failing-model"
    }
}

fn bucket_hit(id: &str, bucket: ConfidenceBucket, tenant: &str) -> SearchHit {
    SearchHit {
        document_id: id.to_string(),
        title: format!("Title {id}"),
        excerpt: format!("Excerpt {id}"),
        relevance: RelevanceSignal::Bucket(bucket),
        attributes: [
            ("tenant_id".to_string(), tenant.to_string()),
            (
                "source_uri".to_string(),
                format!("s3://docs/{id}.pdf"),
            ),
        ]
        .into_iter()
        .collect(),
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1))
}

#[tokio::test]
async fn zero_hits_short_circuits_without_generation() {
    let search = ScriptedSearch::serving(vec![]);
    let generator = ScriptedGenerator::replying("should never run");
    let engine = QueryEngine::new(search.clone(), generator.clone());

    let result = engine
        .answer(QueryContext::new("What is the quorum?", "T1"))
        .await
        .unwrap();

    assert_eq!(result.answer, NO_DOCUMENTS_ANSWER);
    assert!(result.citations.is_empty());
    assert_eq!(result.total_sources, 0);
    assert_eq!(result.cited_sources, 0);
    assert!(result.error.is_none());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn answers_agm_quorum_question_end_to_end() {
    let search = ScriptedSearch::serving(vec![
        bucket_hit("by-laws", ConfidenceBucket::High, "T1"),
        bucket_hit("minutes", ConfidenceBucket::Medium, "T1"),
    ]);
    let generator = ScriptedGenerator::replying(
        "The quorum for an AGM is one quarter of entitled voters [Document 1].",
    );
    let engine = QueryEngine::new(search, generator.clone());

    let result = engine
        .answer(QueryContext::new("What is the quorum for an AGM?", "T1"))
        .await
        .unwrap();

    assert_eq!(result.total_sources, 2);
    assert_eq!(result.cited_sources, 1);
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].document_id, "by-laws");
    assert_eq!(result.citations[0].confidence, 0.8);
    assert_eq!(result.tenant_id, "T1");
    assert!(result.error.is_none());
    assert!(result.cited_sources <= result.total_sources);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn foreign_tenant_hits_never_become_citations() {
    // A backend that is not perfectly selective must still not leak.
    let search = ScriptedSearch::serving(vec![
        bucket_hit("leaked-1", ConfidenceBucket::VeryHigh, "T2"),
        bucket_hit("leaked-2", ConfidenceBucket::High, "T2"),
    ]);
    let generator = ScriptedGenerator::replying("grounded in [Document 1]");
    let engine = QueryEngine::new(search, generator.clone());

    let result = engine
        .answer(QueryContext::new("question", "T1"))
        .await
        .unwrap();

    assert_eq!(result.answer, NO_DOCUMENTS_ANSWER);
    assert_eq!(result.total_sources, 0);
    assert!(result.citations.is_empty());
    // No grounding evidence, so generation was skipped entirely.
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn recovers_after_two_throttled_search_attempts() {
    let search = ScriptedSearch::throttling(
        vec![bucket_hit("doc", ConfidenceBucket::High, "T1")],
        2,
    );
    let generator = ScriptedGenerator::replying("see [Document 1]");
    let engine =
        QueryEngine::new(search.clone(), generator).with_retry_policy(fast_retry());

    let result = engine
        .answer(QueryContext::new("question", "T1"))
        .await
        .unwrap();

    assert_eq!(search.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.total_sources, 1);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn exhausted_retries_degrade_with_diagnostic() {
    let search = ScriptedSearch::throttling(vec![], u32::MAX);
    let generator = ScriptedGenerator::replying("unused");
    let engine =
        QueryEngine::new(search.clone(), generator.clone()).with_retry_policy(fast_retry());

    let result = engine
        .answer(QueryContext::new("question", "T1"))
        .await
        .unwrap();

    assert_eq!(search.calls.load(Ordering::SeqCst), 3);
    assert!(result.error.as_deref().unwrap().contains("throttled"));
    assert!(result.citations.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fatal_search_failure_degrades_instead_of_throwing() {
    let engine = QueryEngine::new(
        Arc::new(BrokenSearch),
        ScriptedGenerator::replying("unused"),
    );

    let result = engine
        .answer(QueryContext::new("question", "T1"))
        .await
        .unwrap();

    assert!(result.answer.contains("error processing your query"));
    assert!(result.error.as_deref().unwrap().contains("index deleted"));
    assert_eq!(result.total_sources, 0);
}

#[tokio::test]
async fn generation_failure_keeps_retrieval_evidence() {
    let search = ScriptedSearch::serving(vec![
        bucket_hit("a", ConfidenceBucket::High, "T1"),
        bucket_hit("b", ConfidenceBucket::Medium, "T1"),
    ]);
    let engine = QueryEngine::new(search, Arc::new(FailingGenerator));

    let result = engine
        .answer(QueryContext::new("question", "T1"))
        .await
        .unwrap();

    // Degraded answer, but the caller can still tell documents were found.
    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert_eq!(result.total_sources, 2);
    assert_eq!(result.cited_sources, 0);
    assert!(result.citations.is_empty());
    assert!(result.error.is_none());
}

#[tokio::test]
async fn empty_question_is_rejected_before_any_backend_call() {
    let search = ScriptedSearch::serving(vec![bucket_hit("a", ConfidenceBucket::Low, "T1")]);
    let generator = ScriptedGenerator::replying("unused");
    let engine = QueryEngine::new(search.clone(), generator.clone());

    let err = engine
        .answer(QueryContext::new("   ", "T1"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadInput(_)));
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_max_results_is_rejected() {
    let engine = QueryEngine::new(
        ScriptedSearch::serving(vec![]),
        ScriptedGenerator::replying("unused"),
    );

    let err = engine
        .answer(QueryContext::new("question", "T1").with_max_results(0))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadInput(_)));
}

#[tokio::test]
async fn repeated_queries_yield_identical_citations() {
    let search = ScriptedSearch::serving(vec![
        bucket_hit("first", ConfidenceBucket::High, "T1"),
        bucket_hit("second", ConfidenceBucket::Medium, "T1"),
    ]);
    let generator = ScriptedGenerator::replying("see [Document 2] and [Document 1]");
    let engine = QueryEngine::new(search, generator);

    let context = QueryContext::new("question", "T1");
    let first = engine.answer(context.clone()).await.unwrap();
    let second = engine.answer(context).await.unwrap();

    let ids = |result: &straq_core::QueryResult| {
        result
            .citations
            .iter()
            .map(|c| c.document_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(ids(&first), vec!["second", "first"]);
    assert_eq!(first.cited_sources, second.cited_sources);
}
