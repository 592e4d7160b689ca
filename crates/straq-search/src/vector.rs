//! Vector index backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use straq_core::{
    ATTR_PAGE_NUMBER, ATTR_SOURCE_URI, ATTR_TENANT_ID, Error, QueryContext, RelevanceSignal,
    Result, SearchBackend, SearchHit,
};

use crate::{SearchConfig, check_tenant_scope, classify_http_failure};

/// Longest raw-content excerpt used when no highlight fragment is returned
const EXCERPT_CHARS: usize = 300;

/// Backend over a search service scoring hits numerically.
///
/// Issues a hybrid lexical/fuzzy query with an exact-match tenant filter and
/// reports relevance as an unbounded numeric score.
pub struct VectorIndexBackend {
    config: SearchConfig,
    client: Client,
}

#[derive(Deserialize)]
struct VectorSearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct HitsEnvelope {
    hits: Vec<VectorHit>,
}

#[derive(Deserialize)]
struct VectorHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: VectorSource,
    highlight: Option<Highlight>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct VectorSource {
    document_id: Option<String>,
    title: Option<String>,
    content: String,
    source_uri: Option<String>,
    page_number: Option<i64>,
    tenant_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Highlight {
    content: Vec<String>,
}

impl VectorIndexBackend {
    /// Create a backend with a dedicated HTTP client
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn build_body(&self, context: &QueryContext) -> Value {
        let mut bool_query = json!({
            "must": [{
                "multi_match": {
                    "query": context.question,
                    "fields": ["title^2", "content"],
                    "fuzziness": "AUTO"
                }
            }]
        });

        if !context.all_tenants() {
            bool_query["filter"] = json!([{
                "term": { "tenant_id": context.tenant_id }
            }]);
        }

        json!({
            "size": context.max_results,
            "query": { "bool": bool_query },
            "highlight": { "fields": { "content": {} } },
            "_source": [
                "document_id", "title", "content",
                "source_uri", "page_number", "tenant_id"
            ]
        })
    }

    fn hits_from_response(response: VectorSearchResponse) -> Vec<SearchHit> {
        response
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                // Prefer a highlighted fragment over truncating raw content.
                let excerpt = hit
                    .highlight
                    .and_then(|h| h.content.into_iter().next())
                    .unwrap_or_else(|| truncate_chars(&hit.source.content, EXCERPT_CHARS));

                let mut attributes = std::collections::HashMap::new();
                if let Some(uri) = hit.source.source_uri {
                    attributes.insert(ATTR_SOURCE_URI.to_string(), uri);
                }
                if let Some(page) = hit.source.page_number {
                    attributes.insert(ATTR_PAGE_NUMBER.to_string(), page.to_string());
                }
                if let Some(tenant) = hit.source.tenant_id {
                    attributes.insert(ATTR_TENANT_ID.to_string(), tenant);
                }

                SearchHit {
                    document_id: hit.source.document_id.unwrap_or(hit.id),
                    title: hit
                        .source
                        .title
                        .unwrap_or_else(|| "Untitled Document".to_string()),
                    excerpt,
                    relevance: RelevanceSignal::Score(hit.score.unwrap_or(0.0)),
                    attributes,
                }
            })
            .collect()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl SearchBackend for VectorIndexBackend {
    async fn search(&self, context: &QueryContext) -> Result<Vec<SearchHit>> {
        check_tenant_scope(&self.config, context)?;

        let body = self.build_body(context);
        let url = format!(
            "{}/{}/_search",
            self.config.endpoint.trim_end_matches('/'),
            self.config.index_id
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("vector index query timed out".to_string())
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &body));
        }

        let parsed: VectorSearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let hits = Self::hits_from_response(parsed);
        debug!(hits = hits.len(), "vector index query returned");
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "vector"
    }
}
