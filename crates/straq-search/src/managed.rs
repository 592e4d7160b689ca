//! Managed full-text index backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use straq_core::{
    ATTR_SOURCE_URI, ATTR_TENANT_ID, ConfidenceBucket, Error, QueryContext, RelevanceSignal,
    Result, SearchBackend, SearchHit,
};

use crate::{SearchConfig, check_tenant_scope, classify_http_failure};

const UNTITLED: &str = "Untitled Document";

/// Backend over a hosted full-text document search service.
///
/// Issues a managed query constrained by an equality filter on the
/// `tenant_id` document attribute and reports relevance as qualitative
/// confidence buckets.
pub struct ManagedIndexBackend {
    config: SearchConfig,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ManagedQueryRequest {
    index_id: String,
    query_text: String,
    page_size: usize,
    query_result_type_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute_filter: Option<AttributeFilter>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeFilter {
    equals_to: EqualsTo,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EqualsTo {
    key: String,
    value: AttributeValue,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct AttributeValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    long_value: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManagedQueryResponse {
    #[serde(default)]
    result_items: Vec<ResultItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResultItem {
    #[serde(default)]
    document_id: String,
    document_title: Option<TextBlock>,
    document_excerpt: Option<TextBlock>,
    score_attributes: Option<ScoreAttributes>,
    #[serde(default)]
    document_attributes: Vec<DocumentAttribute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScoreAttributes {
    score_confidence: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentAttribute {
    key: String,
    value: AttributeValue,
}

impl ManagedIndexBackend {
    /// Create a backend with a dedicated HTTP client
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn build_request(&self, context: &QueryContext) -> ManagedQueryRequest {
        // The filter is omitted only for the reserved ALL tenant.
        let attribute_filter = (!context.all_tenants()).then(|| AttributeFilter {
            equals_to: EqualsTo {
                key: ATTR_TENANT_ID.to_string(),
                value: AttributeValue {
                    string_value: Some(context.tenant_id.clone()),
                    long_value: None,
                },
            },
        });

        ManagedQueryRequest {
            index_id: self.config.index_id.clone(),
            query_text: context.question.clone(),
            page_size: context.max_results,
            query_result_type_filter: "DOCUMENT".to_string(),
            attribute_filter,
        }
    }

    fn hits_from_response(response: ManagedQueryResponse) -> Vec<SearchHit> {
        response
            .result_items
            .into_iter()
            .map(|item| {
                let relevance = item
                    .score_attributes
                    .and_then(|s| s.score_confidence)
                    .and_then(|label| ConfidenceBucket::from_label(&label))
                    .map(RelevanceSignal::Bucket)
                    .unwrap_or(RelevanceSignal::Unknown);

                let title = item
                    .document_title
                    .and_then(|t| t.text)
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| UNTITLED.to_string());

                let excerpt = item
                    .document_excerpt
                    .and_then(|e| e.text)
                    .unwrap_or_default();

                let attributes = item
                    .document_attributes
                    .into_iter()
                    .filter_map(|attr| {
                        // The managed service prefixes its own attributes
                        // with an underscore.
                        let key = match attr.key.as_str() {
                            "_source_uri" => ATTR_SOURCE_URI.to_string(),
                            other => other.to_string(),
                        };
                        let value = attr
                            .value
                            .string_value
                            .or_else(|| attr.value.long_value.map(|v| v.to_string()))?;
                        Some((key, value))
                    })
                    .collect();

                SearchHit {
                    document_id: item.document_id,
                    title,
                    excerpt,
                    relevance,
                    attributes,
                }
            })
            .collect()
    }
}

#[async_trait]
impl SearchBackend for ManagedIndexBackend {
    async fn search(&self, context: &QueryContext) -> Result<Vec<SearchHit>> {
        check_tenant_scope(&self.config, context)?;

        let request = self.build_request(context);
        let url = format!("{}/query", self.config.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("managed index query timed out".to_string())
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &body));
        }

        let parsed: ManagedQueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let hits = Self::hits_from_response(parsed);
        debug!(hits = hits.len(), "managed index query returned");
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "managed"
    }
}
