//! Search backend trait and hit types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{QueryContext, Result};

/// Attribute key carrying the retrievable document location
pub const ATTR_SOURCE_URI: &str = "source_uri";
/// Attribute key carrying the page the excerpt came from
pub const ATTR_PAGE_NUMBER: &str = "page_number";
/// Attribute key carrying the owning tenant, set by the ingestion pipeline
pub const ATTR_TENANT_ID: &str = "tenant_id";

/// Qualitative relevance bucket reported by the managed index backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceBucket {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceBucket {
    /// Parse a backend confidence label; unknown labels yield `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "VERY_HIGH" => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

/// Backend-specific relevance signal attached to a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RelevanceSignal {
    /// Qualitative bucket from the managed index
    Bucket(ConfidenceBucket),
    /// Unbounded numeric score from the vector index
    Score(f32),
    /// The backend supplied no usable relevance signal
    Unknown,
}

/// A single backend-native search result, produced per query and never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: String,
    pub title: String,
    pub excerpt: String,
    pub relevance: RelevanceSignal,
    pub attributes: HashMap<String, String>,
}

impl SearchHit {
    /// Look up a document attribute by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Trait for tenant-scoped document search backends
///
/// Implementations issue one query against their index, constrained to the
/// context's tenant unless the reserved `ALL` tenant is in effect, and return
/// hits in rank order. Rate limiting surfaces as `Error::Throttled` so the
/// retry policy can distinguish it from fatal failures.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a tenant-filtered query, returning hits in rank order
    async fn search(&self, context: &QueryContext) -> Result<Vec<SearchHit>>;

    /// Short backend name used in logs
    fn name(&self) -> &'static str;
}
