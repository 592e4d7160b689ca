//! Query context, citations and result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved tenant id that bypasses tenant filtering.
///
/// Backends only honour it when their configuration explicitly allows it;
/// production deployments keep it disabled.
pub const TENANT_ALL: &str = "ALL";

/// Tone and depth of the generated answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    #[default]
    Professional,
    Simple,
    Detailed,
}

impl AnswerStyle {
    /// Parse a style name, falling back to `Professional` for unknown values.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "simple" => Self::Simple,
            "detailed" => Self::Detailed,
            _ => Self::Professional,
        }
    }
}

/// Immutable parameters of a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub question: String,
    pub tenant_id: String,
    pub max_results: usize,
    pub answer_style: AnswerStyle,
}

impl QueryContext {
    /// Create a context with the default result bound and style
    pub fn new(question: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            tenant_id: tenant_id.into(),
            max_results: 10,
            answer_style: AnswerStyle::Professional,
        }
    }

    /// Set the maximum number of retrieved hits
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the answer style
    pub fn with_style(mut self, style: AnswerStyle) -> Self {
        self.answer_style = style;
        self
    }

    /// Whether this query bypasses tenant filtering
    pub fn all_tenants(&self) -> bool {
        self.tenant_id == TENANT_ALL
    }
}

/// A normalized reference to a retrieved document passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: String,
    pub title: String,
    pub excerpt: String,
    pub page: u32,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

/// Externally observable outcome of one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    /// Citations the model actually referenced, in order of first mention
    pub citations: Vec<Citation>,
    /// Count of all retrieved citations, cited or not
    pub total_sources: usize,
    pub cited_sources: usize,
    pub processing_time_ms: u64,
    pub tenant_id: String,
    pub timestamp: DateTime<Utc>,
    /// Diagnostic detail when the pipeline degraded instead of answering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
