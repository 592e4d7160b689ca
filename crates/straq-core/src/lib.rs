//! Core traits and types for straq, the strata document query engine.
//!
//! This crate defines the data model shared across the query pipeline and the
//! capability-facing interfaces for search backends and generative backends,
//! keeping the orchestration code backend-agnostic and test-friendly.

pub mod error;
pub mod generate;
pub mod query;
pub mod retry;
pub mod search;

pub use error::{Error, Result};
pub use generate::{GeneratedAnswer, GenerationConfig, GenerativeBackend, UsageMetrics};
pub use query::{AnswerStyle, Citation, QueryContext, QueryResult, TENANT_ALL};
pub use retry::RetryPolicy;
pub use search::{
    ATTR_PAGE_NUMBER, ATTR_SOURCE_URI, ATTR_TENANT_ID, ConfidenceBucket, RelevanceSignal,
    SearchBackend, SearchHit,
};
