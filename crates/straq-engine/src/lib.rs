//! Retrieval-augmented query pipeline for tenant-scoped strata documents
//!
//! The pipeline retrieves evidence through a pluggable search backend,
//! normalizes it into citations, grounds a low-temperature generation in the
//! top citations and reconciles the model's `[Document N]` markers back
//! against the retrieved evidence set.

mod engine;
mod extract;
mod generate;
mod prompt;
mod reconcile;

#[cfg(test)]
mod tests;

pub use engine::{NO_DOCUMENTS_ANSWER, QueryEngine};
pub use extract::{confidence_for, extract_citations};
pub use generate::{FALLBACK_ANSWER, generate_grounded};
pub use prompt::build_prompt;
pub use reconcile::reconcile_citations;

// Re-export core types for convenience
pub use straq_core::{
    AnswerStyle, Citation, Error, GenerationConfig, GenerativeBackend, QueryContext, QueryResult,
    Result, RetryPolicy, SearchBackend,
};
