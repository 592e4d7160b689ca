//! Search backend implementations for the strata query engine
//!
//! Two interchangeable backends answer the same tenant-filtered contract: a
//! managed full-text index reporting qualitative confidence buckets, and a
//! vector index scoring hits numerically over lexical/fuzzy matching.

mod config;
mod managed;
mod vector;

pub use config::{BackendKind, SearchConfig};
pub use managed::ManagedIndexBackend;
pub use vector::VectorIndexBackend;

// Re-export core types for convenience
pub use straq_core::{Error, Result, SearchBackend, SearchHit};

use straq_core::QueryContext;

/// Reject the reserved `ALL` tenant unless the deployment opted in.
pub(crate) fn check_tenant_scope(config: &SearchConfig, context: &QueryContext) -> Result<()> {
    if context.all_tenants() && !config.allow_all_tenants {
        return Err(Error::Configuration(
            "the ALL tenant is disabled in this configuration".to_string(),
        ));
    }
    Ok(())
}

/// Map a non-success HTTP response to the error taxonomy.
///
/// 429 and explicit throttling fault codes are throttling-class; everything
/// else is a fatal backend failure.
pub(crate) fn classify_http_failure(status: reqwest::StatusCode, body: &str) -> Error {
    if status.as_u16() == 429 || body.contains("ThrottlingException") {
        Error::Throttled(format!("search backend throttled ({status})"))
    } else {
        Error::BackendUnavailable(format!(
            "search backend returned {status}: {body}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn throttling_status_classifies_as_throttled() {
        let err = classify_http_failure(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_throttling());
    }

    #[test]
    fn throttling_fault_code_classifies_as_throttled() {
        let err = classify_http_failure(
            StatusCode::BAD_REQUEST,
            r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#,
        );
        assert!(err.is_throttling());
    }

    #[test]
    fn other_failures_are_fatal() {
        let err = classify_http_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }

    #[test]
    fn all_tenant_requires_opt_in() {
        let config = SearchConfig::new(
            BackendKind::Managed,
            "https://search.example.com",
            "strata-documents",
        );
        let ctx = QueryContext::new("q", straq_core::TENANT_ALL);
        assert!(check_tenant_scope(&config, &ctx).is_err());

        let mut permissive = config;
        permissive.allow_all_tenants = true;
        assert!(check_tenant_scope(&permissive, &ctx).is_ok());
    }
}
