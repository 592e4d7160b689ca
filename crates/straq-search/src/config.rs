//! Search backend configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use straq_core::{Error, Result};

/// Which search backend variant a deployment uses.
///
/// The choice is an explicit deployment decision; there is no implicit
/// fallback from one backend to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Managed,
    Vector,
}

impl BackendKind {
    /// Parse a backend name from configuration
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "managed" => Ok(Self::Managed),
            "vector" => Ok(Self::Vector),
            other => Err(Error::Configuration(format!(
                "unknown search backend: {other} (expected managed or vector)"
            ))),
        }
    }
}

/// Configuration shared by both search backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub backend: BackendKind,
    pub endpoint: String,
    /// Index identifier: the managed index id, or the vector index name
    pub index_id: String,
    /// Permit the reserved `ALL` tenant to bypass filtering. Off by default;
    /// only non-production setups should enable it.
    pub allow_all_tenants: bool,
    /// Per-request timeout, covering the whole search call
    pub timeout: Duration,
}

impl SearchConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match env::var("SEARCH_BACKEND") {
            Ok(name) => BackendKind::from_name(&name)?,
            Err(_) => BackendKind::Managed,
        };

        let endpoint = env::var("SEARCH_ENDPOINT").map_err(|_| {
            Error::Configuration("SEARCH_ENDPOINT environment variable not found".to_string())
        })?;

        let index_id = env::var("SEARCH_INDEX_ID").map_err(|_| {
            Error::Configuration("SEARCH_INDEX_ID environment variable not found".to_string())
        })?;

        let allow_all_tenants = env::var("SEARCH_ALLOW_ALL_TENANTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            backend,
            endpoint,
            index_id,
            allow_all_tenants,
            timeout: Duration::from_secs(10),
        })
    }

    /// Create configuration with explicit values
    pub fn new(
        backend: BackendKind,
        endpoint: impl Into<String>,
        index_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            endpoint: endpoint.into(),
            index_id: index_id.into(),
            allow_all_tenants: false,
            timeout: Duration::from_secs(10),
        }
    }
}
