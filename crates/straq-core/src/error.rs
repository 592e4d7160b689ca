//! Error types for the strata query engine

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error taxonomy for the query pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    BadInput(String),

    #[error("backend throttled: {0}")]
    Throttled(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a throttling-class failure that may succeed on retry.
    pub fn is_throttling(&self) -> bool {
        matches!(self, Error::Throttled(_))
    }
}
