//! Error handling for the interest matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Catalog data error: {0}")]
    CatalogData(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog source not supported: {0}")]
    UnsupportedSource(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl MatcherError {
    /// Load failures can be retried by the caller; everything else needs new input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MatcherError::CatalogLoad(_))
    }
}

pub type Result<T> = std::result::Result<T, MatcherError>;

/// True when any cause in an `anyhow` chain is a retryable matcher error
pub fn is_retryable_report(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<MatcherError>().is_some_and(MatcherError::is_retryable))
}

/// Network and HTTP failures while fetching the catalog
impl From<reqwest::Error> for MatcherError {
    fn from(err: reqwest::Error) -> Self {
        MatcherError::CatalogLoad(err.to_string())
    }
}
