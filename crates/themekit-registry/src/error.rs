//! Error types for registry synchronization

use themekit_http::HttpError;
use thiserror::Error;

/// A sync attempt against the registry failed
#[derive(Debug, Error)]
#[error("Failed to sync theme registry from {url}: {source}")]
pub struct SyncError {
    /// Registry URL that was fetched
    pub url: String,
    #[source]
    pub source: SyncFailure,
}

/// Underlying cause of a [`SyncError`]
#[derive(Debug, Error)]
pub enum SyncFailure {
    /// Network error or non-success status
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Body was not a valid manifest document
    #[error("Malformed registry manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SyncError {
    pub fn new(url: impl Into<String>, source: impl Into<SyncFailure>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.source, SyncFailure::Parse(_))
    }
}
