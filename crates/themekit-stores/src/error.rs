//! Error types for the theme stores

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Theme root {path} is unusable: {source}")]
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scan task failed: {0}")]
    Join(String),

    #[error("Store '{store}' unavailable: {message}")]
    Unavailable { store: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Receiver for non-fatal store failures (scan errors, failing chain members)
pub type ErrorSink = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Sink that reports failures through `tracing` at error level
pub fn tracing_sink() -> ErrorSink {
    Arc::new(|err: &StoreError| tracing::error!("theme store error: {}", err))
}
