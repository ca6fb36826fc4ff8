//! Error handling for the price engine.
//!
//! Defines the leaf error type and establishes a unified Result type using
//! anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types surfaced by the price engine.
///
/// Ingestion itself is best-effort (see `ingest` module docs): most of these
/// variants are logged and swallowed at the file boundary rather than
/// propagated. `ConfigParseError` and `Io` are the ones that actually reach
/// callers, via `ConfigStore::load`/`PriceEngine::update_margin`.
#[derive(Error, Debug)]
pub enum PriceEngineError {
    #[error("not a price table")]
    NotAPriceTable,

    #[error("failed to read {path}: {source}")]
    ReadFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("manual mapping column index out of range: {0:?}")]
    ManualMappingOutOfRange(crate::model::ManualMapping),

    #[error("config parse error: {0}")]
    ConfigParseError(#[from] serde_json::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = anyhow::Result<T>;
