//! Unified error type for the restaurant-search crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by the search core.
#[derive(Debug, Error)]
pub enum SearchError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Request ─────────────────────────────────────────────────────────────
    /// Request rejected before any upstream call.
    #[error("{0}")]
    Validation(String),

    // ── Language model ──────────────────────────────────────────────────────
    /// Query rewrite call failed or returned content that is not the expected JSON.
    #[error("query rewrite failed: {0}")]
    Rewrite(String),

    /// Embedding call failed or returned a vector of the wrong size.
    #[error("embedding error: {0}")]
    Embedding(String),

    // ── Store ───────────────────────────────────────────────────────────────
    /// The configured index does not exist in the store.
    #[error("index '{index}' not found; run the ingestion step first")]
    IndexNotFound { index: String },

    /// Store answered with a non-successful status.
    #[error("store returned HTTP {status} from {url}: {snippet}")]
    StoreHttp {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Store could not be reached.
    #[error("store transport error: {0}")]
    StoreTransport(#[from] reqwest::Error),

    /// Store response did not have the expected shape.
    #[error("store decode error: {0}")]
    StoreDecode(String),
}
