//! Configuration layer: reads runtime settings from environment variables
//! and exposes a strongly typed config for the store connection.
//!
//! Embedding model and dimension are read by the LLM service config.

use serde::{Deserialize, Serialize};

use crate::errors::search_error::SearchError;

/// OpenSearch connectivity and index parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenSearchConfig {
    /// `http` or `https`.
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Index every query targets; never created or written by this service.
    pub index: String,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 9200,
            index: "restaurants".to_string(),
        }
    }
}

impl OpenSearchConfig {
    /// Base URL such as `http://localhost:9200`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Top-level runtime configuration for the search core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub opensearch: OpenSearchConfig,
}

impl SearchConfig {
    /// Build configuration from the process environment.
    ///
    /// Environment variables used:
    /// - `OPENSEARCH_SCHEME` (default: "http")
    /// - `OPENSEARCH_HOST` (default: "localhost")
    /// - `OPENSEARCH_PORT` (default: 9200)
    /// - `INDEX_NAME` (default: "restaurants")
    pub fn from_env() -> Result<Self, SearchError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`SearchConfig::from_env`], reading values through `lookup`.
    ///
    /// Absent or blank values fall back to defaults; present but malformed
    /// numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let opensearch = OpenSearchConfig {
            scheme: get("OPENSEARCH_SCHEME").unwrap_or(defaults.opensearch.scheme),
            host: get("OPENSEARCH_HOST").unwrap_or(defaults.opensearch.host),
            port: parse_or("OPENSEARCH_PORT", get("OPENSEARCH_PORT"), defaults.opensearch.port)?,
            index: get("INDEX_NAME").unwrap_or(defaults.opensearch.index),
        };

        if !matches!(opensearch.scheme.as_str(), "http" | "https") {
            return Err(SearchError::InvalidConfig(
                "OPENSEARCH_SCHEME must be http or https".into(),
            ));
        }

        Ok(Self { opensearch })
    }
}

/// Parse `raw` when present, otherwise return `default`.
fn parse_or<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, SearchError> {
    match raw {
        Some(v) => v.trim().parse::<T>().map_err(|_| SearchError::EnvParse {
            key: key.into(),
            value: v,
        }),
        None => Ok(default),
    }
}
