//! OpenSearch REST access: run a query body against an index, read the
//! cluster version.
//!
//! Only two endpoints are touched:
//! - `POST {base}/{index}/_search` → `hits.hits[]`
//! - `GET  {base}/`                → `version.number`
//!
//! The index is never created or written here; ingestion happens elsewhere.

use std::{future::Future, pin::Pin, time::Instant};

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use ai_llm_service::error_handler::make_snippet;

use crate::errors::search_error::SearchError;
use crate::structs::restaurant::RawHit;
use crate::structs::search_config::OpenSearchConfig;

/// Store operations the search service depends on.
pub trait SearchBackend: Send + Sync {
    /// Runs `body` against `index` and returns hits in store order.
    fn search<'a>(
        &'a self,
        index: &'a str,
        body: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawHit>, SearchError>> + Send + 'a>>;

    /// Cluster version string, e.g. `2.11.0`.
    fn version<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, SearchError>> + Send + 'a>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct ClusterInfo {
    version: ClusterVersion,
}

#[derive(Debug, Deserialize)]
struct ClusterVersion {
    number: String,
}

/// Plain HTTP client for a single OpenSearch node.
#[derive(Debug, Clone)]
pub struct OpenSearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenSearchClient {
    /// # Errors
    /// [`SearchError::StoreTransport`] if the HTTP client cannot be built.
    pub fn new(cfg: &OpenSearchConfig) -> Result<Self, SearchError> {
        Self::with_base_url(cfg.base_url())
    }

    /// Client for an explicit base URL such as `http://127.0.0.1:9200`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder().gzip(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn run_search(&self, index: &str, body: Value) -> Result<Vec<RawHit>, SearchError> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let started = Instant::now();
        debug!(target: "restaurant_search::opensearch", %url, "POST");

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            error!(
                target: "restaurant_search::opensearch",
                index,
                "index not found"
            );
            return Err(SearchError::IndexNotFound {
                index: index.to_string(),
            });
        }
        if !status.is_success() {
            return Err(status_error(resp, &url).await);
        }

        let text = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| SearchError::StoreDecode(format!("search response: {e}")))?;

        debug!(
            target: "restaurant_search::opensearch",
            index,
            hits = parsed.hits.hits.len(),
            latency_ms = started.elapsed().as_millis(),
            "search ok"
        );
        Ok(parsed.hits.hits)
    }

    async fn cluster_version(&self) -> Result<String, SearchError> {
        let url = format!("{}/", self.base_url);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }

        let text = resp.text().await?;
        let info: ClusterInfo = serde_json::from_str(&text)
            .map_err(|e| SearchError::StoreDecode(format!("cluster info: {e}")))?;
        Ok(info.version.number)
    }
}

impl SearchBackend for OpenSearchClient {
    fn search<'a>(
        &'a self,
        index: &'a str,
        body: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawHit>, SearchError>> + Send + 'a>> {
        Box::pin(self.run_search(index, body))
    }

    fn version<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, SearchError>> + Send + 'a>> {
        Box::pin(self.cluster_version())
    }
}

async fn status_error(resp: reqwest::Response, url: &str) -> SearchError {
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    error!(
        target: "restaurant_search::opensearch",
        %status,
        %url,
        %snippet,
        "store returned non-success status"
    );
    SearchError::StoreHttp {
        status,
        url: url.to_string(),
        snippet,
    }
}
