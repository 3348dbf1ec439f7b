//! Restaurant search core.
//!
//! Public API:
//! - [`SearchService::semantic_search`]: rewrite → embed food terms → kNN / script-score.
//! - [`SearchService::keyword_search`]: rewrite (location only) → BM25 over the raw query.
//! - [`SearchService::hybrid_search`]: rewrite → embed → weighted vector + lexical.
//! - [`SearchService::health`]: store version ping.
//!
//! Collaborators ([`QueryRewriter`], [`Embedder`], [`SearchBackend`]) are
//! injected, so the whole pipeline runs against stubs in tests.

pub mod embedding;
pub mod errors;
pub mod normalize;
pub mod opensearch;
pub mod query_builder;
pub mod rewrite;
pub mod structs;

use std::{sync::Arc, time::Instant};

use tracing::{debug, info, warn};

pub use embedding::{Embedder, LlmEmbedder};
pub use errors::search_error::SearchError;
pub use opensearch::{OpenSearchClient, SearchBackend};
pub use query_builder::{QueryPlan, SearchMode, build_query};
pub use rewrite::{LlmQueryRewriter, QueryRewriter, RewriteResult};
pub use structs::health_report::HealthReport;
pub use structs::restaurant::{RawHit, RestaurantRecord};
pub use structs::search_config::SearchConfig;
pub use structs::search_request::SearchRequest;

use normalize::normalize_hits;

/// Search orchestrator shared by all request handlers.
///
/// Holds only read-only handles; one instance serves concurrent requests.
#[derive(Clone)]
pub struct SearchService {
    rewriter: Arc<dyn QueryRewriter>,
    embedder: Arc<dyn Embedder>,
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl SearchService {
    pub fn new(
        rewriter: Arc<dyn QueryRewriter>,
        embedder: Arc<dyn Embedder>,
        backend: Arc<dyn SearchBackend>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            rewriter,
            embedder,
            backend,
            index: index.into(),
        }
    }

    /// Index every query targets.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Vector search on the rewritten food terms.
    pub async fn semantic_search(
        &self,
        req: &SearchRequest,
    ) -> Result<Vec<RestaurantRecord>, SearchError> {
        self.run(SearchMode::Semantic, req).await
    }

    /// BM25 search on the raw query; the rewrite contributes only the location.
    pub async fn keyword_search(
        &self,
        req: &SearchRequest,
    ) -> Result<Vec<RestaurantRecord>, SearchError> {
        self.run(SearchMode::Keyword, req).await
    }

    /// Weighted vector + lexical search on the rewritten food terms.
    pub async fn hybrid_search(
        &self,
        req: &SearchRequest,
    ) -> Result<Vec<RestaurantRecord>, SearchError> {
        self.run(SearchMode::Hybrid, req).await
    }

    /// Pings the store and reports its version.
    pub async fn health(&self) -> Result<HealthReport, SearchError> {
        let version = self.backend.version().await.map_err(|e| {
            warn!(target: "restaurant_search::health", error = %e, "store health check failed");
            e
        })?;
        Ok(HealthReport::ok(version))
    }

    async fn run(
        &self,
        mode: SearchMode,
        req: &SearchRequest,
    ) -> Result<Vec<RestaurantRecord>, SearchError> {
        let top_k = req.validate()?;

        let started = Instant::now();
        info!(
            target: "restaurant_search::search",
            %mode,
            query = %req.query,
            top_k,
            "search: start"
        );

        let rewritten = self.rewriter.rewrite(&req.query).await?;
        let location = rewritten.location.as_deref();

        let vector = if mode.needs_vector() {
            self.embedder.embed(&rewritten.food_terms).await?
        } else {
            Vec::new()
        };

        let plan = match mode {
            SearchMode::Semantic => QueryPlan::Semantic {
                vector: &vector,
                location,
                top_k,
            },
            SearchMode::Keyword => QueryPlan::Keyword {
                text: &req.query,
                location,
                top_k,
            },
            SearchMode::Hybrid => QueryPlan::Hybrid {
                food_terms: &rewritten.food_terms,
                vector: &vector,
                location,
                top_k,
            },
        };
        let body = build_query(&plan);
        debug!(
            target: "restaurant_search::search",
            %mode,
            filtered = location.is_some(),
            "query body built"
        );

        let hits = self.backend.search(&self.index, body).await?;
        let records = normalize_hits(hits);

        info!(
            target: "restaurant_search::search",
            %mode,
            location = ?location,
            hits = records.len(),
            latency_ms = started.elapsed().as_millis(),
            "search: finished"
        );

        Ok(records)
    }
}
