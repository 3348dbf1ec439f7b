use std::sync::Arc;

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_openai_embedding_from, config_openai_rewrite_from},
};
use restaurant_search::{
    LlmEmbedder, LlmQueryRewriter, OpenSearchClient, SearchConfig, SearchService,
};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub search: SearchService,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self { search }
    }

    /// Load shared state from environment variables.
    ///
    /// No network call is made here; LLM clients are built on first use.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = SearchConfig::from_lookup(&lookup).map_err(|e| AppError::Config(e.to_string()))?;
        let rewrite = config_openai_rewrite_from(&lookup)?;
        let embedding = config_openai_embedding_from(&lookup)?;
        let store = OpenSearchClient::new(&cfg.opensearch)
            .map_err(|e| AppError::Config(e.to_string()))?;

        info!(
            opensearch = %store.base_url(),
            index = %cfg.opensearch.index,
            rewrite_model = %rewrite.model,
            embedding_model = %embedding.model,
            embedding_dim = ?embedding.dimensions,
            "app state ready"
        );

        let llm = Arc::new(LlmServiceProfiles::new(rewrite, embedding));
        let search = SearchService::new(
            Arc::new(LlmQueryRewriter::new(Arc::clone(&llm))),
            Arc::new(LlmEmbedder::new(llm)),
            Arc::new(store),
            cfg.opensearch.index,
        );
        Ok(Self::new(search))
    }
}
