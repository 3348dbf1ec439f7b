//! Shared LLM service with two active profiles: `rewrite` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds the underlying HTTP client for a profile on first use and caches
//!   it per config (endpoint + model + key + timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::default_config::{config_openai_embedding, config_openai_rewrite};
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     config_openai_rewrite()?,
//!     config_openai_embedding()?,
//! ));
//!
//! let json = svc.complete_json("rainy evening Mumbai", Some("Return JSON.")).await?;
//! let emb = svc.embed("vada pav chai").await?;
//! println!("{json} / dim = {}", emb.len());
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::llm_model_config::LlmModelConfig, error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Shared service managing the **rewrite** and **embedding** profiles.
pub struct LlmServiceProfiles {
    rewrite: LlmModelConfig,
    embedding: LlmModelConfig,

    clients: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates the service. No HTTP client is built until the first call.
    pub fn new(rewrite: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            rewrite,
            embedding,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Runs a chat completion with the **rewrite** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or generation fails.
    pub async fn complete_json(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        let cli = self.get_or_init(&self.rewrite).await?;
        cli.generate(prompt, system).await
    }

    /// Computes an embedding with the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let cli = self.get_or_init(&self.embedding).await?;
        cli.embeddings(input).await
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.clients.read().await.get(&key).cloned() {
            return Ok(cli);
        }

        let mut w = self.clients.write().await;
        // Another task may have won the race while we waited for the write lock.
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "building OpenAI client for profile");
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, Arc::clone(&cli));
        Ok(cli)
    }

    #[cfg(test)]
    async fn cached_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}
