//! Food-term embedding behind the [`Embedder`] seam.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::{debug, warn};

use crate::errors::search_error::SearchError;

/// Produces one fixed-dimension vector per input text.
pub trait Embedder: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SearchError>> + Send + 'a>>;
}

/// [`Embedder`] backed by the shared LLM service (embedding profile).
///
/// The profile's `dimensions` is both requested from the provider and
/// enforced on the reply, so a wrong-sized vector surfaces as
/// [`SearchError::Embedding`].
pub struct LlmEmbedder {
    llm: Arc<LlmServiceProfiles>,
}

impl LlmEmbedder {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        Self { llm }
    }
}

impl Embedder for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SearchError>> + Send + 'a>> {
        Box::pin(async move {
            let vector = self.llm.embed(text).await.map_err(|e| {
                warn!(target: "restaurant_search::embedding", error = %e, "embedding call failed");
                SearchError::Embedding(e.to_string())
            })?;
            debug!(target: "restaurant_search::embedding", dim = vector.len(), "food terms embedded");
            Ok(vector)
        })
    }
}
