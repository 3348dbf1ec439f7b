//! Query rewriting: free-text query → (food terms, optional location).
//!
//! The language model is reached through the [`QueryRewriter`] trait so the
//! orchestrator can run against a fixed stub in tests.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::search_error::SearchError;

/// System instruction sent with every rewrite request.
pub const REWRITE_SYSTEM_PROMPT: &str = r#"You are a food search assistant for an Indian restaurant app with deep knowledge of Indian food culture and regional eating habits.

Parse the user's message and return a JSON object with two fields:
- "food_terms": concise food-focused search terms (cuisine type, specific dishes, mood). Max 15 words. No location.
- "location": the city or area mentioned, or null if none.

Indian cultural food context you must apply:
- Rainy/monsoon weather → hot deep-fried snacks: bajji, pakoda, bonda, vada, samosa, bhajiya, bread pakora. Pair with chai or filter coffee. NOT desserts or salads.
- Chennai rain/evening → South Indian snacks: bajji, bonda, vada, idli, filter coffee, masala chai
- Mumbai rain/evening → vada pav, pav bhaji, pakoda, chai
- Delhi/North India rain → pakoda, samosa, chai, maggi, momos
- Morning → idli, dosa, poha, upma, paratha, chai
- Late night → biryani, kebabs, rolls, street food
- Comfort food (India) → dal rice, khichdi, rasam rice, curd rice
- Hunger craving spicy → Briyani, Kebab, chicken
- Romantic/date → North Indian, Continental, rooftop restaurant, fine dining
- Quick/budget → chaat, street food, tiffin, darshini, fast food
- Healthy → salads, juices, multigrain, South Indian tiffin

Examples:
"It's raining in the evening and I want to eat something in Chennai" → {"food_terms": "bajji bonda vada pakoda hot fried snacks chai South Indian", "location": "Chennai"}
"rainy evening Mumbai" → {"food_terms": "vada pav pakoda chai hot street food fried snacks", "location": "Mumbai"}
"date night in Mumbai" → {"food_terms": "romantic fine dining upscale North Indian Continental", "location": "Mumbai"}
"something spicy" → {"food_terms": "spicy curry chilli tandoori hot", "location": null}
"quick lunch under 200 in Bangalore" → {"food_terms": "quick budget tiffin darshini affordable fast casual", "location": "Bangalore"}
"Sunday morning breakfast Delhi" → {"food_terms": "breakfast paratha poha chole bhature morning", "location": "Delhi"}

Return only valid JSON. No explanation."#;

/// Rewritten query: what to eat and, optionally, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub food_terms: String,
    /// `None` means no location constraint; never an empty string.
    pub location: Option<String>,
}

/// Turns a raw user query into a [`RewriteResult`].
pub trait QueryRewriter: Send + Sync {
    fn rewrite<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RewriteResult, SearchError>> + Send + 'a>>;
}

/// Parses the model's JSON reply.
///
/// - `food_terms` missing, blank or non-string → the raw query verbatim
/// - `location` missing, null, blank or non-string → `None`
///
/// # Errors
/// [`SearchError::Rewrite`] when `content` is not a JSON object.
pub fn parse_rewrite(raw_query: &str, content: &str) -> Result<RewriteResult, SearchError> {
    let parsed: Value = serde_json::from_str(content.trim())
        .map_err(|e| SearchError::Rewrite(format!("model reply is not JSON: {e}")))?;
    let obj = parsed
        .as_object()
        .ok_or_else(|| SearchError::Rewrite("model reply is not a JSON object".into()))?;

    let food_terms = obj
        .get("food_terms")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| raw_query.to_string());

    let location = obj
        .get("location")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(RewriteResult {
        food_terms,
        location,
    })
}

/// [`QueryRewriter`] backed by the shared LLM service (rewrite profile).
pub struct LlmQueryRewriter {
    llm: Arc<LlmServiceProfiles>,
}

impl LlmQueryRewriter {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        Self { llm }
    }
}

impl QueryRewriter for LlmQueryRewriter {
    fn rewrite<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RewriteResult, SearchError>> + Send + 'a>> {
        Box::pin(async move {
            let content = self
                .llm
                .complete_json(query, Some(REWRITE_SYSTEM_PROMPT))
                .await
                .map_err(|e| {
                    warn!(target: "restaurant_search::rewrite", error = %e, "rewrite call failed");
                    SearchError::Rewrite(e.to_string())
                })?;

            let result = parse_rewrite(query, &content)?;

            info!(
                target: "restaurant_search::rewrite",
                query = %query,
                food_terms = %result.food_terms,
                location = ?result.location,
                "query rewritten"
            );

            Ok(result)
        })
    }
}
