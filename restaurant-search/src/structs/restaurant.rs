//! Data types exchanged with the store and returned to clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single hit as returned by the store, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHit {
    /// Source document (embedding field already excluded by the query).
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    /// Store-reported relevance; `None` when the store did not compute one.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
}

/// Uniform restaurant record returned by every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub restaurant_id: String,
    pub name: String,
    pub cuisines: String,
    pub location: String,
    pub rating: f64,
    pub cost_for_two: i64,
    pub text_for_embedding: String,
    /// Cosine similarity, BM25 or a combined score depending on the mode.
    pub score: Option<f64>,
}
