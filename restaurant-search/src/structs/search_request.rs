use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Visitor},
};

use crate::errors::search_error::SearchError;

/// Smallest accepted `top_k`.
pub const MIN_TOP_K: i64 = 1;
/// Largest accepted `top_k`.
pub const MAX_TOP_K: i64 = 50;
/// `top_k` used when the client omits it.
pub const DEFAULT_TOP_K: i64 = 10;

/// Incoming search request, shared by all three search modes.
///
/// `top_k` is kept signed and unbounded so that negative or oversized values
/// reach [`SearchRequest::validate`] instead of failing body parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k", deserialize_with = "any_integer")]
    pub top_k: i64,
}

fn default_top_k() -> i64 {
    DEFAULT_TOP_K
}

/// Accepts any JSON integer, saturating at the `i64` bounds. Integral floats
/// (`5.0`, or literals too long for `u64`) count as integers; fractions and
/// non-numbers are rejected.
fn any_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AnyInteger;

    impl Visitor<'_> for AnyInteger {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 {
                // `as` saturates at the i64 bounds.
                Ok(v as i64)
            } else {
                Err(E::invalid_type(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(AnyInteger)
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, top_k: i64) -> Self {
        Self {
            query: query.into(),
            top_k,
        }
    }

    /// Rejects empty/whitespace queries and `top_k` outside `[1, 50]`.
    ///
    /// Returns the accepted `top_k` as a result count.
    pub fn validate(&self) -> Result<usize, SearchError> {
        if self.query.trim().is_empty() {
            return Err(SearchError::Validation("query must not be empty".into()));
        }
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&self.top_k) {
            return Err(SearchError::Validation(format!(
                "top_k must be between {MIN_TOP_K} and {MAX_TOP_K}, got {}",
                self.top_k
            )));
        }
        usize::try_from(self.top_k)
            .map_err(|_| SearchError::Validation(format!("top_k out of range: {}", self.top_k)))
    }
}
