//! OpenSearch query-body construction for the three search modes.
//!
//! Each mode has a location-filtered and an unfiltered shape, so six bodies in
//! total. Bodies are pure functions of their [`QueryPlan`]; all ranking policy
//! lives in the constants below.
//!
//! | Mode     | No location                         | With location                                      |
//! |----------|-------------------------------------|----------------------------------------------------|
//! | semantic | `knn` on `embedding`                | `script_score` (knn cosine) over location match    |
//! | keyword  | `multi_match` on raw query (fuzzy)  | same, `must` + location `filter`                   |
//! | hybrid   | `bool.should` lexical 0.3 + knn 0.7 | `script_score` over location + 0.3 lexical `should`|

use serde_json::{Value, json};

/// Field holding the document vector; never returned to clients.
pub const EMBEDDING_FIELD: &str = "embedding";
/// Field used for the hard location filter.
pub const LOCATION_FIELD: &str = "location";

/// Boost of the `name` field in lexical matching.
pub const NAME_BOOST: f64 = 2.0;
/// Boost of the `cuisines` field in lexical matching.
pub const CUISINES_BOOST: f64 = 1.5;
/// Boost of the `location` field in lexical matching.
pub const LOCATION_BOOST: f64 = 1.0;

/// Weight of the vector clause in hybrid mode.
pub const HYBRID_VECTOR_WEIGHT: f64 = 0.7;
/// Weight of the lexical clause in hybrid mode.
pub const HYBRID_LEXICAL_WEIGHT: f64 = 0.3;

/// Lexical fields with boosts when location also participates in scoring.
const ALL_TEXT_FIELDS: [(&str, f64); 3] = [
    ("name", NAME_BOOST),
    ("cuisines", CUISINES_BOOST),
    ("location", LOCATION_BOOST),
];
/// Lexical fields used inside an already location-filtered scope.
const DISH_TEXT_FIELDS: [(&str, f64); 2] = [("name", NAME_BOOST), ("cuisines", CUISINES_BOOST)];

/// Fuzziness applied to keyword-mode matching.
pub const KEYWORD_FUZZINESS: &str = "AUTO";
/// Similarity used by the knn scoring script.
pub const KNN_SPACE_TYPE: &str = "cosinesimil";

/// Search mode selected by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    Semantic,
    Keyword,
    Hybrid,
}

impl SearchMode {
    /// Whether the mode needs a query embedding.
    pub fn needs_vector(self) -> bool {
        matches!(self, SearchMode::Semantic | SearchMode::Hybrid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Semantic => "semantic",
            SearchMode::Keyword => "keyword",
            SearchMode::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to build one query body.
///
/// The variant fixes which inputs exist: keyword mode has no vector, the
/// vector modes always have one.
#[derive(Debug, Clone, Copy)]
pub enum QueryPlan<'a> {
    Semantic {
        vector: &'a [f32],
        location: Option<&'a str>,
        top_k: usize,
    },
    Keyword {
        /// Raw user query, not the rewritten food terms.
        text: &'a str,
        location: Option<&'a str>,
        top_k: usize,
    },
    Hybrid {
        food_terms: &'a str,
        vector: &'a [f32],
        location: Option<&'a str>,
        top_k: usize,
    },
}

impl QueryPlan<'_> {
    pub fn mode(&self) -> SearchMode {
        match self {
            QueryPlan::Semantic { .. } => SearchMode::Semantic,
            QueryPlan::Keyword { .. } => SearchMode::Keyword,
            QueryPlan::Hybrid { .. } => SearchMode::Hybrid,
        }
    }

    pub fn top_k(&self) -> usize {
        match *self {
            QueryPlan::Semantic { top_k, .. }
            | QueryPlan::Keyword { top_k, .. }
            | QueryPlan::Hybrid { top_k, .. } => top_k,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match *self {
            QueryPlan::Semantic { location, .. }
            | QueryPlan::Keyword { location, .. }
            | QueryPlan::Hybrid { location, .. } => location,
        }
    }
}

/// Builds the store query body for `plan`.
pub fn build_query(plan: &QueryPlan<'_>) -> Value {
    let query = match *plan {
        QueryPlan::Semantic {
            vector,
            location: None,
            top_k,
        } => knn_clause(vector, top_k, None),
        QueryPlan::Semantic {
            vector,
            location: Some(location),
            ..
        } => knn_script_score(location_match(location), vector),

        QueryPlan::Keyword {
            text,
            location: None,
            ..
        } => keyword_clause(text),
        QueryPlan::Keyword {
            text,
            location: Some(location),
            ..
        } => json!({
            "bool": {
                "must": [keyword_clause(text)],
                "filter": [location_match(location)]
            }
        }),

        QueryPlan::Hybrid {
            food_terms,
            vector,
            location: None,
            top_k,
        } => json!({
            "bool": {
                "should": [
                    lexical_boosted(food_terms, &ALL_TEXT_FIELDS),
                    knn_clause(vector, top_k, Some(HYBRID_VECTOR_WEIGHT))
                ]
            }
        }),
        QueryPlan::Hybrid {
            food_terms,
            vector,
            location: Some(location),
            ..
        } => knn_script_score(
            json!({
                "bool": {
                    "must": location_match(location),
                    "should": [lexical_boosted(food_terms, &DISH_TEXT_FIELDS)]
                }
            }),
            vector,
        ),
    };

    json!({
        "size": plan.top_k(),
        "query": query,
        "_source": { "excludes": [EMBEDDING_FIELD] }
    })
}

/// `field^boost`, omitting a unit boost.
fn boosted_field(field: &str, boost: f64) -> String {
    if boost == 1.0 {
        field.to_string()
    } else {
        format!("{field}^{boost}")
    }
}

fn fields(boosts: &[(&str, f64)]) -> Vec<String> {
    boosts.iter().map(|(f, b)| boosted_field(f, *b)).collect()
}

fn location_match(location: &str) -> Value {
    json!({ "match": { LOCATION_FIELD: location } })
}

fn knn_clause(vector: &[f32], k: usize, boost: Option<f64>) -> Value {
    let mut inner = json!({ "vector": vector, "k": k });
    if let Some(boost) = boost {
        inner["boost"] = json!(boost);
    }
    json!({ "knn": { EMBEDDING_FIELD: inner } })
}

fn knn_script_score(filter: Value, vector: &[f32]) -> Value {
    json!({
        "script_score": {
            "query": filter,
            "script": {
                "lang": "knn",
                "source": "knn_score",
                "params": {
                    "field": EMBEDDING_FIELD,
                    "query_value": vector,
                    "space_type": KNN_SPACE_TYPE
                }
            }
        }
    })
}

fn keyword_clause(text: &str) -> Value {
    json!({
        "multi_match": {
            "query": text,
            "fields": fields(&ALL_TEXT_FIELDS),
            "type": "best_fields",
            "fuzziness": KEYWORD_FUZZINESS
        }
    })
}

fn lexical_boosted(text: &str, boosts: &[(&str, f64)]) -> Value {
    json!({
        "multi_match": {
            "query": text,
            "fields": fields(boosts),
            "boost": HYBRID_LEXICAL_WEIGHT
        }
    })
}
