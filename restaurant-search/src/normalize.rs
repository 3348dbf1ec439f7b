//! Maps raw store hits into [`RestaurantRecord`]s.
//!
//! Order is preserved; missing fields fall back to empty/zero values, while a
//! missing score stays `None`.

use serde_json::{Map, Value};

use crate::structs::restaurant::{RawHit, RestaurantRecord};

/// Normalizes hits in store order.
pub fn normalize_hits(hits: Vec<RawHit>) -> Vec<RestaurantRecord> {
    hits.into_iter().map(normalize_hit).collect()
}

/// Normalizes one hit.
pub fn normalize_hit(hit: RawHit) -> RestaurantRecord {
    let src = &hit.source;
    RestaurantRecord {
        restaurant_id: text(src, "restaurant_id"),
        name: text(src, "name"),
        cuisines: text(src, "cuisines"),
        location: text(src, "location"),
        rating: src.get("rating").and_then(number_f64).unwrap_or(0.0),
        cost_for_two: src.get("cost_for_two").and_then(number_i64).unwrap_or(0),
        text_for_embedding: text(src, "text_for_embedding"),
        score: hit.score,
    }
}

/// String field; numeric ids are rendered as text, anything else is empty.
fn text(src: &Map<String, Value>, key: &str) -> String {
    match src.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
