use axum::http::HeaderMap;
use chrono::Utc;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Caller-supplied `X-Request-Id`, or a fresh `req-<nanos>` id.
pub fn request_id(headers: &HeaderMap) -> String {
    if let Some(v) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}
