use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use restaurant_search::HealthReport;
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, request_id::request_id},
    error_handler::{AppError, AppResult},
};

/// `GET /health`: store version on success, 503 otherwise.
pub async fn health_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<HealthReport>> {
    let request_id = request_id(&headers);

    match state.search.health().await {
        Ok(report) => {
            debug!(
                request_id = %request_id,
                opensearch = %report.opensearch,
                "health_route: ok"
            );
            Ok(Json(report))
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                "health_route: store unreachable"
            );
            Err(AppError::ServiceUnavailable(err.to_string()))
        }
    }
}
