use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use restaurant_search::{RestaurantRecord, SearchMode, SearchRequest};
use tracing::{debug, error, warn};

use crate::{
    core::{app_state::AppState, request_id::request_id},
    error_handler::{AppError, AppResult},
};

type SearchPayload = Result<Json<SearchRequest>, JsonRejection>;

/// `POST /search/semantic`
pub async fn semantic_search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: SearchPayload,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    run(SearchMode::Semantic, &state, &headers, payload).await
}

/// `POST /search/keyword`
pub async fn keyword_search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: SearchPayload,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    run(SearchMode::Keyword, &state, &headers, payload).await
}

/// `POST /search/hybrid`
pub async fn hybrid_search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: SearchPayload,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    run(SearchMode::Hybrid, &state, &headers, payload).await
}

async fn run(
    mode: SearchMode,
    state: &AppState,
    headers: &HeaderMap,
    payload: SearchPayload,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    let request_id = request_id(headers);

    let Json(req) = payload.map_err(|rejection| {
        warn!(
            request_id = %request_id,
            %mode,
            error = %rejection.body_text(),
            "search_route: rejected body"
        );
        AppError::from(rejection)
    })?;

    debug!(
        request_id = %request_id,
        %mode,
        query = %req.query,
        top_k = req.top_k,
        "search_route: start"
    );

    let result = match mode {
        SearchMode::Semantic => state.search.semantic_search(&req).await,
        SearchMode::Keyword => state.search.keyword_search(&req).await,
        SearchMode::Hybrid => state.search.hybrid_search(&req).await,
    };

    match result {
        Ok(records) => {
            debug!(
                request_id = %request_id,
                %mode,
                hits = records.len(),
                "search_route: success"
            );
            Ok(Json(records))
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                %mode,
                error = %err,
                "search_route: search failed"
            );
            Err(err.into())
        }
    }
}
