//! `OpenSearchClient` against an in-process fake node.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use restaurant_search::{OpenSearchClient, SearchBackend, SearchError};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn cluster_info() -> Json<Value> {
    Json(json!({
        "name": "node-1",
        "cluster_name": "docker-cluster",
        "version": {"distribution": "opensearch", "number": "2.11.0"}
    }))
}

async fn search(Path(index): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
    match index.as_str() {
        "restaurants" => {
            let size = body["size"].as_u64().unwrap_or(10) as usize;
            let hits: Vec<Value> = [("a", Some(2.5)), ("b", None), ("c", Some(0.5))]
                .into_iter()
                .take(size)
                .map(|(id, score)| {
                    json!({
                        "_index": "restaurants",
                        "_id": id,
                        "_score": score,
                        "_source": {"restaurant_id": id, "name": id.to_uppercase()}
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({"took": 1, "hits": {"hits": hits}})))
        }
        "broken" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"type": "parsing_exception"}, "status": 400})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {"type": "index_not_found_exception", "index": index},
                "status": 404
            })),
        ),
    }
}

async fn spawn_fake_node() -> SocketAddr {
    let app = Router::new()
        .route("/", get(cluster_info))
        .route("/{index}/_search", post(search));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> OpenSearchClient {
    let addr = spawn_fake_node().await;
    OpenSearchClient::with_base_url(format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn search_returns_hits_in_store_order() {
    let cli = client().await;
    let hits = cli
        .search("restaurants", json!({"size": 10, "query": {"match_all": {}}}))
        .await
        .unwrap();

    let ids: Vec<_> = hits
        .iter()
        .map(|h| h.source["restaurant_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(hits[0].score, Some(2.5));
    assert_eq!(hits[1].score, None);
}

#[tokio::test]
async fn missing_index_maps_to_index_not_found() {
    let cli = client().await;
    let err = cli
        .search("nope", json!({"size": 1, "query": {"match_all": {}}}))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::IndexNotFound { ref index } if index == "nope"));
}

#[tokio::test]
async fn other_failures_keep_status_and_body_snippet() {
    let cli = client().await;
    let err = cli
        .search("broken", json!({"size": 1}))
        .await
        .unwrap_err();
    match err {
        SearchError::StoreHttp { status, snippet, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert!(snippet.contains("parsing_exception"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn version_reads_cluster_info() {
    let cli = client().await;
    assert_eq!(cli.version().await.unwrap(), "2.11.0");
}

#[tokio::test]
async fn unreachable_node_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cli = OpenSearchClient::with_base_url(format!("http://{addr}")).unwrap();
    assert!(matches!(
        cli.version().await,
        Err(SearchError::StoreTransport(_))
    ));
}
