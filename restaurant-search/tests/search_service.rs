use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use restaurant_search::{
    Embedder, QueryRewriter, RawHit, RewriteResult, SearchBackend, SearchError, SearchRequest,
    SearchService,
};
use serde_json::{Value, json};

type BoxFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, SearchError>> + Send + 'a>>;

const DIM: usize = 4;

/// Rewriter returning a fixed answer and counting calls.
struct StubRewriter {
    food_terms: &'static str,
    location: Option<&'static str>,
    calls: AtomicUsize,
    fail: bool,
}

impl StubRewriter {
    fn new(food_terms: &'static str, location: Option<&'static str>) -> Self {
        Self {
            food_terms,
            location,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("", None)
        }
    }
}

impl QueryRewriter for StubRewriter {
    fn rewrite<'a>(&'a self, _query: &'a str) -> BoxFut<'a, RewriteResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if self.fail {
                return Err(SearchError::Rewrite("model reply is not JSON".into()));
            }
            Ok(RewriteResult {
                food_terms: self.food_terms.to_string(),
                location: self.location.map(str::to_string),
            })
        })
    }
}

/// Embedder recording the texts it was asked to embed.
#[derive(Default)]
struct StubEmbedder {
    seen: Mutex<Vec<String>>,
}

impl StubEmbedder {
    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Embedder for StubEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFut<'a, Vec<f32>> {
        self.seen.lock().unwrap().push(text.to_string());
        Box::pin(async move { Ok(vec![0.25; DIM]) })
    }
}

enum Canned {
    Hits(Vec<Value>),
    MissingIndex,
}

/// Backend replaying canned hits and capturing query bodies.
struct StubBackend {
    canned: Canned,
    bodies: Mutex<Vec<(String, Value)>>,
}

impl StubBackend {
    fn with_hits(hits: Vec<Value>) -> Self {
        Self {
            canned: Canned::Hits(hits),
            bodies: Mutex::new(Vec::new()),
        }
    }

    fn missing_index() -> Self {
        Self {
            canned: Canned::MissingIndex,
            bodies: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    fn last_body(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().unwrap().1
    }
}

impl SearchBackend for StubBackend {
    fn search<'a>(&'a self, index: &'a str, body: Value) -> BoxFut<'a, Vec<RawHit>> {
        let size = body["size"].as_u64().unwrap_or(0) as usize;
        self.bodies.lock().unwrap().push((index.to_string(), body));
        Box::pin(async move {
            match &self.canned {
                Canned::MissingIndex => Err(SearchError::IndexNotFound {
                    index: index.to_string(),
                }),
                Canned::Hits(hits) => Ok(hits
                    .iter()
                    .take(size)
                    .map(|h| serde_json::from_value(h.clone()).unwrap())
                    .collect()),
            }
        })
    }

    fn version<'a>(&'a self) -> BoxFut<'a, String> {
        Box::pin(async move {
            match &self.canned {
                Canned::MissingIndex => Err(SearchError::StoreDecode("connection refused".into())),
                Canned::Hits(_) => Ok("2.11.0".to_string()),
            }
        })
    }
}

fn hit(name: &str, score: f64) -> Value {
    json!({
        "_index": "restaurants",
        "_id": name,
        "_score": score,
        "_source": {
            "restaurant_id": name,
            "name": name,
            "cuisines": "Street Food",
            "location": "Mumbai",
            "rating": 4.2,
            "cost_for_two": 300,
            "text_for_embedding": format!("{name} street food")
        }
    })
}

struct Harness {
    rewriter: Arc<StubRewriter>,
    embedder: Arc<StubEmbedder>,
    backend: Arc<StubBackend>,
    service: SearchService,
}

fn harness(rewriter: StubRewriter, backend: StubBackend) -> Harness {
    let rewriter = Arc::new(rewriter);
    let embedder = Arc::new(StubEmbedder::default());
    let backend = Arc::new(backend);
    let service = SearchService::new(
        rewriter.clone(),
        embedder.clone(),
        backend.clone(),
        "restaurants",
    );
    Harness {
        rewriter,
        embedder,
        backend,
        service,
    }
}

const MUMBAI_TERMS: &str = "vada pav pakoda chai hot street food fried snacks";

#[tokio::test]
async fn rainy_evening_mumbai_semantic_uses_filtered_script_score() {
    let h = harness(
        StubRewriter::new(MUMBAI_TERMS, Some("Mumbai")),
        StubBackend::with_hits(vec![hit("Aaswad", 0.91), hit("Anand Stall", 0.88)]),
    );

    let out = h
        .service
        .semantic_search(&SearchRequest::new("rainy evening Mumbai", 10))
        .await
        .unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "Aaswad");
    assert_eq!(*h.embedder.seen.lock().unwrap(), vec![MUMBAI_TERMS.to_string()]);

    let body = h.backend.last_body();
    let script_score = &body["query"]["script_score"];
    assert_eq!(script_score["query"]["match"]["location"], "Mumbai");
    assert_eq!(script_score["script"]["params"]["query_value"].as_array().unwrap().len(), DIM);
    assert_eq!(body["_source"]["excludes"], json!(["embedding"]));
}

#[tokio::test]
async fn semantic_without_location_is_plain_knn() {
    let h = harness(
        StubRewriter::new("spicy curry chilli tandoori hot", None),
        StubBackend::with_hits(vec![hit("Spice Route", 0.8)]),
    );

    h.service
        .semantic_search(&SearchRequest::new("something spicy", 5))
        .await
        .unwrap();

    let body = h.backend.last_body();
    assert_eq!(body["size"], 5);
    assert_eq!(body["query"]["knn"]["embedding"]["k"], 5);
}

#[tokio::test]
async fn keyword_mode_matches_raw_query_and_filters_on_rewritten_location() {
    let raw = "quick lunch under 200 in Bangalore";
    let h = harness(
        StubRewriter::new("quick budget tiffin darshini affordable fast casual", Some("Bangalore")),
        StubBackend::with_hits(vec![hit("MTR", 7.4)]),
    );

    h.service
        .keyword_search(&SearchRequest::new(raw, 10))
        .await
        .unwrap();

    assert_eq!(h.rewriter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.embedder.calls(), 0);

    let body = h.backend.last_body();
    let bool_q = &body["query"]["bool"];
    assert_eq!(bool_q["must"][0]["multi_match"]["query"], raw);
    assert_eq!(bool_q["filter"][0]["match"]["location"], "Bangalore");
}

#[tokio::test]
async fn hybrid_embeds_food_terms_and_combines_signals() {
    let h = harness(
        StubRewriter::new("biryani kebab rolls", None),
        StubBackend::with_hits(vec![hit("Paradise", 1.3)]),
    );

    h.service
        .hybrid_search(&SearchRequest::new("late night food", 10))
        .await
        .unwrap();

    assert_eq!(*h.embedder.seen.lock().unwrap(), vec!["biryani kebab rolls".to_string()]);
    let should = h.backend.last_body()["query"]["bool"]["should"].clone();
    assert_eq!(should.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_query_makes_no_upstream_calls() {
    let h = harness(
        StubRewriter::new("x", None),
        StubBackend::with_hits(vec![hit("A", 1.0)]),
    );

    for q in ["", "   "] {
        let err = h
            .service
            .hybrid_search(&SearchRequest::new(q, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }

    assert_eq!(h.rewriter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.embedder.calls(), 0);
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn top_k_out_of_range_is_rejected() {
    let h = harness(StubRewriter::new("x", None), StubBackend::with_hits(vec![]));

    for top_k in [-1, 0, 51, i64::MAX] {
        let err = h
            .service
            .semantic_search(&SearchRequest::new("dosa", top_k))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)), "top_k={top_k}");
    }
    assert_eq!(h.rewriter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_index_is_an_error_on_every_mode() {
    let h = harness(
        StubRewriter::new("dosa", Some("Chennai")),
        StubBackend::missing_index(),
    );
    let req = SearchRequest::new("dosa in Chennai", 10);

    let results = [
        h.service.semantic_search(&req).await,
        h.service.keyword_search(&req).await,
        h.service.hybrid_search(&req).await,
    ];
    for res in results {
        assert!(matches!(res, Err(SearchError::IndexNotFound { ref index }) if index == "restaurants"));
    }
}

#[tokio::test]
async fn rewrite_failure_stops_the_pipeline() {
    let h = harness(StubRewriter::failing(), StubBackend::with_hits(vec![hit("A", 1.0)]));

    let err = h
        .service
        .semantic_search(&SearchRequest::new("rainy evening Mumbai", 10))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Rewrite(_)));
    assert_eq!(h.embedder.calls(), 0);
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn results_are_bounded_by_top_k_and_keep_store_order() {
    let hits: Vec<Value> = (0..20).map(|i| hit(&format!("r{i}"), 1.0 - i as f64 / 100.0)).collect();
    let h = harness(StubRewriter::new("thali", None), StubBackend::with_hits(hits));

    for top_k in [1, 3, 20, 50] {
        let out = h
            .service
            .hybrid_search(&SearchRequest::new("thali", top_k))
            .await
            .unwrap();
        assert!(out.len() as i64 <= top_k);
        let names: Vec<String> = out.iter().map(|r| r.name.clone()).collect();
        let expected: Vec<String> = (0..out.len()).map(|i| format!("r{i}")).collect();
        assert_eq!(names, expected);
    }
}

#[tokio::test]
async fn queries_target_the_configured_index() {
    let h = harness(StubRewriter::new("dosa", None), StubBackend::with_hits(vec![]));
    let out = h
        .service
        .keyword_search(&SearchRequest::new("dosa", 10))
        .await
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(h.backend.bodies.lock().unwrap()[0].0, "restaurants");
}

#[tokio::test]
async fn health_reports_store_version() {
    let h = harness(StubRewriter::new("x", None), StubBackend::with_hits(vec![]));
    let report = h.service.health().await.unwrap();
    assert_eq!(report.status, "ok");
    assert_eq!(report.opensearch, "2.11.0");

    let down = harness(StubRewriter::new("x", None), StubBackend::missing_index());
    assert!(down.service.health().await.is_err());
}
