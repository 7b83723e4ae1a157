use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;
use wikirank_core::persist::{save_snapshot, IndexPaths, MetaFile, FORMAT_VERSION};
use wikirank_core::{build_index, Document, PageRankParams};

fn build_tiny_index(dir: &std::path::Path) {
    let docs = vec![
        Document::new(1, "Rust", Some("Rust is great. rust systems programming. [[Python]]".into())),
        Document::new(2, "Python", Some("python scripting language [[Rust|rust]]".into())),
        Document::new(3, "Go", Some("go language with goroutines".into())),
    ];
    let snapshot = build_index(&docs, &PageRankParams::default()).unwrap();
    let meta = MetaFile { num_docs: 3, num_terms: 0, created_at: "2024-01-01T00:00:00Z".into(), version: FORMAT_VERSION };
    save_snapshot(&IndexPaths::new(dir), &snapshot, &meta).unwrap();
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_index(dir.path());
    let app = server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (status, json) = call(app, "/search?q=rust&pagerank=true").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 1);
    assert_eq!(arr[1]["doc_id"].as_u64().unwrap(), 2);
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn search_reports_misses() {
    let dir = tempdir().unwrap();
    build_tiny_index(dir.path());
    let app = server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (_, json) = call(app, "/search?q=haskell").await;
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
    assert_eq!(json["message"], "no relevant documents");
}

#[tokio::test]
async fn missing_index_serves_empty_corpus() {
    let dir = tempdir().unwrap();
    let app = server::build_app(dir.path().join("absent").to_string_lossy().to_string()).unwrap();

    let (status, json) = call(app.clone(), "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "empty corpus");
    let (_, json) = call(app, "/doc/1").await;
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn doc_lookup_includes_authority() {
    let dir = tempdir().unwrap();
    build_tiny_index(dir.path());
    let app = server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (_, json) = call(app, "/doc/3").await;
    assert_eq!(json["title"], "go");
    assert!(json["authority"].as_f64().unwrap() > 0.0);
}
