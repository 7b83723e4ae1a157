use anyhow::Result;
use axum::{extract::{Path, Query, State}, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wikirank_core::persist::{load_snapshot_lenient, IndexPaths};
use wikirank_core::query::MAX_RESULTS;
use wikirank_core::{DocId, Querier, SearchOutcome};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub pagerank: bool,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { MAX_RESULTS }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub querier: Arc<Querier>,
}

pub fn build_app(index_dir: String) -> Result<Router> {
    let snapshot = load_snapshot_lenient(&IndexPaths::new(&index_dir));
    tracing::info!(index_dir, num_docs = snapshot.num_docs(), "index loaded");
    Ok(router(Querier::new(snapshot)))
}

pub fn router(querier: Querier) -> Router {
    let app_state = AppState { querier: Arc::new(querier) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let outcome = state.querier.search_top(&params.q, params.pagerank, params.k);
    let (results, message) = match outcome {
        SearchOutcome::Ranked(hits) => (
            hits.into_iter().map(|h| SearchHit { doc_id: h.doc_id, score: h.score, title: h.title }).collect(),
            None,
        ),
        SearchOutcome::NoRelevantDocuments => (Vec::new(), Some("no relevant documents".to_string())),
        SearchOutcome::EmptyCorpus => (Vec::new(), Some("empty corpus".to_string())),
    };
    let took_s = start.elapsed().as_secs_f64();
    tracing::debug!(query = %params.q, hits = results.len(), took_s, "search");
    Json(SearchResponse { query: params.q, took_s, total_hits: results.len(), results, message })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Json<serde_json::Value> {
    let index = state.querier.index();
    if let Some(title) = index.titles.get(&doc_id) {
        return Json(serde_json::json!({
            "doc_id": doc_id,
            "title": title,
            "authority": index.authority.get(&doc_id),
        }));
    }
    Json(serde_json::json!({ "error": "not found" }))
}
