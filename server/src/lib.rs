use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use scoop_core::{Engine, EngineConfig, RawRecord, SearchHit, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct FlavorParams {
    /// Free-text query; the frontend sends it as `title`.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub min_rating: f64,
    /// Comma-separated excluded ingredient categories, e.g. `nuts,dairy`.
    #[serde(default)]
    pub exclude: String,
}

#[derive(Serialize)]
pub struct FlavorResult {
    /// 1-based rank of the result.
    pub recommendation: usize,
    #[serde(flatten)]
    pub hit: SearchHit,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Corpus file layout: `{"flavors": [ ...records... ]}`.
#[derive(Deserialize)]
struct CorpusFile {
    flavors: Vec<RawRecord>,
}

/// Load the flavor corpus from its JSON file.
pub fn load_corpus(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .with_context(|| format!("opening corpus file {}", path.display()))?;
    let corpus: CorpusFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing corpus file {}", path.display()))?;
    Ok(corpus.flavors)
}

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config file {}", path.display()))?;
            let config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config file {}", path.display()))?;
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

pub fn build_app(engine: Arc<Engine>) -> Router {
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
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/flavors", get(flavors_handler))
        .with_state(AppState { engine })
        .layer(cors)
}

pub async fn flavors_handler(
    State(state): State<AppState>,
    Query(params): Query<FlavorParams>,
) -> Json<Vec<FlavorResult>> {
    let opts = SearchOptions {
        min_rating: params.min_rating,
        exclude: params
            .exclude
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    };
    let hits = state.engine.search(&params.title, &opts);
    tracing::debug!(query = %params.title, hits = hits.len(), "search served");

    let results = hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| FlavorResult {
            recommendation: i + 1,
            hit,
        })
        .collect();
    Json(results)
}
