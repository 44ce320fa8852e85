use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info};

mod metrics;

use phonoscribe::{Engine, EngineConfig, Mode, Resolution};

#[derive(Parser, Debug)]
#[command(name = "phonoscribe-server")]
#[command(about = "HTTP server for pronunciation resolution")]
struct Params {
    /// Path to the pronunciation dictionary file (downloaded if missing).
    #[arg(short = 'd', long = "dict", default_value = "./data/cmudict-0.7b")]
    dict_path: PathBuf,

    /// Directory for per-word lookup records.
    #[arg(long = "cache-dir", default_value = "./data/lookup-cache")]
    cache_dir: PathBuf,

    /// Directory for materialized pronunciation audio.
    #[arg(long = "audio-dir", default_value = "./data/audio-cache")]
    audio_dir: PathBuf,

    /// Host interface to bind to.
    #[arg(long = "host", default_value = "127.0.0.1")]
    host: String,

    /// TCP port to listen on.
    #[arg(long = "port", default_value_t = 8080)]
    port: u16,
}

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

#[derive(Debug, Deserialize)]
struct ResolveBody {
    text: String,
    #[serde(default)]
    mode: Mode,
}

#[derive(Debug, Serialize)]
struct DictionaryResponse {
    entries: usize,
}

#[derive(Debug, Serialize)]
struct InvalidateResponse {
    removed: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[tokio::main]
async fn main() {
    phonoscribe::init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "phonoscribe-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    metrics::init();

    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .context("invalid host/port bind address")?;

    let audio_dir = params.audio_dir.clone();
    let engine = Engine::new(EngineConfig {
        dict_path: params.dict_path,
        cache_dir: params.cache_dir,
        audio_dir: params.audio_dir,
    })
    .await
    .context("failed to initialize resolution engine")?;

    info!(entries = engine.dictionary_size(), "engine ready");

    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/v1/dictionary", get(dictionary_info))
        .route("/v1/dictionary/reload", post(dictionary_reload))
        .route("/v1/resolve", post(resolve))
        .route("/v1/lookup/{word}", get(lookup).delete(invalidate))
        .route("/v1/lookup/{word}/cached", get(lookup_cached))
        .nest_service("/v1/audio", ServeDir::new(audio_dir))
        .route_layer(from_fn(metrics::track_http_metrics))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        );

    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn root() -> &'static str {
    "phonoscribe-server: POST /v1/resolve {text, mode}; GET /v1/lookup/{word}"
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dictionary_info(State(state): State<AppState>) -> Json<DictionaryResponse> {
    Json(DictionaryResponse {
        entries: state.engine.dictionary_size(),
    })
}

async fn dictionary_reload(
    State(state): State<AppState>,
) -> std::result::Result<Json<DictionaryResponse>, AppError> {
    let entries = state
        .engine
        .reload_dictionary()
        .map_err(|err| AppError::internal(err.to_string()))?;

    Ok(Json(DictionaryResponse { entries }))
}

async fn resolve(
    State(state): State<AppState>,
    Json(body): Json<ResolveBody>,
) -> std::result::Result<Json<Resolution>, AppError> {
    if body.text.trim().is_empty() {
        return Err(AppError::bad_request("text must not be empty"));
    }

    let resolution = state
        .engine
        .resolve(&body.text, body.mode)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    if let Resolution::Lookup(lookup) = &resolution {
        metrics::record_lookup(lookup.exists);
    }

    Ok(Json(resolution))
}

async fn lookup(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> std::result::Result<Json<phonoscribe::LookupResult>, AppError> {
    if word.trim().is_empty() {
        return Err(AppError::bad_request("word must not be empty"));
    }

    let result = state
        .engine
        .lookup_word(&word)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    metrics::record_lookup(result.exists);
    Ok(Json(result))
}

async fn lookup_cached(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Json<phonoscribe::LookupResult> {
    Json(state.engine.lookup_word_cache_only(&word).await)
}

async fn invalidate(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> std::result::Result<Json<InvalidateResponse>, AppError> {
    let removed = state
        .engine
        .invalidate_lookup(&word)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    Ok(Json(InvalidateResponse { removed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_body_defaults_mode_to_cmu() -> anyhow::Result<()> {
        let body: ResolveBody = serde_json::from_str(r#"{"text": "the cat"}"#)?;
        assert_eq!(body.mode, Mode::Cmu);
        Ok(())
    }

    #[test]
    fn resolve_body_accepts_online_mode() -> anyhow::Result<()> {
        let body: ResolveBody =
            serde_json::from_str(r#"{"text": "cat", "mode": "online-dictionary"}"#)?;
        assert_eq!(body.mode, Mode::OnlineDictionary);
        Ok(())
    }
}
