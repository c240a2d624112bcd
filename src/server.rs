//! Leaderboard HTTP endpoint
//!
//! `GET /scores` lists the top ten, `POST /scores` stores a submission,
//! `OPTIONS /scores` answers preflight. CORS is open to every origin. Store
//! access is blocking file IO, so it runs on tokio's blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::consts::LEADERBOARD_SIZE;
use crate::leaderboard::service;
use crate::leaderboard::{LeaderboardError, ScoreStore};

/// Listener and storage settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./leaderboard"),
        }
    }
}

impl ServerConfig {
    pub const PORT_VAR: &'static str = "SKYHOP_PORT";
    pub const DATA_DIR_VAR: &'static str = "SKYHOP_DATA_DIR";
    pub const BIND_VAR: &'static str = "SKYHOP_BIND";

    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unset or unparsable values keep their defaults
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: lookup(Self::BIND_VAR).unwrap_or(defaults.bind),
            port: lookup(Self::PORT_VAR)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            data_dir: lookup(Self::DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Build the `/scores` router over a store
pub fn router<S: ScoreStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route(
            "/scores",
            get(get_scores::<S>).post(post_score::<S>).options(preflight),
        )
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn blocking<T, F>(f: F) -> Result<T, LeaderboardError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, LeaderboardError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LeaderboardError::Transport(format!("store task failed: {e}")))?
}

fn error_response(err: LeaderboardError) -> Response {
    let status = match err {
        LeaderboardError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => {
            log::error!("Leaderboard request failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

async fn get_scores<S: ScoreStore + 'static>(State(store): State<Arc<S>>) -> Response {
    match blocking(move || service::list_scores(store.as_ref(), LEADERBOARD_SIZE)).await {
        Ok(scores) => Json(json!({ "scores": scores })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn post_score<S: ScoreStore + 'static>(State(store): State<Arc<S>>, body: Bytes) -> Response {
    let submission = match service::parse_submission(&body) {
        Ok(submission) => submission,
        Err(e) => return error_response(e),
    };

    let result = blocking(move || {
        service::submit_score(
            store.as_ref(),
            &submission,
            crate::platform::now_millis(),
            &mut rand::rng(),
        )
    })
    .await;

    match result {
        Ok(entry) => Json(json!({ "success": true, "score": entry })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}
