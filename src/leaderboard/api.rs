//! Transport between the game and the leaderboard endpoint
//!
//! The game only ever sees `LeaderboardApi`. In the browser it is the HTTP
//! endpoint; natively (and in tests) the store is called in-process.

use std::sync::Arc;

use super::error::LeaderboardError;
use super::record::LeaderboardEntry;
use super::service::{self, ScoreSubmission};
use super::store::ScoreStore;
use crate::consts::LEADERBOARD_SIZE;

/// Asynchronous leaderboard operations, driven from a single-threaded frame loop
#[allow(async_fn_in_trait)]
pub trait LeaderboardApi {
    /// Current top scores, best first
    async fn fetch_scores(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Persist a submission and return the stored record
    async fn post_score(&self, submission: &ScoreSubmission) -> Result<LeaderboardEntry, LeaderboardError>;
}

/// Calls the leaderboard service directly against a store
#[derive(Debug)]
pub struct LocalApi<S> {
    store: Arc<S>,
}

impl<S> Clone for LocalApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ScoreStore> LocalApi<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ScoreStore> LeaderboardApi for LocalApi<S> {
    async fn fetch_scores(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        service::list_scores(self.store.as_ref(), LEADERBOARD_SIZE)
    }

    async fn post_score(&self, submission: &ScoreSubmission) -> Result<LeaderboardEntry, LeaderboardError> {
        service::submit_score(
            self.store.as_ref(),
            submission,
            crate::platform::now_millis(),
            &mut rand::rng(),
        )
    }
}

#[cfg(target_arch = "wasm32")]
pub use http::HttpApi;

#[cfg(target_arch = "wasm32")]
mod http {
    use serde_json::Value;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::LeaderboardApi;
    use crate::leaderboard::error::LeaderboardError;
    use crate::leaderboard::record::LeaderboardEntry;
    use crate::leaderboard::service::ScoreSubmission;

    /// `fetch`-based client for the `/scores` endpoint
    #[derive(Debug, Clone)]
    pub struct HttpApi {
        endpoint: String,
    }

    fn js_error(value: JsValue) -> LeaderboardError {
        LeaderboardError::Transport(format!("{value:?}"))
    }

    impl HttpApi {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }

        async fn request(&self, method: &str, body: Option<String>) -> Result<Value, LeaderboardError> {
            let init = RequestInit::new();
            init.set_method(method);
            init.set_mode(RequestMode::Cors);
            if let Some(body) = &body {
                init.set_body(&JsValue::from_str(body));
            }

            let request = Request::new_with_str_and_init(&self.endpoint, &init).map_err(js_error)?;
            if body.is_some() {
                request
                    .headers()
                    .set("Content-Type", "application/json")
                    .map_err(js_error)?;
            }

            let window = web_sys::window()
                .ok_or_else(|| LeaderboardError::Transport("no window".into()))?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?
                .dyn_into()
                .map_err(js_error)?;
            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?
                .as_string()
                .unwrap_or_default();

            if !response.ok() {
                return Err(LeaderboardError::Transport(format!(
                    "HTTP {}: {}",
                    response.status(),
                    text
                )));
            }

            serde_json::from_str(&text).map_err(|source| LeaderboardError::Decode {
                resource: self.endpoint.clone(),
                source,
            })
        }
    }

    impl LeaderboardApi for HttpApi {
        async fn fetch_scores(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
            let body = self.request("GET", None).await?;
            let records = body
                .get("scores")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            Ok(records
                .into_iter()
                .filter_map(|record| match serde_json::from_value(record) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        log::warn!("Skipping malformed leaderboard record: {e}");
                        None
                    }
                })
                .collect())
        }

        async fn post_score(&self, submission: &ScoreSubmission) -> Result<LeaderboardEntry, LeaderboardError> {
            let payload = serde_json::to_string(submission)
                .map_err(|e| LeaderboardError::Transport(format!("failed to encode submission: {e}")))?;
            let body = self.request("POST", Some(payload)).await?;
            let record = body.get("score").cloned().unwrap_or(Value::Null);
            serde_json::from_value(record).map_err(|source| LeaderboardError::Decode {
                resource: self.endpoint.clone(),
                source,
            })
        }
    }
}
