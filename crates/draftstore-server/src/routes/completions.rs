//! AI drafting proxy route
//!
//! Forwards chat-completion requests verbatim to the configured upstream API
//! and relays whatever comes back, status included. Holds no state and never
//! composes prompts.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    AppState,
    error::{ApiError, Result},
};

/// Create completion proxy routes
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(proxy_completion))
}

/// Relay one drafting request to the completions API
async fn proxy_completion(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Response> {
    let api_key = state
        .config
        .completions_api_key
        .as_deref()
        .ok_or_else(|| ApiError::Config("OPENAI_API_KEY not set".into()))?;

    debug!(url = %state.config.completions_url, "Forwarding completion request");

    let upstream = state
        .http
        .post(&state.config.completions_url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let payload: Value = upstream.json().await?;

    if status.is_client_error() || status.is_server_error() {
        error!(%status, "Completions API returned an error");
    }

    Ok((status, Json(payload)).into_response())
}
