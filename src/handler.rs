//! HTTP Request Handlers
//!
//! `POST /chat` runs a question through mapper, executor and shaper.

use axum::{
    body::Bytes,
    extract::State,
    response::{Html, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::Store;
use crate::error::{ChatError, ChatResult};
use crate::pattern;
use crate::server::AppState;
use crate::shaper::{self, QueryResult};

/// The chat page served at `/`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Answer one question against the store.
///
/// Unrecognized text becomes [`ChatError::Unrecognized`]; store faults become
/// [`ChatError::Execution`]. Everything else, including "nothing found", is an
/// `Ok` answer.
pub async fn answer(store: &Store, text: &str) -> ChatResult<QueryResult> {
    let Some(parsed) = pattern::parse(text) else {
        tracing::warn!("Unrecognized query: {}", text);
        return Err(ChatError::Unrecognized);
    };

    tracing::debug!("Matched {} with {:?}", parsed.kind, parsed.params);

    let rows = store.execute(&parsed).await?;
    Ok(shaper::shape(parsed.kind, rows))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<QueryResult>, ChatError> {
    // Anything that is not an object with a string `query` counts as missing.
    let query = serde_json::from_slice::<ChatRequest>(&body)
        .ok()
        .and_then(|request| request.query)
        .ok_or_else(|| {
            tracing::warn!("Request without a query ({} bytes)", body.len());
            ChatError::MissingQuery
        })?;

    tracing::info!("Answering: {}", query);

    match answer(&state.store, &query).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if !e.is_client_error() {
                tracing::error!("Query failed: {}", e);
            }
            Err(e)
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
