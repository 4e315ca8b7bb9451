//! Chat and conversation history routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use bothive_core::Language;
use bothive_runtime::TurnOutcome;

use super::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bots/{id}/chat", post(chat))
        .route(
            "/bots/{id}/history/{session}",
            get(get_history).delete(clear_history),
        )
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(default)]
    language: Option<String>,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<TurnOutcome>> {
    let lang = Language::parse(req.language.as_deref().unwrap_or("en"));
    let outcome = state
        .orchestrator
        .handle_turn(&id, &req.session_id, &req.message, lang)
        .await?;
    Ok(Json(outcome))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path((id, session)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let messages = state.orchestrator.history(&id, &session, None)?;
    Ok(Json(serde_json::json!({ "messages": messages })))
}

async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path((id, session)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let cleared = state.orchestrator.clear_history(&id, &session)?;
    Ok(Json(serde_json::json!({ "cleared": cleared })))
}
