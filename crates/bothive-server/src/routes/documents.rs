//! Document upload and search routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use super::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bots/{id}/documents", post(upload_document))
        .route("/bots/{id}/search", post(search))
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    text: String,
    #[serde(rename = "sourceFile", default = "default_source")]
    source_file: String,
}

fn default_source() -> String {
    "document.pdf".to_string()
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UploadRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let report = state
        .orchestrator
        .replace_documents(&id, &req.text, &req.source_file)?;
    info!(
        tenant_id = %id,
        chunks = report.chunk_count,
        chars = report.char_count,
        "document indexed"
    );
    Ok(Json(serde_json::json!({
        "success": true,
        "chunkCount": report.chunk_count,
        "charCount": report.char_count,
    })))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let results = state.orchestrator.search(&id, &req.query, req.k)?;
    Ok(Json(serde_json::json!({
        "count": results.len(),
        "results": results,
    })))
}
