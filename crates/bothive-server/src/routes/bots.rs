//! Tenant ("bot") management routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use bothive_core::Error;
use bothive_store::Tenant;

use super::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bots", post(create_bot))
        .route("/bots/{id}", get(get_bot))
}

#[derive(Debug, Deserialize)]
struct CreateBotRequest {
    name: String,
    #[serde(default)]
    website: Option<String>,
}

async fn create_bot(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBotRequest>,
) -> ApiResult<Json<Tenant>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError(Error::Validation("name is required".to_string())));
    }

    let id = state.store.create_tenant(name, req.website.as_deref())?;
    info!(tenant_id = %id, name, "bot created");

    let tenant = state
        .store
        .get_tenant(&id)?
        .ok_or_else(|| Error::Internal("tenant vanished after insert".to_string()))?;
    Ok(Json(tenant))
}

async fn get_bot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Tenant>> {
    let tenant = state
        .store
        .get_tenant(&id)?
        .ok_or_else(|| Error::NotFound(format!("tenant {}", id)))?;
    Ok(Json(tenant))
}
