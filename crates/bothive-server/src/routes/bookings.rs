//! Booking REST routes, used by the tenant dashboard.
//!
//! The chat widget books through the dialogue engine; these endpoints are
//! direct CRUD for tenants managing their calendar.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use bothive_core::Error;
use bothive_store::{Booking, BookingStatus, NewBooking};

use super::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bots/{id}/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    full_name: String,
    phone: String,
    preferred_date: String,
    preferred_time: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<Booking>> {
    for (field, value) in [
        ("fullName", &req.full_name),
        ("phone", &req.phone),
        ("preferredDate", &req.preferred_date),
        ("preferredTime", &req.preferred_time),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError(Error::Validation(format!("{} is required", field))));
        }
    }
    if state.store.get_tenant(&id)?.is_none() {
        return Err(ApiError(Error::NotFound(format!("tenant {}", id))));
    }

    let booking_id = state.store.create_booking(
        &id,
        &NewBooking {
            full_name: req.full_name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: req.email,
            service: req.service,
            preferred_date: req.preferred_date.trim().to_string(),
            preferred_time: req.preferred_time.trim().to_string(),
            notes: req.notes,
        },
    )?;
    info!(tenant_id = %id, booking_id = %booking_id, "booking created via api");

    let booking = state
        .store
        .get_booking(&booking_id)?
        .ok_or_else(|| Error::Internal("booking vanished after insert".to_string()))?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    status: Option<String>,
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    if state.store.get_tenant(&id)?.is_none() {
        return Err(ApiError(Error::NotFound(format!("tenant {}", id))));
    }

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(BookingStatus::parse(raw).ok_or_else(|| {
            Error::Validation(format!("unknown status '{}'", raw))
        })?),
    };

    let bookings = state.store.list_bookings(&id, status)?;
    Ok(Json(serde_json::json!({
        "count": bookings.len(),
        "bookings": bookings,
    })))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .store
        .get_booking(&id)?
        .ok_or_else(|| Error::NotFound(format!("booking {}", id)))?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
struct StatusUpdateRequest {
    status: String,
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Booking>> {
    let status = BookingStatus::parse(&req.status)
        .ok_or_else(|| Error::Validation(format!("unknown status '{}'", req.status)))?;

    if !state.store.update_booking_status(&id, status)? {
        return Err(ApiError(Error::NotFound(format!("booking {}", id))));
    }
    info!(booking_id = %id, status = status.as_str(), "booking status updated");

    let booking = state
        .store
        .get_booking(&id)?
        .ok_or_else(|| Error::NotFound(format!("booking {}", id)))?;
    Ok(Json(booking))
}
