//! HTTP handlers for the ingestion API.

use crate::web::error::ApiError;
use crate::web::extract::{JsonBody, PathParam, QueryParams};
use crate::web::models::{InsertResponse, NewReading, ReadingStats, StoredReading, TimeRange};
use crate::web::store::ReadingStore;
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReadingStore>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<ReadingStore>, api_key: Option<String>) -> Self {
        Self {
            store,
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Greeting at the root path.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "Hello": "World" }))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "sensorlink",
        "version": env!("CARGO_PKG_VERSION"),
        "readings": state.store.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Store one reading.
pub async fn add_reading(
    State(state): State<AppState>,
    JsonBody(reading): JsonBody<NewReading>,
) -> Result<(StatusCode, Json<InsertResponse>), ApiError> {
    if !reading.temperature.is_finite() {
        return Err(ApiError::BadRequest("temperature must be a finite number".to_string()));
    }

    let stored = state.store.insert(reading).await;
    info!(id = %stored.id, temperature = stored.temperature, "reading stored");

    Ok((StatusCode::CREATED, Json(InsertResponse::inserted(stored.id))))
}

/// Readings in a time window, oldest first.
pub async fn list_readings(
    State(state): State<AppState>,
    QueryParams(range): QueryParams<TimeRange>,
) -> Result<Json<Vec<StoredReading>>, ApiError> {
    check_range(&range)?;
    let readings = state.store.list(range).await;
    debug!(count = readings.len(), "listing readings");
    Ok(Json(readings))
}

/// Mean and maximum per metric over a time window.
pub async fn reading_stats(
    State(state): State<AppState>,
    QueryParams(range): QueryParams<TimeRange>,
) -> Result<Json<ReadingStats>, ApiError> {
    check_range(&range)?;
    Ok(Json(state.store.stats(range).await))
}

pub async fn get_reading(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<StoredReading>, ApiError> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Reading {} not found", id)))
}

pub async fn delete_reading(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete(id).await {
        return Err(ApiError::NotFound(format!("Reading {} not found", id)));
    }

    info!(id = %id, "reading deleted");
    Ok(Json(json!({
        "status": "Data deleted",
        "id": id,
    })))
}

fn check_range(range: &TimeRange) -> Result<(), ApiError> {
    if range.is_inverted() {
        return Err(ApiError::BadRequest("start must not be after end".to_string()));
    }
    Ok(())
}
