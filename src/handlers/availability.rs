use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AvailabilityWindow, Weekday};
use crate::services::availability;
use crate::state::AppState;

use super::auth::authenticate_provider;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRequest {
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
}

impl WindowRequest {
    fn weekday(&self) -> Result<Weekday, AppError> {
        Weekday::parse(&self.weekday).map_err(|e| AppError::Validation(e.to_string()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResponse {
    pub id: String,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
}

impl From<AvailabilityWindow> for WindowResponse {
    fn from(w: AvailabilityWindow) -> Self {
        Self {
            id: w.id,
            weekday: w.weekday,
            start_time: w.start_time,
            end_time: w.end_time,
        }
    }
}

// GET /api/availability
pub async fn list_windows(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<WindowResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let windows = availability::list_windows(&db, &provider.id)?;
    Ok(Json(windows.into_iter().map(Into::into).collect()))
}

// GET /api/providers/:id/availability — public read for the booking page.
pub async fn list_provider_windows(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<Json<Vec<WindowResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let windows = availability::list_windows(&db, &provider_id)?;
    Ok(Json(windows.into_iter().map(Into::into).collect()))
}

// POST /api/availability
pub async fn create_window(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowRequest>,
) -> Result<(StatusCode, Json<WindowResponse>), AppError> {
    let mut db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let window = availability::create_window(
        &mut db,
        &provider.id,
        body.weekday()?,
        &body.start_time,
        &body.end_time,
    )?;
    Ok((StatusCode::CREATED, Json(window.into())))
}

// PUT /api/availability/:id
pub async fn update_window(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(window_id): Path<String>,
    Json(body): Json<WindowRequest>,
) -> Result<Json<WindowResponse>, AppError> {
    let mut db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let window = availability::update_window(
        &mut db,
        &provider.id,
        &window_id,
        body.weekday()?,
        &body.start_time,
        &body.end_time,
    )?;
    Ok(Json(window.into()))
}

// DELETE /api/availability/:id
pub async fn delete_window(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(window_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    availability::delete_window(&db, &provider.id, &window_id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
