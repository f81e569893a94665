use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::service::validate_service_fields;
use crate::models::Service;
use crate::state::AppState;

use super::auth::authenticate_provider;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        Self {
            id: s.id,
            name: s.name,
            price: s.price,
            duration_minutes: s.duration_minutes,
            is_active: s.is_active,
            description: s.description,
            created_at: s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: s.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn validated(body: &ServiceRequest) -> Result<(), AppError> {
    validate_service_fields(
        &body.name,
        body.price,
        body.duration_minutes,
        body.description.as_deref(),
    )
    .map_err(|e| AppError::Validation(e.to_string()))
}

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let services = queries::list_services(&db, &provider.id)?;
    Ok(Json(services.into_iter().map(Into::into).collect()))
}

// POST /api/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    validated(&body)?;

    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;

    let now = Local::now().naive_local();
    let service = Service {
        id: uuid::Uuid::new_v4().to_string(),
        provider_id: provider.id,
        name: body.name.trim().to_string(),
        price: body.price,
        duration_minutes: body.duration_minutes,
        is_active: body.is_active.unwrap_or(true),
        description: body.description.filter(|d| !d.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    queries::insert_service(&db, &service)?;

    Ok((StatusCode::CREATED, Json(service.into())))
}

// PUT /api/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(service_id): Path<String>,
    Json(body): Json<ServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    validated(&body)?;

    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;

    let existing = queries::get_service_by_id(&db, &service_id)?
        .filter(|s| s.provider_id == provider.id)
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    let service = Service {
        name: body.name.trim().to_string(),
        price: body.price,
        duration_minutes: body.duration_minutes,
        is_active: body.is_active.unwrap_or(existing.is_active),
        description: body.description.filter(|d| !d.trim().is_empty()),
        updated_at: Local::now().naive_local(),
        ..existing
    };
    queries::update_service(&db, &service)?;

    Ok(Json(service.into()))
}

// DELETE /api/services/:id — soft toggle; bookings keep their snapshots.
pub async fn deactivate_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(service_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;

    let now = Local::now().naive_local();
    if !queries::deactivate_service(&db, &provider.id, &service_id, &now)? {
        return Err(AppError::NotFound("service not found".to_string()));
    }
    Ok(Json(serde_json::json!({"ok": true})))
}
