use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::booking;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub provider_id: String,
    pub service_id: String,
    pub date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub date: String,
    pub available_slots: Vec<String>,
}

// GET /api/available-slots?providerId=..&serviceId=..&date=YYYY-MM-DD
pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = chrono::NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("invalid date (expected YYYY-MM-DD)".to_string()))?;

    let db = state.db.lock().unwrap();
    let available_slots =
        booking::get_available_slots(&db, &query.provider_id, &query.service_id, date)?;

    Ok(Json(SlotsResponse {
        date: query.date,
        available_slots,
    }))
}
