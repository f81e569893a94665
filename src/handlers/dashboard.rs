use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::dashboard::{self, RevenueChart};
use crate::state::AppState;

use super::auth::authenticate_provider;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub today_appointments: i64,
    pub upcoming_appointments: i64,
    pub monthly_revenue: f64,
    pub active_services: i64,
}

// GET /api/dashboard/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let stats = dashboard::get_stats(&db, &provider.id, Local::now().naive_local())?;

    Ok(Json(StatsResponse {
        today_appointments: stats.today_appointments,
        upcoming_appointments: stats.upcoming_appointments,
        monthly_revenue: stats.monthly_revenue,
        active_services: stats.active_services,
    }))
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub days: Option<i64>,
}

// GET /api/dashboard/revenue-chart?days=30
pub async fn revenue_chart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ChartQuery>,
) -> Result<Json<RevenueChart>, AppError> {
    let days = query.days.unwrap_or(30);

    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let chart = dashboard::get_revenue_chart(&db, &provider.id, days, Local::now().naive_local())?;
    Ok(Json(chart))
}
