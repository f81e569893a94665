use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::authenticate_provider;

#[derive(Deserialize)]
pub struct CustomerSearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSearchResult {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub booking_count: i64,
}

// GET /api/customers/search?q= — lookup among the provider's own past
// customers, for booking on their behalf.
pub async fn search_customers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CustomerSearchQuery>,
) -> Result<Json<Vec<CustomerSearchResult>>, AppError> {
    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;

    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("search query is required".to_string()))?;

    let results = queries::search_customers(&db, &provider.id, q)?;
    Ok(Json(
        results
            .into_iter()
            .map(|(c, booking_count)| CustomerSearchResult {
                id: c.id,
                name: c.name,
                email: c.email,
                phone: c.phone,
                booking_count,
            })
            .collect(),
    ))
}
