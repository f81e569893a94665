use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::queries::{self, BookingFilters};
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, CreatedBy};
use crate::services::booking::{self, CreateBookingInput};
use crate::services::notifications::{customer_confirmation, provider_notice};
use crate::state::AppState;

use super::auth::authenticate_provider;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_id: String,
    pub selected_date: String,
    pub selected_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub date_time: String,
    pub status: BookingStatus,
    pub created_by: CreatedBy,
    pub service_name: String,
    pub service_price: f64,
    pub service_description: Option<String>,
    pub address: String,
    pub customer_name: String,
    pub customer_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            date_time: b.date_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            status: b.status,
            created_by: b.created_by,
            service_name: b.service_name_snapshot,
            service_price: b.service_price_snapshot,
            service_description: b.service_description_snapshot,
            address: b.address_snapshot,
            customer_name: b.customer_name_snapshot,
            customer_email: b.customer_email_snapshot,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn create_and_notify(
    state: &Arc<AppState>,
    input: &CreateBookingInput,
) -> Result<Booking, AppError> {
    let booking = {
        let mut db = state.db.lock().unwrap();
        booking::create_booking(&mut db, input, Local::now().naive_local())?
    };

    // The booking is committed at this point; a failed lookup here only
    // costs the provider notice, never the caller's 201.
    let provider_email = {
        let db = state.db.lock().unwrap();
        match queries::get_provider_by_id(&db, &booking.provider_id) {
            Ok(provider) => provider.map(|p| p.email),
            Err(e) => {
                tracing::warn!(error = %e, booking_id = %booking.id, "provider lookup for notice failed");
                None
            }
        }
    };

    // Best effort; a failed email never unwinds the booking.
    let notifier = Arc::clone(&state.notifier);
    let notify_booking = booking.clone();
    tokio::spawn(async move {
        let (subject, body) = customer_confirmation(&notify_booking);
        if let Err(e) = notifier
            .send(&notify_booking.customer_email_snapshot, &subject, &body)
            .await
        {
            tracing::warn!(error = %e, booking_id = %notify_booking.id, "customer confirmation failed");
        }

        if let Some(to) = provider_email {
            let (subject, body) = provider_notice(&notify_booking);
            if let Err(e) = notifier.send(&to, &subject, &body).await {
                tracing::warn!(error = %e, booking_id = %notify_booking.id, "provider notice failed");
            }
        }
    });

    Ok(booking)
}

fn created_response(booking: Booking) -> (StatusCode, Json<serde_json::Value>) {
    let id = booking.id.clone();
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "bookingId": id,
            "booking": BookingResponse::from(booking),
        })),
    )
}

// POST /api/bookings — public booking by a customer.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let input = CreateBookingInput {
        customer_name: body.name,
        customer_email: body.email,
        customer_phone: body.phone,
        service_id: body.service_id,
        selected_date: body.selected_date,
        selected_time: body.selected_time,
        created_by: CreatedBy::Customer,
        requesting_provider_id: None,
    };
    let booking = create_and_notify(&state, &input)?;
    Ok(created_response(booking))
}

// POST /api/bookings/provider — provider books on a customer's behalf.
pub async fn create_provider_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let provider = {
        let db = state.db.lock().unwrap();
        authenticate_provider(&db, &headers)?
    };

    let input = CreateBookingInput {
        customer_name: body.name,
        customer_email: body.email,
        customer_phone: body.phone,
        service_id: body.service_id,
        selected_date: body.selected_date,
        selected_time: body.selected_time,
        created_by: CreatedBy::Provider,
        requesting_provider_id: Some(provider.id),
    };
    let booking = create_and_notify(&state, &input)?;
    Ok(created_response(booking))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

fn parse_filter_date(value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    value
        .as_deref()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("invalid date filter (expected YYYY-MM-DD)".to_string()))
        })
        .transpose()
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|s| BookingStatus::parse(s).map_err(|e| AppError::Validation(e.to_string())))
        .transpose()?;

    let filters = BookingFilters {
        start_date: parse_filter_date(&query.start_date)?,
        end_date: parse_filter_date(&query.end_date)?,
        status: status.map(|s| s.as_str()),
    };

    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let bookings = queries::list_bookings(&db, &provider.id, &filters)?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// PATCH /api/bookings/:id/status
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let new_status =
        BookingStatus::parse(&body.status).map_err(|e| AppError::Validation(e.to_string()))?;

    let db = state.db.lock().unwrap();
    let provider = authenticate_provider(&db, &headers)?;
    let booking = booking::update_booking_status(
        &db,
        &booking_id,
        new_status,
        &provider.id,
        Local::now().naive_local(),
    )?;
    Ok(Json(booking.into()))
}
