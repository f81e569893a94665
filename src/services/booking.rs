//! Available-slots query, pre-commit conflict check, and the booking
//! transaction itself.
//!
//! The commit path re-derives the slot set inside an IMMEDIATE transaction
//! immediately before the insert, so the check-then-act race between "show
//! slots" and "book" cannot produce two bookings over the same provider time.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::customer::validate_customer_fields;
use crate::models::{Booking, BookingStatus, CreatedBy, Weekday};
use crate::services::slots::{compute_slots, Interval, SLOT_STEP_MINUTES};

/// Free start times for (provider, service, date). Unknown or inactive
/// services and days without windows yield an empty list rather than an
/// error; the booking UI treats both as "nothing bookable".
pub fn get_available_slots(
    conn: &Connection,
    provider_id: &str,
    service_id: &str,
    date: NaiveDate,
) -> Result<Vec<String>, AppError> {
    let weekday = Weekday::from_date(date);
    let windows = queries::get_windows_for_weekday(conn, provider_id, weekday)?;
    if windows.is_empty() {
        return Ok(Vec::new());
    }

    let service = match queries::get_service_by_id(conn, service_id)? {
        Some(s) if s.is_active && s.provider_id == provider_id => s,
        _ => return Ok(Vec::new()),
    };

    let busy: Vec<Interval> = queries::get_busy_intervals_for_day(conn, provider_id, date)?
        .into_iter()
        .map(|(dt, duration)| {
            let start = (dt.hour() * 60 + dt.minute()) as i32;
            Interval { start, end: start + duration }
        })
        .collect();

    let window_spans: Vec<(String, String)> = windows
        .into_iter()
        .map(|w| (w.start_time, w.end_time))
        .collect();

    Ok(compute_slots(
        &window_spans,
        service.duration_minutes,
        &busy,
        SLOT_STEP_MINUTES,
    ))
}

/// The authoritative pre-commit gate: a candidate time is free iff it is a
/// member of the freshly computed slot set for its date.
pub fn is_time_slot_available(
    conn: &Connection,
    provider_id: &str,
    service_id: &str,
    date_time: NaiveDateTime,
) -> Result<bool, AppError> {
    let time = date_time.format("%H:%M").to_string();
    let slots = get_available_slots(conn, provider_id, service_id, date_time.date())?;
    Ok(slots.contains(&time))
}

pub struct CreateBookingInput {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_id: String,
    pub selected_date: String,
    pub selected_time: String,
    pub created_by: CreatedBy,
    /// Set when a provider books on a customer's behalf; the service must
    /// then belong to this provider.
    pub requesting_provider_id: Option<String>,
}

pub fn create_booking(
    conn: &mut Connection,
    input: &CreateBookingInput,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    validate_customer_fields(&input.customer_name, &input.customer_email, &input.customer_phone)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let date = NaiveDate::parse_from_str(&input.selected_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("invalid date (expected YYYY-MM-DD)".to_string()))?;
    let time = chrono::NaiveTime::parse_from_str(&input.selected_time, "%H:%M")
        .map_err(|_| AppError::Validation("invalid time (expected HH:MM)".to_string()))?;
    let date_time = date.and_time(time);

    // Customer resolution happens after this check, so a rejected booking
    // leaves no customer row behind.
    if date_time <= now {
        return Err(AppError::Validation("cannot book a past date".to_string()));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let service = queries::get_service_by_id(&tx, &input.service_id)?
        .filter(|s| {
            input
                .requesting_provider_id
                .as_deref()
                .map_or(true, |pid| s.provider_id == pid)
        })
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    if !service.is_active {
        return Err(AppError::Validation(
            "service is not available for booking".to_string(),
        ));
    }

    let provider = queries::get_provider_by_id(&tx, &service.provider_id)?
        .ok_or_else(|| AppError::NotFound("provider not found".to_string()))?;

    if !is_time_slot_available(&tx, &provider.id, &service.id, date_time)? {
        return Err(AppError::Conflict(
            "slot is no longer available, please pick another time".to_string(),
        ));
    }

    let customer = queries::find_or_create_customer(
        &tx,
        input.customer_name.trim(),
        &input.customer_email.to_lowercase(),
        input.customer_phone.trim(),
        &now,
    )?;

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        provider_id: provider.id.clone(),
        service_id: service.id.clone(),
        customer_id: customer.id.clone(),
        date_time,
        status: BookingStatus::Scheduled,
        created_by: input.created_by,
        address_snapshot: provider.address.clone(),
        service_name_snapshot: service.name.clone(),
        service_price_snapshot: service.price,
        service_description_snapshot: service.description.clone(),
        customer_name_snapshot: customer.name.clone(),
        customer_email_snapshot: customer.email.clone(),
        created_at: now,
        updated_at: now,
    };
    queries::insert_booking(&tx, &booking)?;
    tx.commit()?;

    Ok(booking)
}

/// SCHEDULED → {COMPLETED, CANCELLED, NO_SHOW}, one-shot, and only within
/// 30 days of the appointment time.
pub fn update_booking_status(
    conn: &Connection,
    booking_id: &str,
    new_status: BookingStatus,
    requesting_provider_id: &str,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    if new_status == BookingStatus::Scheduled {
        return Err(AppError::InvalidState(
            "bookings cannot transition back to SCHEDULED".to_string(),
        ));
    }

    let booking = queries::get_booking_by_id(conn, booking_id)?
        .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?;

    if booking.provider_id != requesting_provider_id {
        return Err(AppError::Forbidden(
            "booking belongs to another provider".to_string(),
        ));
    }

    if booking.status != BookingStatus::Scheduled {
        return Err(AppError::InvalidState(format!(
            "cannot change status of a {} booking",
            booking.status.as_str()
        )));
    }

    if now - booking.date_time > chrono::Duration::days(30) {
        return Err(AppError::StaleBooking(
            "bookings older than 30 days can no longer be changed".to_string(),
        ));
    }

    queries::update_booking_status(conn, booking_id, new_status, &now)?;

    Ok(Booking {
        status: new_status,
        updated_at: now,
        ..booking
    })
}
