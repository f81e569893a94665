//! Availability-window CRUD. Writes run validate-then-write inside an
//! IMMEDIATE transaction so two concurrent edits cannot both pass the overlap
//! check and commit clashing windows.

use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::availability::validate_window;
use crate::models::{AvailabilityWindow, Weekday};

pub fn list_windows(conn: &Connection, provider_id: &str) -> Result<Vec<AvailabilityWindow>, AppError> {
    Ok(queries::list_windows(conn, provider_id)?)
}

pub fn create_window(
    conn: &mut Connection,
    provider_id: &str,
    weekday: Weekday,
    start_time: &str,
    end_time: &str,
) -> Result<AvailabilityWindow, AppError> {
    validate_window(start_time, end_time).map_err(|e| AppError::Validation(e.to_string()))?;

    let window = AvailabilityWindow {
        id: uuid::Uuid::new_v4().to_string(),
        provider_id: provider_id.to_string(),
        weekday,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
    };

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(clash) = find_clash(&tx, &window, None)? {
        return Err(overlap_error(&clash));
    }

    queries::insert_window(&tx, &window)?;
    tx.commit()?;

    Ok(window)
}

pub fn update_window(
    conn: &mut Connection,
    provider_id: &str,
    window_id: &str,
    weekday: Weekday,
    start_time: &str,
    end_time: &str,
) -> Result<AvailabilityWindow, AppError> {
    validate_window(start_time, end_time).map_err(|e| AppError::Validation(e.to_string()))?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = queries::get_window_by_id(&tx, window_id)?
        .filter(|w| w.provider_id == provider_id)
        .ok_or_else(|| AppError::NotFound("availability window not found".to_string()))?;

    let window = AvailabilityWindow {
        id: existing.id,
        provider_id: provider_id.to_string(),
        weekday,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
    };

    if let Some(clash) = find_clash(&tx, &window, Some(&window.id))? {
        return Err(overlap_error(&clash));
    }

    queries::update_window(&tx, &window)?;
    tx.commit()?;

    Ok(window)
}

pub fn delete_window(
    conn: &Connection,
    provider_id: &str,
    window_id: &str,
) -> Result<(), AppError> {
    if !queries::delete_window(conn, provider_id, window_id)? {
        return Err(AppError::NotFound("availability window not found".to_string()));
    }
    Ok(())
}

/// Candidate against the provider's stored windows for that weekday, using
/// the same half-open test the model defines.
fn find_clash(
    conn: &Connection,
    candidate: &AvailabilityWindow,
    exclude_id: Option<&str>,
) -> Result<Option<AvailabilityWindow>, AppError> {
    let existing = queries::get_windows_for_weekday(conn, &candidate.provider_id, candidate.weekday)?;
    Ok(existing
        .into_iter()
        .find(|w| exclude_id != Some(w.id.as_str()) && w.overlaps(candidate)))
}

fn overlap_error(clash: &AvailabilityWindow) -> AppError {
    AppError::Conflict(format!(
        "window overlaps existing availability {} {}-{}",
        clash.weekday.as_str(),
        clash.start_time,
        clash.end_time
    ))
}
