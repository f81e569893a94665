use axum::http::HeaderMap;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Provider;

/// Resolve the bearer token to a provider row. The token itself is opaque;
/// issuing and rotating it is the identity collaborator's problem.
pub fn authenticate_provider(conn: &Connection, headers: &HeaderMap) -> Result<Provider, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    queries::get_provider_by_token(conn, token)?.ok_or(AppError::Unauthorized)
}
