//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_id::is_valid_short_id;

/// Redirects a short id to its destination URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: `Location` carries the destination
/// - **404 Not Found**: Unknown or syntactically invalid short id
///
/// Syntactically invalid ids are rejected before any cache or store
/// lookup, so junk paths never cost a backend round trip.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    if !is_valid_short_id(&short_id) {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "short_id": short_id }),
        ));
    }

    let link = state.redirects.resolve(&short_id).await?;

    Ok(Redirect::temporary(&link.long_url))
}
