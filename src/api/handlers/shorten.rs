//! Handler for the shorten endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_sanitizer::sanitize_url;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request
///
/// ```json
/// { "long_url": "https://example.com/some/very/long/path" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: A new short link was created
/// - **200 OK**: The URL was already known; the existing record is returned
/// - **400 Bad Request**: Malformed, oversized, or disallowed URL
///
/// The client's peer IP is recorded as the creator for auditing.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<ShortenRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let long_url = sanitize_url(&payload.long_url)
        .map_err(|e| AppError::bad_request("URL rejected", json!({ "reason": e.to_string() })))?;

    let outcome = state
        .shortener
        .shorten(long_url, Some(addr.ip().to_string()))
        .await?;

    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let link = outcome.into_link();
    let short_url = state.short_url(&link.short_id);

    Ok((status, Json(ShortenResponse::from_link(link, short_url))))
}
