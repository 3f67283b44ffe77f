//! Handler for the popular links endpoint.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::popular::{PopularQuery, PopularResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Default number of entries when the client does not ask for a limit.
const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the requested limit.
const MAX_LIMIT: usize = 100;

/// Returns recently popular links from the approximate hit tracker.
///
/// # Endpoint
///
/// `GET /api/popular?limit=N`
///
/// Counts are approximate and windowed; a link drops off the list once
/// its popularity marker expires. An unavailable tracker yields an empty
/// list, never an error.
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<PopularResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let entries = state.tracker.popular(limit).await;

    Ok(Json(PopularResponse { entries }))
}
