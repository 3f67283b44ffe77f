//! API route configuration.

use crate::api::handlers::{
    cache_stats_handler, link_list_handler, popular_handler, shorten_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`      - Create a short link (strict rate limit)
/// - `GET  /urls`         - List all links, newest first
/// - `GET  /popular`      - Recently popular links (approximate counts)
/// - `GET  /cache/stats`  - Cache backend diagnostics
pub fn api_routes() -> Router<AppState> {
    let write_routes = Router::new()
        .route("/shorten", post(shorten_handler))
        .layer(rate_limit::strict_layer());

    let read_routes = Router::new()
        .route("/urls", get(link_list_handler))
        .route("/popular", get(popular_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .layer(rate_limit::layer());

    write_routes.merge(read_routes)
}
