//! Handler for cache diagnostics.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::infrastructure::cache::CacheStats;
use crate::state::AppState;

/// Reports cache backend connectivity and server info.
///
/// # Endpoint
///
/// `GET /api/cache/stats`
///
/// With the null cache (no Redis configured) this reports
/// `connected: false` and no info lines.
pub async fn cache_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.cache.stats().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::testing::state_with;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::MockLinkCache;
    use crate::infrastructure::tracking::MockHitTracker;
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_stats_are_passed_through() {
        let mut cache = MockLinkCache::new();
        cache.expect_stats().times(1).returning(|| CacheStats {
            connected: true,
            info: Some(vec!["redis_version:7.2.0".to_string()]),
        });

        let (state, _rx) = state_with(MockLinkRepository::new(), cache, MockHitTracker::new());
        let app = Router::new()
            .route("/api/cache/stats", get(cache_stats_handler))
            .with_state(state);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/cache/stats").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["connected"], true);
        assert_eq!(body["info"][0], "redis_version:7.2.0");
    }
}
