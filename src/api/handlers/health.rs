//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Round-trip query on the pool
/// 2. **Hit Queue**: Channel open, remaining capacity
/// 3. **Cache**: Backend PING (the null cache always reports ok)
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let queue_check = check_hit_queue(&state);
    let cache_check = check_cache(&state).await;

    let all_healthy = db_check.is_ok() && queue_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            hit_queue: queue_check,
            cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.db.as_ref())
        .await
    {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_hit_queue(state: &AppState) -> CheckStatus {
    if state.hit_tx.is_closed() {
        CheckStatus::error("Hit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.hit_tx.capacity()))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache backend reachable")
    } else {
        CheckStatus::error("Cache backend unreachable")
    }
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
    async fn test_unreachable_cache_degrades_health() {
        let mut cache = MockLinkCache::new();
        cache.expect_health_check().times(1).returning(|| false);

        let (state, _rx) = state_with(MockLinkRepository::new(), cache, MockHitTracker::new());
        let app = Router::new()
            .route("/health", get(health_handler))
            .with_state(state);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["cache"]["status"], "error");
        // The hit queue is open regardless of backend health.
        assert_eq!(body["checks"]["hit_queue"]["status"], "ok");
    }
}
