//! Handler for the administrative link listing.

use axum::{Json, extract::State};

use crate::api::dto::links::{LinkListResponse, LinkSummary};
use crate::error::AppError;
use crate::state::AppState;

/// Lists all short links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn link_list_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.shortener.list_links().await?;

    Ok(Json(LinkListResponse {
        total: links.len(),
        links: links.into_iter().map(LinkSummary::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::testing::state_with;
    use crate::domain::entities::ShortLink;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::MockLinkCache;
    use crate::infrastructure::tracking::MockHitTracker;
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use chrono::Utc;

    #[tokio::test]
    async fn test_listing_returns_all_links() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_all().times(1).returning(|| {
            Ok(vec![
                ShortLink {
                    id: 2,
                    short_id: "newer12".to_string(),
                    long_url: "https://example.com/b".to_string(),
                    hits: 4,
                    created_by: Some("10.0.0.7".to_string()),
                    created_at: Utc::now(),
                    expires_at: None,
                },
                ShortLink {
                    id: 1,
                    short_id: "older12".to_string(),
                    long_url: "https://example.com/a".to_string(),
                    hits: 9,
                    created_by: None,
                    created_at: Utc::now(),
                    expires_at: None,
                },
            ])
        });

        let (state, _rx) = state_with(repo, MockLinkCache::new(), MockHitTracker::new());
        let app = Router::new()
            .route("/api/urls", get(link_list_handler))
            .with_state(state);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/urls").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["links"][0]["short_id"], "newer12");
        assert!(body["links"][1].get("created_by").is_none());
    }
}
