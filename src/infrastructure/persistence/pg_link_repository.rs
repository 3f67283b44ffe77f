//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;

const SELECT_COLUMNS: &str = "id, short_id, long_url, hits, created_by, created_at, expires_at";

/// PostgreSQL repository for short link storage.
///
/// Queries are bound at runtime (`query_as`), so the crate builds without a
/// live database. Uniqueness of both `short_id` and `long_url` is enforced
/// by the schema, not by the application.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "INSERT INTO short_links (short_id, long_url, created_by) \
             VALUES ($1, $2, $3) \
             RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(&new_link.short_id)
        .bind(&new_link.long_url)
        .bind(&new_link.created_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {} FROM short_links WHERE short_id = $1",
            SELECT_COLUMNS
        ))
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {} FROM short_links WHERE long_url = $1",
            SELECT_COLUMNS
        ))
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_hits(&self, short_id: &str) -> Result<i64, AppError> {
        // Single atomic UPDATE: concurrent redirects each add exactly one,
        // with no read-modify-write window to lose increments in.
        let hits = sqlx::query_scalar::<_, i64>(
            "UPDATE short_links SET hits = hits + 1 WHERE short_id = $1 RETURNING hits",
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        hits.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "short_id": short_id }))
        })
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, AppError> {
        let links = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {} FROM short_links ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }
}
