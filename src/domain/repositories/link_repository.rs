//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store interface for short links.
///
/// The implementation owns the canonical record; the cache only mirrors it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link with `hits = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the `short_id` or `long_url`
    /// unique constraint is violated; the conflict details carry the
    /// constraint name so callers can distinguish the two races.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Primary lookup by short identifier.
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ShortLink>, AppError>;

    /// Exact-match lookup by long URL, used for shortening idempotence.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, AppError>;

    /// Atomically increments the hit counter and returns the new count.
    ///
    /// Must be a single atomic statement, never read-modify-write, so
    /// concurrent redirects cannot lose increments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `short_id`.
    async fn increment_hits(&self, short_id: &str) -> Result<i64, AppError>;

    /// Administrative listing of all links, newest first.
    async fn list_all(&self) -> Result<Vec<ShortLink>, AppError>;
}
