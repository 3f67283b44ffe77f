//! Cache trait and error types.

use crate::domain::entities::ShortLink;
use async_trait::async_trait;
use serde::Serialize;

/// Errors that can occur while talking to the cache backend.
///
/// These never cross the workflow boundary: implementations log and absorb
/// operation errors, and the workflows treat any surviving error as a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache availability snapshot for observability endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub connected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Vec<String>>,
}

/// Time-boxed mirror of short link records.
///
/// Implementations never consult the durable store: populating the cache on
/// a miss is the caller's job (read-through), and the shortening workflow
/// pushes fresh records directly after insert (write-around).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op when caching is disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Retrieves a cached record.
    ///
    /// Returns `Ok(None)` on a miss. Production implementations also map
    /// backend errors to `Ok(None)` so a flaky cache reads as a miss.
    async fn get(&self, short_id: &str) -> CacheResult<Option<ShortLink>>;

    /// Stores a serialized copy of the record, overwriting any existing
    /// entry. `ttl_seconds = None` applies the implementation default.
    async fn put(
        &self,
        short_id: &str,
        link: &ShortLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes any cached copy for `short_id`.
    async fn invalidate(&self, short_id: &str) -> CacheResult<()>;

    /// Reports backend availability and a short info summary.
    async fn stats(&self) -> CacheStats;

    /// Cheap connectivity probe for the health endpoint.
    async fn health_check(&self) -> bool;
}
