//! No-op cache for disabled caching.

use super::service::{CacheResult, CacheStats, LinkCache};
use crate::domain::entities::ShortLink;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Used when Redis is not configured or the startup connection fails.
/// Every `get` is a miss, so all lookups fall through to the durable
/// store — the system behaves correctly, just without the fast path.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for NullCache {
    async fn get(&self, _short_id: &str) -> CacheResult<Option<ShortLink>> {
        Ok(None)
    }

    async fn put(
        &self,
        _short_id: &str,
        _link: &ShortLink,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_id: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            connected: false,
            info: None,
        }
    }

    /// A disabled cache is not a degraded component, so this reports healthy.
    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_link() -> ShortLink {
        ShortLink {
            id: 1,
            short_id: "abcdef1".to_string(),
            long_url: "https://example.com".to_string(),
            hits: 0,
            created_by: None,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        let link = sample_link();

        cache.put("abcdef1", &link, None).await.unwrap();
        assert!(cache.get("abcdef1").await.unwrap().is_none());

        cache.invalidate("abcdef1").await.unwrap();
        assert!(cache.get("abcdef1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_cache_reports_disconnected_stats() {
        let cache = NullCache::new();
        let stats = cache.stats().await;

        assert!(!stats.connected);
        assert!(stats.info.is_none());
        assert!(cache.health_check().await);
    }
}
