//! Redirect workflow: resolve a short id fast, count the visit off-path.

use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;
use crate::infrastructure::tracking::HitTracker;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Resolves short ids to their records and accounts for the visit.
///
/// Redirect latency is the critical path: everything past resolving the
/// destination URL — approximate counting, cache repopulation, the durable
/// increment — is best-effort and decoupled from the caller's response.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn LinkCache>,
    tracker: Arc<dyn HitTracker>,
    hit_tx: mpsc::Sender<HitEvent>,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn LinkCache>,
        tracker: Arc<dyn HitTracker>,
        hit_tx: mpsc::Sender<HitEvent>,
    ) -> Self {
        Self {
            links,
            cache,
            tracker,
            hit_tx,
        }
    }

    /// Resolves a short id to its record and records the visit.
    ///
    /// # Flow
    ///
    /// 1. Cache `get`; a hit is used as-is (its `hits` field may be stale,
    ///    which is fine — it is informational only)
    /// 2. On miss, read the durable store and repopulate the cache in a
    ///    detached task; on cache *error*, fall straight through to the
    ///    store without repopulating
    /// 3. Bump the approximate counter (best-effort)
    /// 4. Queue a [`HitEvent`] for the durable increment; a full queue
    ///    drops the event rather than block the redirect
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record exists for `short_id`.
    /// Cache and counter failures never surface here.
    pub async fn resolve(&self, short_id: &str) -> Result<ShortLink, AppError> {
        let link = match self.cache.get(short_id).await {
            Ok(Some(cached)) => cached,
            Ok(None) => self.load_and_repopulate(short_id).await?,
            Err(e) => {
                error!("Cache error for {}: {}", short_id, e);
                self.load_from_store(short_id).await?
            }
        };

        let approx = self.tracker.record_hit(short_id).await;
        if approx > 0 {
            debug!("Approximate hits for {}: {}", short_id, approx);
        }

        if self.hit_tx.try_send(HitEvent::new(short_id)).is_err() {
            metrics::counter!("snaplink_hit_queue_full_total").increment(1);
            warn!("Hit queue full; dropping durable increment for {}", short_id);
        }

        metrics::counter!("snaplink_redirects_total").increment(1);
        Ok(link)
    }

    async fn load_and_repopulate(&self, short_id: &str) -> Result<ShortLink, AppError> {
        let link = self.load_from_store(short_id).await?;

        // Detached so the redirect never waits on the cache write.
        let cache = self.cache.clone();
        let cached = link.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.put(&cached.short_id, &cached, None).await {
                error!("Failed to repopulate cache for {}: {}", cached.short_id, e);
            }
        });

        Ok(link)
    }

    async fn load_from_store(&self, short_id: &str) -> Result<ShortLink, AppError> {
        self.links
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_id": short_id }))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockLinkCache};
    use crate::infrastructure::tracking::MockHitTracker;
    use chrono::Utc;

    fn link(short_id: &str, long_url: &str) -> ShortLink {
        ShortLink {
            id: 1,
            short_id: short_id.to_string(),
            long_url: long_url.to_string(),
            hits: 3,
            created_by: None,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    fn counting_tracker(expected: &str) -> MockHitTracker {
        let expected = expected.to_string();
        let mut tracker = MockHitTracker::new();
        tracker
            .expect_record_hit()
            .withf(move |s| s == expected)
            .times(1)
            .returning(|_| 1);
        tracker
    }

    #[tokio::test]
    async fn test_cache_hit_skips_durable_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id().times(0);

        let mut cache = MockLinkCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|s| Ok(Some(link(s, "https://example.com/cached"))));

        let (tx, mut rx) = mpsc::channel(16);
        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(counting_tracker("hit1234")),
            tx,
        );

        let resolved = service.resolve("hit1234").await.unwrap();

        assert_eq!(resolved.long_url, "https://example.com/cached");
        assert_eq!(rx.recv().await.unwrap().short_id, "hit1234");
    }

    #[tokio::test]
    async fn test_cache_miss_falls_through_and_repopulates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id()
            .times(1)
            .returning(|s| Ok(Some(link(s, "https://example.com/stored"))));

        let mut cache = MockLinkCache::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        // Repopulation runs in a detached task; it may or may not have
        // landed by the time the test finishes.
        cache.expect_put().times(0..2).returning(|_, _, _| Ok(()));

        let (tx, mut rx) = mpsc::channel(16);
        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(counting_tracker("mis1234")),
            tx,
        );

        let resolved = service.resolve("mis1234").await.unwrap();

        assert_eq!(resolved.long_url, "https://example.com/stored");
        assert_eq!(rx.recv().await.unwrap().short_id, "mis1234");
    }

    #[tokio::test]
    async fn test_unknown_short_id_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id().times(1).returning(|_| Ok(None));

        let mut cache = MockLinkCache::new();
        cache.expect_get().times(1).returning(|_| Ok(None));

        let mut tracker = MockHitTracker::new();
        tracker.expect_record_hit().times(0);

        let (tx, mut rx) = mpsc::channel(16);
        let service = RedirectService::new(Arc::new(repo), Arc::new(cache), Arc::new(tracker), tx);

        let result = service.resolve("zzzzzzz").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cache_error_fails_open_to_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id()
            .times(1)
            .returning(|s| Ok(Some(link(s, "https://example.com/fallback"))));

        let mut cache = MockLinkCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::Connection("redis down".to_string())));
        cache.expect_put().times(0);

        let (tx, _rx) = mpsc::channel(16);
        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(counting_tracker("err1234")),
            tx,
        );

        let resolved = service.resolve("err1234").await.unwrap();
        assert_eq!(resolved.long_url, "https://example.com/fallback");
    }

    #[tokio::test]
    async fn test_full_hit_queue_does_not_fail_redirect() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id().times(0);

        let mut cache = MockLinkCache::new();
        cache
            .expect_get()
            .returning(|s| Ok(Some(link(s, "https://example.com/busy"))));

        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(HitEvent::new("filler1")).unwrap();

        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(counting_tracker("ful1234")),
            tx,
        );

        let resolved = service.resolve("ful1234").await.unwrap();
        assert_eq!(resolved.long_url, "https://example.com/busy");
    }

    #[tokio::test]
    async fn test_tracker_zero_result_is_ignored() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_id().times(0);

        let mut cache = MockLinkCache::new();
        cache
            .expect_get()
            .returning(|s| Ok(Some(link(s, "https://example.com/ok"))));

        // A tracker with a dead backend reports 0; the redirect proceeds.
        let mut tracker = MockHitTracker::new();
        tracker.expect_record_hit().times(1).returning(|_| 0);

        let (tx, _rx) = mpsc::channel(16);
        let service = RedirectService::new(Arc::new(repo), Arc::new(cache), Arc::new(tracker), tx);

        assert!(service.resolve("zer1234").await.is_ok());
    }
}
