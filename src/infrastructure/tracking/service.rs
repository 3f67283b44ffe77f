//! Hit tracker trait and popularity entry type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A short id promoted to the popularity registry, with its approximate
/// hit count at promotion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularEntry {
    pub short_id: String,
    pub hits: u64,
}

/// Fast, best-effort hit counting on the redirect path.
///
/// Every method is infallible by contract: implementations absorb backend
/// errors and return zero/empty results, so the redirect that triggered the
/// call can never be failed by its own bookkeeping.
///
/// # Implementations
///
/// - [`crate::infrastructure::tracking::RedisHitTracker`] - Redis counters with TTL
/// - [`crate::infrastructure::tracking::NullHitTracker`] - No-op when Redis is absent
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HitTracker: Send + Sync {
    /// Atomically increments the approximate counter for `short_id` and
    /// returns the current figure, or 0 when the backend is unavailable.
    ///
    /// Counters expire on their own, so a link that stops being visited
    /// eventually drops out of the tracker entirely.
    async fn record_hit(&self, short_id: &str) -> u64;

    /// Returns up to `limit` promoted entries, most-hit first.
    ///
    /// The registry is advisory: it can always be rebuilt from the live
    /// approximate counters and is empty when the backend is unavailable.
    async fn popular(&self, limit: usize) -> Vec<PopularEntry>;
}
