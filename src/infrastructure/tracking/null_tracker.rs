//! No-op hit tracker for when Redis is absent.

use super::service::{HitTracker, PopularEntry};
use async_trait::async_trait;

/// Tracker that counts nothing.
///
/// Paired with [`crate::infrastructure::cache::NullCache`] when Redis is
/// not configured. The durable hit counter keeps working; only the
/// near-real-time figures and the popularity registry are lost.
pub struct NullHitTracker;

impl NullHitTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullHitTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HitTracker for NullHitTracker {
    async fn record_hit(&self, _short_id: &str) -> u64 {
        0
    }

    async fn popular(&self, _limit: usize) -> Vec<PopularEntry> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_tracker_counts_nothing() {
        let tracker = NullHitTracker::new();

        assert_eq!(tracker.record_hit("abcdef1").await, 0);
        assert!(tracker.popular(10).await.is_empty());
    }
}
