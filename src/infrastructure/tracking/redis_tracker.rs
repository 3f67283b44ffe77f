//! Redis-backed approximate hit counters.

use std::time::Duration;

use super::service::{HitTracker, PopularEntry};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, warn};

/// Bound on individual counter operations.
const OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Bound on a full popularity registry read (SCAN + MGET).
const SCAN_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on registry keys collected per read, so an unexpectedly
/// large keyspace cannot stall the admin endpoint.
const SCAN_KEY_LIMIT: usize = 1000;

/// Counts hits in Redis with `INCR` and promotes busy links to a
/// `popular:*` registry.
///
/// Keys are namespaced separately from the lookup cache: `hits:<short_id>`
/// for counters, `popular:<short_id>` for promoted entries, each with its
/// own TTL. Shares the connection manager with [`crate::infrastructure::cache::RedisCache`].
pub struct RedisHitTracker {
    conn: ConnectionManager,
    counter_ttl: i64,
    popular_ttl: u64,
    promotion_threshold: u64,
}

impl RedisHitTracker {
    pub fn new(
        conn: ConnectionManager,
        counter_ttl_seconds: u64,
        popular_ttl_seconds: u64,
        promotion_threshold: u64,
    ) -> Self {
        Self {
            conn,
            counter_ttl: counter_ttl_seconds as i64,
            popular_ttl: popular_ttl_seconds,
            promotion_threshold,
        }
    }

    async fn promote(&self, short_id: &str, hits: u64) {
        let key = format!("popular:{}", short_id);
        let mut conn = self.conn.clone();

        let payload = match serde_json::to_string(&PopularEntry {
            short_id: short_id.to_string(),
            hits,
        }) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize popular entry for {}: {}", short_id, e);
                return;
            }
        };

        match tokio::time::timeout(
            OP_TIMEOUT,
            conn.set_ex::<_, _, ()>(&key, payload, self.popular_ttl),
        )
        .await
        {
            Ok(Ok(())) => debug!("Promoted {} to popular registry ({} hits)", short_id, hits),
            Ok(Err(e)) => warn!("Failed to promote {}: {}", short_id, e),
            Err(_) => warn!("Promotion of {} timed out", short_id),
        }
    }

    async fn fetch_popular(&self) -> redis::RedisResult<Vec<PopularEntry>> {
        let mut conn = self.conn.clone();
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("popular:*")
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            keys.extend(batch);

            if next == 0 || keys.len() >= SCAN_KEY_LIMIT {
                break;
            }
            cursor = next;
        }

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let raws: Vec<Option<String>> = conn.mget(&keys).await?;

        Ok(raws
            .into_iter()
            .flatten()
            .filter_map(|raw| serde_json::from_str(&raw).ok())
            .collect())
    }
}

#[async_trait]
impl HitTracker for RedisHitTracker {
    async fn record_hit(&self, short_id: &str) -> u64 {
        let key = format!("hits:{}", short_id);
        let mut conn = self.conn.clone();

        let count = match tokio::time::timeout(OP_TIMEOUT, conn.incr::<_, _, u64>(&key, 1u64)).await
        {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                warn!("Redis INCR error for {}: {}", short_id, e);
                return 0;
            }
            Err(_) => {
                warn!("Redis INCR timed out for {}", short_id);
                return 0;
            }
        };

        // Refreshed on every hit: the counter window slides with activity.
        if let Ok(Err(e)) =
            tokio::time::timeout(OP_TIMEOUT, conn.expire::<_, bool>(&key, self.counter_ttl)).await
        {
            warn!("Redis EXPIRE error for {}: {}", short_id, e);
        }

        if crosses_threshold(count, self.promotion_threshold) {
            self.promote(short_id, count).await;
        }

        debug!("Tracked hit for {}: approx {}", short_id, count);
        count
    }

    async fn popular(&self, limit: usize) -> Vec<PopularEntry> {
        match tokio::time::timeout(SCAN_TIMEOUT, self.fetch_popular()).await {
            Ok(Ok(entries)) => rank(entries, limit),
            Ok(Err(e)) => {
                warn!("Failed to read popular registry: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!("Popular registry read timed out");
                Vec::new()
            }
        }
    }
}

/// A link becomes popular once its approximate count strictly exceeds the
/// threshold: with the default of 10, the 11th hit promotes.
fn crosses_threshold(count: u64, threshold: u64) -> bool {
    count > threshold
}

/// Orders entries most-hit first and keeps the top `limit`.
fn rank(mut entries: Vec<PopularEntry>, limit: usize) -> Vec<PopularEntry> {
    entries.sort_by(|a, b| b.hits.cmp(&a.hits));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(short_id: &str, hits: u64) -> PopularEntry {
        PopularEntry {
            short_id: short_id.to_string(),
            hits,
        }
    }

    #[test]
    fn test_promotion_requires_strictly_more_than_threshold() {
        assert!(!crosses_threshold(9, 10));
        assert!(!crosses_threshold(10, 10));
        assert!(crosses_threshold(11, 10));
    }

    #[test]
    fn test_rank_orders_by_hits_descending() {
        let ranked = rank(vec![entry("a", 3), entry("b", 42), entry("c", 11)], 10);

        let ids: Vec<&str> = ranked.iter().map(|e| e.short_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let entries = (0..20).map(|i| entry(&format!("id{}", i), i)).collect();
        let ranked = rank(entries, 5);

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].hits, 19);
    }

    #[test]
    fn test_rank_handles_empty_registry() {
        assert!(rank(Vec::new(), 10).is_empty());
    }
}
