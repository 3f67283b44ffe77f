//! Redis-backed cache implementation.

use std::time::Duration;

use super::service::{CacheError, CacheResult, CacheStats, LinkCache};
use crate::domain::entities::ShortLink;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::{debug, error, info, warn};

/// Bound on the initial connection handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on individual cache operations. Shorter than any database timeout
/// so a stalled cache can never dominate redirect latency.
const OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis cache holding JSON-serialized [`ShortLink`] records.
///
/// Uses `ConnectionManager` for connection reuse and reconnection. All
/// operations are fail-open: backend errors and timeouts are logged and
/// reported as misses or no-ops, never as errors to the workflows.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
    key_prefix: &'static str,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and
    /// configures the default entry TTL.
    ///
    /// Both the handshake and the PING are bounded by [`CONNECT_TIMEOUT`];
    /// a cache that cannot be reached promptly at startup is treated as
    /// absent and the caller falls back to [`super::NullCache`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established in time, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Redis connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut probe = manager.clone();
        tokio::time::timeout(CONNECT_TIMEOUT, probe.ping::<()>())
            .await
            .map_err(|_| CacheError::Connection("Redis PING timed out".to_string()))?
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "url:",
        })
    }

    /// Clones the underlying connection manager.
    ///
    /// The cache and the hit tracker share one process-wide Redis
    /// connection; this is how the tracker gets its handle.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    fn build_key(&self, short_id: &str) -> String {
        format!("{}{}", self.key_prefix, short_id)
    }
}

#[async_trait]
impl LinkCache for RedisCache {
    async fn get(&self, short_id: &str) -> CacheResult<Option<ShortLink>> {
        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();

        match tokio::time::timeout(OP_TIMEOUT, conn.get::<_, Option<String>>(&key)).await {
            Ok(Ok(Some(raw))) => match serde_json::from_str::<ShortLink>(&raw) {
                Ok(link) => {
                    debug!("Cache HIT: {}", short_id);
                    Ok(Some(link))
                }
                Err(e) => {
                    // A corrupt entry reads as a miss; the durable store
                    // will repopulate it.
                    warn!("Discarding undecodable cache entry for {}: {}", short_id, e);
                    Ok(None)
                }
            },
            Ok(Ok(None)) => {
                debug!("Cache MISS: {}", short_id);
                Ok(None)
            }
            Ok(Err(e)) => {
                error!("Redis GET error for {}: {}", short_id, e);
                Ok(None)
            }
            Err(_) => {
                warn!("Redis GET timed out for {}", short_id);
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        short_id: &str,
        link: &ShortLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = match serde_json::to_string(link) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize cache entry for {}: {}", short_id, e);
                return Ok(());
            }
        };

        match tokio::time::timeout(OP_TIMEOUT, conn.set_ex::<_, _, ()>(&key, payload, ttl)).await {
            Ok(Ok(())) => {
                debug!("Cache SET: {} (TTL: {}s)", short_id, ttl);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("Redis SET error for {}: {}", short_id, e);
                Ok(())
            }
            Err(_) => {
                warn!("Redis SET timed out for {}", short_id);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, short_id: &str) -> CacheResult<()> {
        let key = self.build_key(short_id);
        let mut conn = self.conn.clone();

        match tokio::time::timeout(OP_TIMEOUT, conn.del::<_, i64>(&key)).await {
            Ok(Ok(deleted)) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", short_id);
                }
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("Redis DEL error for {}: {}", short_id, e);
                Ok(())
            }
            Err(_) => {
                warn!("Redis DEL timed out for {}", short_id);
                Ok(())
            }
        }
    }

    async fn stats(&self) -> CacheStats {
        let mut conn = self.conn.clone();

        let connected = matches!(
            tokio::time::timeout(OP_TIMEOUT, conn.ping::<()>()).await,
            Ok(Ok(()))
        );

        if !connected {
            return CacheStats {
                connected: false,
                info: None,
            };
        }

        let info: Option<String> =
            match tokio::time::timeout(OP_TIMEOUT, redis::cmd("INFO").query_async(&mut conn)).await
            {
                Ok(Ok(raw)) => Some(raw),
                Ok(Err(e)) => {
                    warn!("Redis INFO error: {}", e);
                    None
                }
                Err(_) => None,
            };

        CacheStats {
            connected: true,
            info: info.map(|raw| raw.lines().take(10).map(str::to_string).collect()),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        matches!(
            tokio::time::timeout(OP_TIMEOUT, conn.ping::<()>()).await,
            Ok(Ok(()))
        )
    }
}
