//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and tracker setup, worker spawning,
//! and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::hit_worker::run_hit_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{LinkCache, NullCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::infrastructure::tracking::{HitTracker, NullHitTracker, RedisHitTracker};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache and hit tracker (or null fallbacks)
/// - Background hit worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migrations, server bind,
/// or server runtime fail. A Redis connection failure is not fatal; the
/// service degrades to uncached operation.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let (cache, tracker) = build_cache_and_tracker(&config).await;

    let (hit_tx, hit_rx) = mpsc::channel(config.hit_queue_capacity);

    let pool = Arc::new(pool);
    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));

    tokio::spawn(run_hit_worker(hit_rx, links.clone()));
    tracing::info!("Hit worker started");

    let state = AppState::new(
        pool,
        links,
        cache,
        tracker,
        hit_tx,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}

/// Connects the Redis-backed cache and tracker, or falls back to the null
/// implementations when Redis is unconfigured or unreachable.
///
/// The tracker shares the cache's multiplexed connection, so both degrade
/// together.
async fn build_cache_and_tracker(config: &Config) -> (Arc<dyn LinkCache>, Arc<dyn HitTracker>) {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return (Arc::new(NullCache::new()), Arc::new(NullHitTracker::new()));
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            let tracker = RedisHitTracker::new(
                redis.connection(),
                config.hit_counter_ttl_seconds,
                config.popular_ttl_seconds,
                config.popular_threshold,
            );
            tracing::info!("Cache enabled (Redis)");
            (Arc::new(redis), Arc::new(tracker))
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            (Arc::new(NullCache::new()), Arc::new(NullHitTracker::new()))
        }
    }
}
