//! Approximate hit tracking and the popularity registry.
//!
//! The tracker keeps a fast, independently-expiring counter per short id,
//! separate from the authoritative `hits` column in the durable store. The
//! two are never assumed equal: the tracker's figures are disposable and
//! exist for near-real-time observability and ranking.

mod null_tracker;
mod redis_tracker;
mod service;

pub use null_tracker::NullHitTracker;
pub use redis_tracker::RedisHitTracker;
pub use service::{HitTracker, PopularEntry};

#[cfg(test)]
pub use service::MockHitTracker;
