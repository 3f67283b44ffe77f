//! Volatile lookup cache for fast redirects.
//!
//! Provides a [`LinkCache`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation when Redis is absent
//!
//! The cache is an optimization, never a correctness dependency: every
//! operation fails open and callers always have the durable store to fall
//! back on.

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheStats, LinkCache};

#[cfg(test)]
pub use service::MockLinkCache;
