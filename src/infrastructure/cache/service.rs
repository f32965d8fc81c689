//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// These are surfaced to the caller as-is; the resolver is the one place
/// that decides to treat them as a miss. Implementations must not swallow
/// failures internally.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Best-effort key/value cache of code -> destination URL mappings.
///
/// Entries carry a TTL and are never authoritative; a value may be absent,
/// expired or stale relative to the store. Implementations must be
/// thread-safe and are injected into the resolver so tests can substitute
/// a no-op or fault-injecting variant.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the destination URL cached for a short code.
    ///
    /// The three outcomes are distinguishable: `Ok(Some(url))` hit,
    /// `Ok(None)` miss, `Err(_)` backend failure. Collapsing the last two
    /// is a policy decision that belongs to the caller.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a code -> URL mapping with the given TTL in seconds.
    async fn set_url(&self, code: &str, original_url: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes a cached mapping. Used when a link is deleted externally.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
