use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::time::Duration;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A fast lookup cache mapping short codes to target URLs.
///
/// Cache entries are a derived, disposable projection of store records:
/// the cache is never the source of truth and may be absent, evicted, or
/// stale without violating correctness. Implementations own their key
/// namespace (a fixed prefix plus the code) and must honor the per-entry
/// TTL passed to [`set`](UrlCache::set).
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the target URL for a short code.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Store a target URL under a short code, expiring after `ttl`.
    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()>;

    /// Remove the entry for a short code.
    ///
    /// It is not an error if the key does not exist.
    async fn del(&self, code: &ShortCode) -> Result<()>;

    /// Checks whether an entry exists for a short code.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}
