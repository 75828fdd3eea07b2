use async_trait::async_trait;
use hoplink_core::cache::Result;
use hoplink_core::{ShortCode, UrlCache};
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const DEFAULT_CAPACITY: u64 = 10_000;

/// Value stored per entry; carries the TTL requested at insert time so
/// the expiry hook can apply it per key.
#[derive(Debug, Clone)]
struct CacheEntry {
    url: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-memory cache implementation using Moka.
///
/// Each entry expires after the TTL supplied with it, matching the
/// per-key TTL semantics of an external cache like Redis. Suitable for
/// single-node deployments and tests.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, CacheEntry>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = code.as_str().to_string();
        match self.cache.get(&key).await {
            Some(entry) => {
                debug!(code = %code, "cache hit in Moka");
                Ok(Some(entry.url))
            }
            None => {
                trace!(code = %code, "cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let key = code.as_str().to_string();
        let entry = CacheEntry {
            url: url.to_string(),
            ttl,
        };
        self.cache.insert(key, entry).await;
        trace!(code = %code, ttl_secs = ttl.as_secs(), "cached record in Moka");
        Ok(())
    }

    async fn del(&self, code: &ShortCode) -> Result<()> {
        let key = code.as_str().to_string();
        self.cache.invalidate(&key).await;
        trace!(code = %code, "removed record from Moka cache");
        Ok(())
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.cache.contains_key(code.as_str()))
    }
}
