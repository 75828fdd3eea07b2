use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use crate::generator::CodeGenerator;
use hoplink_core::{LinkRecord, LinkStore, ShortCode, StoreError, UrlCache, UrlPolicy};
use jiff::Timestamp;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// The core orchestrator: creation with collision avoidance, and
/// cache-aside lookup with authoritative expiration checks.
///
/// The store and cache are shared with the [`Reaper`](crate::Reaper);
/// the resolver itself holds no locks and keeps no mutable state beyond
/// what those collaborators synchronize internally.
#[derive(Debug)]
pub struct Resolver<S, C, G, P> {
    store: Arc<S>,
    cache: Arc<C>,
    generator: G,
    policy: P,
    config: LinkConfig,
}

impl<S, C, G, P> Resolver<S, C, G, P>
where
    S: LinkStore,
    C: UrlCache,
    G: CodeGenerator,
    P: UrlPolicy,
{
    /// Creates a new resolver over shared store and cache handles.
    pub fn new(store: Arc<S>, cache: Arc<C>, generator: G, policy: P, config: LinkConfig) -> Self {
        Self {
            store,
            cache,
            generator,
            policy,
            config,
        }
    }

    /// Shortens a URL and returns the full short URL.
    ///
    /// The acceptability policy runs before any state mutation. Candidate
    /// codes are generated and checked against the store up to the
    /// configured attempt budget; the store's uniqueness constraint at
    /// insert time is the real backstop, so a duplicate-key insert just
    /// burns an attempt instead of failing the call.
    pub async fn create(&self, url: &str) -> Result<String> {
        self.policy.check(url).map_err(LinkError::InvalidInput)?;

        let now = Timestamp::now();
        let expire_at = self.config.link_ttl.map(|ttl| now + ttl);

        for attempt in 1..=self.config.max_generate_attempts {
            let code = self.generator.generate(url);

            // Only a live record blocks the candidate; an expired holder
            // is superseded by the insert below.
            if let Some(existing) = self.store.find(&code).await? {
                if !existing.is_expired_at(now) {
                    debug!(code = %code, attempt, "candidate code already taken");
                    continue;
                }
            }

            let record = LinkRecord::new(url, now, expire_at);
            match self.store.insert(&code, record).await {
                Ok(()) => {
                    let ttl = self.cache_ttl(expire_at, now);
                    if let Err(e) = self.cache.set(&code, url, ttl).await {
                        warn!(code = %code, error = %e, "failed to prime cache after create");
                    }
                    debug!(code = %code, attempt, "created short link");
                    return Ok(code.to_url(&self.config.base_url));
                }
                Err(StoreError::Conflict(_)) => {
                    debug!(code = %code, attempt, "lost insert race, retrying generation");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LinkError::GenerationExhausted {
            attempts: self.config.max_generate_attempts,
        })
    }

    /// Resolves a short code to its target URL, incrementing the visit
    /// count on success.
    ///
    /// Cache-aside read: the cache is checked first, but the store stays
    /// authoritative on liveness, so even a cache hit re-checks the
    /// record's expiration. Cache failures degrade to store reads and are
    /// never surfaced to the caller.
    pub async fn resolve(&self, code: &ShortCode) -> Result<String> {
        let now = Timestamp::now();

        if let Some(url) = self.resolve_cached(code, now).await? {
            return Ok(url);
        }

        trace!(code = %code, "cache miss, fetching from store");
        let Some(record) = self.store.find(code).await? else {
            return Err(LinkError::NotFound(code.to_string()));
        };
        if record.is_expired_at(now) {
            return Err(LinkError::Expired(code.to_string()));
        }

        let ttl = self.cache_ttl(record.expire_at, now);
        if let Err(e) = self.cache.set(code, &record.target_url, ttl).await {
            warn!(code = %code, error = %e, "failed to repopulate cache");
        }
        self.store.increment_visits(code).await?;

        Ok(record.target_url)
    }

    /// The cache-hit half of `resolve`. Returns `Ok(None)` when the miss
    /// path should take over, including the cache/store inconsistency
    /// case where a cached entry has no backing record.
    async fn resolve_cached(&self, code: &ShortCode, now: Timestamp) -> Result<Option<String>> {
        let cached = match self.cache.get(code).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(code = %code, error = %e, "cache read failed, falling back to store");
                None
            }
        };
        let Some(url) = cached else {
            return Ok(None);
        };

        match self.store.find(code).await? {
            None => {
                warn!(code = %code, "cached entry has no backing record");
                Ok(None)
            }
            Some(record) if record.is_expired_at(now) => {
                Err(LinkError::Expired(code.to_string()))
            }
            Some(_) => {
                trace!(code = %code, "cache hit");
                self.store.increment_visits(code).await?;
                Ok(Some(url))
            }
        }
    }

    /// Seconds the cache entry may live: the time remaining until the
    /// record expires, or the default horizon for never-expiring links.
    fn cache_ttl(&self, expire_at: Option<Timestamp>, now: Timestamp) -> Duration {
        let secs = match expire_at {
            Some(at) => at.as_second().saturating_sub(now.as_second()),
            None => self.config.default_cache_ttl.as_secs(),
        };
        Duration::from_secs(secs.max(1) as u64)
    }
}
