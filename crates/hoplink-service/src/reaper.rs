use crate::config::ReaperConfig;
use hoplink_core::{LinkStore, StoreError, UrlCache};
use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records deleted from the store.
    pub store_removed: u64,
    /// Cache entries evicted.
    pub cache_removed: u64,
}

/// Read-only expiry statistics for observability surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// All records, live or expired.
    pub total: u64,
    /// Records already past their expiration.
    pub expired: u64,
    /// Records expiring within the next 24 hours.
    pub expiring_within_24h: u64,
}

/// Periodic maintenance task that removes expired records from the store
/// and the cache.
///
/// Every entry point absorbs its own failures: a broken sweep logs,
/// reports zero progress, and leaves the retry to the next scheduled run.
/// The request path must never be taken down by maintenance.
#[derive(Debug)]
pub struct Reaper<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    config: ReaperConfig,
}

impl<S, C> Clone for Reaper<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<S: LinkStore, C: UrlCache> Reaper<S, C> {
    /// Creates a reaper over the same store and cache handles the
    /// resolver uses.
    pub fn new(store: Arc<S>, cache: Arc<C>, config: ReaperConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Runs one full sweep: evict cache entries for a bounded batch of
    /// expired records, then delete all expired records from the store.
    pub async fn sweep(&self, now: Timestamp) -> SweepReport {
        match self.try_sweep(now).await {
            Ok(report) => {
                if report != SweepReport::default() {
                    info!(
                        store_removed = report.store_removed,
                        cache_removed = report.cache_removed,
                        "sweep finished"
                    );
                }
                report
            }
            Err(e) => {
                error!(error = %e, "sweep failed, will retry on the next schedule");
                SweepReport::default()
            }
        }
    }

    async fn try_sweep(&self, now: Timestamp) -> Result<SweepReport, StoreError> {
        let expired = self
            .store
            .select_expired_before(now, self.config.batch_limit)
            .await?;

        if expired.is_empty() {
            debug!("no expired links to reap");
            return Ok(SweepReport::default());
        }

        let mut cache_removed = 0;
        for code in &expired {
            match self.cache.exists(code).await {
                Ok(true) => match self.cache.del(code).await {
                    Ok(()) => cache_removed += 1,
                    Err(e) => warn!(code = %code, error = %e, "cache eviction failed"),
                },
                Ok(false) => {}
                Err(e) => warn!(code = %code, error = %e, "cache eviction skipped"),
            }
        }

        // One predicate-based delete; the store reports the exact count.
        let store_removed = self.store.delete_expired_before(now).await?;

        Ok(SweepReport {
            store_removed,
            cache_removed,
        })
    }

    /// Fine-grained watchdog: escalates to an immediate full sweep when
    /// the severely-expired backlog exceeds the alarm threshold.
    pub async fn check(&self, now: Timestamp) -> Option<SweepReport> {
        let cutoff = now - self.config.severe_age;
        let backlog = match self.store.count_expired_before(cutoff).await {
            Ok(backlog) => backlog,
            Err(e) => {
                error!(error = %e, "watchdog count failed");
                return None;
            }
        };

        if backlog > self.config.alarm_threshold {
            warn!(
                backlog,
                threshold = self.config.alarm_threshold,
                "severely expired backlog over threshold, sweeping now"
            );
            Some(self.sweep(now).await)
        } else {
            debug!(backlog, "watchdog check passed");
            None
        }
    }

    /// Read-only expiry statistics. Failures are absorbed and reported
    /// as all-zero stats.
    pub async fn stats(&self, now: Timestamp) -> LinkStats {
        match self.try_stats(now).await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "stats query failed");
                LinkStats::default()
            }
        }
    }

    async fn try_stats(&self, now: Timestamp) -> Result<LinkStats, StoreError> {
        let total = self.store.count_all().await?;
        let expired = self.store.count_expired_before(now).await?;
        let expiring_within_24h = self
            .store
            .count_expiring_between(now, now + SignedDuration::from_hours(24))
            .await?;

        Ok(LinkStats {
            total,
            expired,
            expiring_within_24h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hoplink_cache::MokaUrlCache;
    use hoplink_core::{LinkRecord, ShortCode};
    use hoplink_storage::InMemoryStore;
    use std::time::Duration;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    async fn seed(
        store: &InMemoryStore,
        cache: &MokaUrlCache,
        name: &str,
        url: &str,
        expire_at: Option<Timestamp>,
    ) {
        store
            .insert(&code(name), LinkRecord::new(url, Timestamp::now(), expire_at))
            .await
            .unwrap();
        cache
            .set(&code(name), url, Duration::from_secs(3600))
            .await
            .unwrap();
    }

    fn reaper(
        store: &Arc<InMemoryStore>,
        cache: &Arc<MokaUrlCache>,
        config: ReaperConfig,
    ) -> Reaper<InMemoryStore, MokaUrlCache> {
        Reaper::new(Arc::clone(store), Arc::clone(cache), config)
    }

    #[tokio::test]
    async fn sweep_removes_expired_from_store_and_cache() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();
        let past = now - SignedDuration::from_hours(1);
        let future = now + SignedDuration::from_hours(1);

        seed(&store, &cache, "dead01", "https://a.com", Some(past)).await;
        seed(&store, &cache, "dead02", "https://b.com", Some(past)).await;
        seed(&store, &cache, "alive1", "https://c.com", Some(future)).await;

        let report = reaper(&store, &cache, ReaperConfig::default())
            .sweep(now)
            .await;

        assert_eq!(report.store_removed, 2);
        assert_eq!(report.cache_removed, 2);
        assert_eq!(store.count_all().await.unwrap(), 1);
        assert!(cache.exists(&code("alive1")).await.unwrap());
        assert!(!cache.exists(&code("dead01")).await.unwrap());
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();
        let past = now - SignedDuration::from_hours(1);

        seed(&store, &cache, "dead01", "https://a.com", Some(past)).await;

        let reaper = reaper(&store, &cache, ReaperConfig::default());
        let first = reaper.sweep(now).await;
        let second = reaper.sweep(now).await;

        assert_eq!(first.store_removed, 1);
        assert_eq!(second, SweepReport::default());
    }

    #[tokio::test]
    async fn sweep_with_nothing_expired_reports_zero() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();

        seed(
            &store,
            &cache,
            "alive1",
            "https://a.com",
            Some(now + SignedDuration::from_hours(1)),
        )
        .await;

        let report = reaper(&store, &cache, ReaperConfig::default())
            .sweep(now)
            .await;

        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn cache_eviction_is_bounded_by_batch_limit() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();
        let past = now - SignedDuration::from_hours(1);

        for i in 0..5 {
            seed(
                &store,
                &cache,
                &format!("dead{:02}", i),
                "https://a.com",
                Some(past),
            )
            .await;
        }

        let config = ReaperConfig::builder().batch_limit(2).build();
        let report = reaper(&store, &cache, config).sweep(now).await;

        // The cache pass only touches the bounded batch; the predicate
        // delete still clears the whole backlog. Entries past the batch
        // stay cached until their TTL runs out, which is accepted.
        assert_eq!(report.cache_removed, 2);
        assert_eq!(report.store_removed, 5);
        assert_eq!(store.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_breaks_down_expiry_buckets() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();

        seed(
            &store,
            &cache,
            "dead01",
            "https://a.com",
            Some(now - SignedDuration::from_hours(1)),
        )
        .await;
        seed(
            &store,
            &cache,
            "soon01",
            "https://b.com",
            Some(now + SignedDuration::from_hours(12)),
        )
        .await;
        seed(
            &store,
            &cache,
            "later1",
            "https://c.com",
            Some(now + SignedDuration::from_hours(48)),
        )
        .await;
        seed(&store, &cache, "keeper", "https://d.com", None).await;

        let stats = reaper(&store, &cache, ReaperConfig::default())
            .stats(now)
            .await;

        assert_eq!(
            stats,
            LinkStats {
                total: 4,
                expired: 1,
                expiring_within_24h: 1,
            }
        );
    }

    #[tokio::test]
    async fn watchdog_stays_quiet_below_threshold() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();

        // Expired, but not severely: within the severe-age window.
        seed(
            &store,
            &cache,
            "dead01",
            "https://a.com",
            Some(now - SignedDuration::from_hours(1)),
        )
        .await;

        let config = ReaperConfig::builder().alarm_threshold(0).build();
        let outcome = reaper(&store, &cache, config).check(now).await;

        assert!(outcome.is_none());
        assert_eq!(store.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn watchdog_escalates_over_threshold() {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MokaUrlCache::new());
        let now = Timestamp::now();
        let severely_past = now - SignedDuration::from_hours(48);

        for i in 0..3 {
            seed(
                &store,
                &cache,
                &format!("dead{:02}", i),
                "https://a.com",
                Some(severely_past),
            )
            .await;
        }

        let config = ReaperConfig::builder().alarm_threshold(2).build();
        let outcome = reaper(&store, &cache, config).check(now).await;

        let report = outcome.expect("watchdog should have escalated to a sweep");
        assert_eq!(report.store_removed, 3);
        assert_eq!(store.count_all().await.unwrap(), 0);
    }

    /// Store stub whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl LinkStore for BrokenStore {
        async fn insert(
            &self,
            _code: &ShortCode,
            _record: LinkRecord,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn find(&self, _code: &ShortCode) -> Result<Option<LinkRecord>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn increment_visits(&self, _code: &ShortCode) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn count_all(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn count_expired_before(&self, _cutoff: Timestamp) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn count_expiring_between(
            &self,
            _from: Timestamp,
            _to: Timestamp,
        ) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn select_expired_before(
            &self,
            _cutoff: Timestamp,
            _limit: usize,
        ) -> Result<Vec<ShortCode>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn delete_expired_before(&self, _cutoff: Timestamp) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn reaper_absorbs_store_failures() {
        let store = Arc::new(BrokenStore);
        let cache = Arc::new(MokaUrlCache::new());
        let reaper = Reaper::new(store, cache, ReaperConfig::default());
        let now = Timestamp::now();

        // Zero progress, no panic, no error escapes.
        assert_eq!(reaper.sweep(now).await, SweepReport::default());
        assert_eq!(reaper.check(now).await, None);
        assert_eq!(reaper.stats(now).await, LinkStats::default());
    }
}
