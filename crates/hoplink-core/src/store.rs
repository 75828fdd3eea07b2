use crate::error::StoreError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A stored short-link record.
///
/// A record is live while `expire_at` is absent or still in the future;
/// the store keeps expired records until the reaper removes them, so
/// callers are responsible for the liveness judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The original URL that was shortened.
    pub target_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// How many times the record has been successfully resolved.
    pub visit_count: u64,
    /// When the record expires. `None` means it never expires.
    pub expire_at: Option<Timestamp>,
}

impl LinkRecord {
    /// Creates a fresh record with a zero visit count.
    pub fn new(
        target_url: impl Into<String>,
        created_at: Timestamp,
        expire_at: Option<Timestamp>,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            created_at,
            visit_count: 0,
            expire_at,
        }
    }

    /// Whether the record's expiration has passed at the given instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

/// The durable record repository, keyed by short code.
///
/// Implementations must enforce uniqueness at insert time: the resolver's
/// generate-and-check loop is only an optimistic pre-check, and the
/// distinguishable [`StoreError::Conflict`] from `insert` is the real
/// correctness backstop under concurrent creates.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Inserts a new record. Returns [`StoreError::Conflict`] if a live
    /// record already holds the code. An expired record under the same
    /// code may be superseded.
    async fn insert(&self, code: &ShortCode, record: LinkRecord) -> Result<()>;

    /// Retrieves the record for a short code, expired or not.
    /// Returns `None` only when no record exists at all.
    async fn find(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Increments the visit counter for a short code.
    /// Returns `false` if the record does not exist.
    async fn increment_visits(&self, code: &ShortCode) -> Result<bool>;

    /// Counts all records, live or expired.
    async fn count_all(&self) -> Result<u64>;

    /// Counts records whose expiration timestamp is at or before `cutoff`,
    /// the same boundary [`LinkRecord::is_expired_at`] uses.
    async fn count_expired_before(&self, cutoff: Timestamp) -> Result<u64>;

    /// Counts records expiring within the `(from, to]` window.
    async fn count_expiring_between(&self, from: Timestamp, to: Timestamp) -> Result<u64>;

    /// Returns up to `limit` codes of records expired at or before `cutoff`.
    async fn select_expired_before(&self, cutoff: Timestamp, limit: usize)
        -> Result<Vec<ShortCode>>;

    /// Deletes every record expired at or before `cutoff` in one operation
    /// and returns the exact number of records removed.
    async fn delete_expired_before(&self, cutoff: Timestamp) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn record_without_expiry_never_expires() {
        let record = LinkRecord::new("https://example.com", Timestamp::now(), None);
        assert!(!record.is_expired_at(Timestamp::now() + SignedDuration::from_hours(24 * 365)));
    }

    #[test]
    fn record_expires_at_the_boundary() {
        let expire_at = Timestamp::now();
        let record = LinkRecord::new("https://example.com", Timestamp::now(), Some(expire_at));
        assert!(record.is_expired_at(expire_at));
        assert!(!record.is_expired_at(expire_at - SignedDuration::from_secs(1)));
    }

    #[test]
    fn new_record_has_zero_visits() {
        let record = LinkRecord::new("https://example.com", Timestamp::now(), None);
        assert_eq!(record.visit_count, 0);
    }
}
