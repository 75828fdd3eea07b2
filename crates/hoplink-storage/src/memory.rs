use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hoplink_core::store::Result;
use hoplink_core::{LinkRecord, LinkStore, ShortCode, StoreError};
use jiff::Timestamp;

/// In-memory implementation of the [`LinkStore`] trait using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to different
/// buckets without blocking. Expired records stay in the map until the
/// reaper deletes them: `find` returns them as-is so callers can tell
/// "expired" apart from "never existed".
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<String, LinkRecord>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl LinkStore for InMemoryStore {
    async fn insert(&self, code: &ShortCode, record: LinkRecord) -> Result<()> {
        // The entry API makes check-and-insert atomic per bucket, which is
        // the uniqueness backstop the resolver's pre-check loop relies on.
        match self.records.entry(code.as_str().to_owned()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired_at(Timestamp::now()) {
                    occupied.insert(record);
                    Ok(())
                } else {
                    Err(StoreError::Conflict(code.to_string()))
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn find(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.records.get(code.as_str()).map(|r| r.value().clone()))
    }

    async fn increment_visits(&self, code: &ShortCode) -> Result<bool> {
        match self.records.get_mut(code.as_str()) {
            Some(mut record) => {
                record.visit_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }

    async fn count_expired_before(&self, cutoff: Timestamp) -> Result<u64> {
        // Inclusive cutoff, matching LinkRecord::is_expired_at: a record
        // expiring exactly at the cutoff is already dead.
        let count = self
            .records
            .iter()
            .filter(|r| r.expire_at.is_some_and(|at| at <= cutoff))
            .count();
        Ok(count as u64)
    }

    async fn count_expiring_between(&self, from: Timestamp, to: Timestamp) -> Result<u64> {
        let count = self
            .records
            .iter()
            .filter(|r| r.expire_at.is_some_and(|at| at > from && at <= to))
            .count();
        Ok(count as u64)
    }

    async fn select_expired_before(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<ShortCode>> {
        let codes = self
            .records
            .iter()
            .filter(|r| r.expire_at.is_some_and(|at| at <= cutoff))
            .take(limit)
            .map(|r| ShortCode::new_unchecked(r.key().clone()))
            .collect();
        Ok(codes)
    }

    async fn delete_expired_before(&self, cutoff: Timestamp) -> Result<u64> {
        let expired: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.expire_at.is_some_and(|at| at <= cutoff))
            .map(|r| r.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            // remove_if re-checks the predicate under the bucket lock in
            // case a fresh record superseded the expired one meanwhile.
            if self
                .records
                .remove_if(&key, |_, record| {
                    record.expire_at.is_some_and(|at| at <= cutoff)
                })
                .is_some()
            {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
