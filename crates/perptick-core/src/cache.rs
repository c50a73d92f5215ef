//! Short-lived snapshot cache.
//!
//! A single shared value guarded by an async `RwLock`, owned by the
//! aggregator instance rather than living in module state so its
//! lifecycle is testable against an injected clock. Two rules:
//!
//! - only a snapshot with records may populate the cache, so a stale
//!   value is never replaced by an even-more-stale empty result;
//! - an entry past its TTL is never served, it simply reads as a miss.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::AggregatedSnapshot;

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: AggregatedSnapshot,
    stored_at_ms: i64,
}

/// TTL-bounded single-snapshot cache.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<CachedSnapshot>>>,
    ttl_ms: Option<i64>,
}

impl SnapshotCache {
    /// `ttl: None` disables the cache entirely (request-per-invocation
    /// deployments): every read misses and every store is a no-op.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            ttl_ms: ttl.map(|ttl| ttl.as_millis() as i64),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub const fn is_enabled(&self) -> bool {
        self.ttl_ms.is_some()
    }

    /// The cached snapshot, if present and younger than the TTL.
    pub async fn get(&self, now_ms: i64) -> Option<AggregatedSnapshot> {
        let ttl_ms = self.ttl_ms?;
        let guard = self.inner.read().await;
        guard.as_ref().and_then(|entry| {
            if now_ms - entry.stored_at_ms < ttl_ms {
                Some(entry.snapshot.clone())
            } else {
                None
            }
        })
    }

    /// Store a snapshot. Empty snapshots never overwrite a prior value.
    pub async fn store(&self, snapshot: &AggregatedSnapshot, now_ms: i64) {
        if self.ttl_ms.is_none() || snapshot.records.is_empty() {
            return;
        }

        let mut guard = self.inner.write().await;
        *guard = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            stored_at_ms: now_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::normalize::{normalize, FundingInterval};
    use crate::ExchangeId;

    fn snapshot_with_records(count: usize) -> AggregatedSnapshot {
        let records = (0..count)
            .map(|index| {
                normalize(
                    ExchangeId::Vest,
                    &format!("AS{index}"),
                    100.0,
                    0.0001,
                    FundingInterval::EIGHT_HOURS,
                    0,
                )
                .expect("record")
            })
            .collect();
        AggregatedSnapshot {
            records,
            status: BTreeMap::new(),
            timestamp_ms: 0,
        }
    }

    #[tokio::test]
    async fn serves_fresh_entry_and_expires_after_ttl() {
        let cache = SnapshotCache::new(Some(Duration::from_millis(15_000)));
        cache.store(&snapshot_with_records(2), 1_000).await;

        assert!(cache.get(1_500).await.is_some());
        assert!(cache.get(15_999).await.is_some());
        assert!(cache.get(16_000).await.is_none());
    }

    #[tokio::test]
    async fn empty_snapshot_never_overwrites_cached_value() {
        let cache = SnapshotCache::new(Some(Duration::from_millis(15_000)));
        cache.store(&snapshot_with_records(3), 1_000).await;
        cache.store(&snapshot_with_records(0), 2_000).await;

        let cached = cache.get(2_500).await.expect("entry should survive");
        assert_eq!(cached.records.len(), 3);
    }

    #[tokio::test]
    async fn disabled_cache_is_always_a_miss() {
        let cache = SnapshotCache::disabled();
        assert!(!cache.is_enabled());

        cache.store(&snapshot_with_records(2), 1_000).await;
        assert!(cache.get(1_001).await.is_none());
    }
}
