//! Concurrent fan-out orchestrator.
//!
//! One refresh cycle runs every registered adapter concurrently, races
//! each against an independent deadline, and merges whatever succeeded.
//! The central invariant is failure isolation: no venue's failure, however
//! it fails, may keep another venue's records out of the snapshot, and a
//! cycle with zero successes still returns a valid empty snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use perptick_warehouse::HistoryStore;

use crate::cache::SnapshotCache;
use crate::clock::{Clock, SystemClock};
use crate::history::row_from_record;
use crate::source::{FundingSource, SourceError};
use crate::{AggregatedSnapshot, ExchangeStatus};

/// Aggregation tuning knobs.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Deadline for each adapter's fetch. Timing out is the same as the
    /// adapter returning an error.
    pub source_timeout: Duration,
    /// Snapshot cache TTL; `None` disables caching and every call fans out.
    pub cache_ttl: Option<Duration>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(10),
            cache_ttl: Some(Duration::from_secs(15)),
        }
    }
}

/// The call point external layers use to obtain a fresh merged snapshot.
pub struct Aggregator {
    sources: Vec<Arc<dyn FundingSource>>,
    config: AggregatorConfig,
    cache: SnapshotCache,
    clock: Arc<dyn Clock>,
    sink: Option<Arc<HistoryStore>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn FundingSource>>, config: AggregatorConfig) -> Self {
        let cache = SnapshotCache::new(config.cache_ttl);
        Self {
            sources,
            config,
            cache,
            clock: Arc::new(SystemClock),
            sink: None,
        }
    }

    /// Replace the wall clock; cache TTL tests drive this.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a write-through historical sink. Persistence failures are
    /// logged and never affect the snapshot returned to the caller.
    pub fn with_sink(mut self, sink: Arc<HistoryStore>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run one aggregation cycle, or serve the cached snapshot when it is
    /// still within its TTL.
    pub async fn refresh(&self) -> AggregatedSnapshot {
        let now_ms = self.clock.now_ms();
        if let Some(cached) = self.cache.get(now_ms).await {
            tracing::debug!(records = cached.records.len(), "serving cached snapshot");
            return cached;
        }

        tracing::debug!(sources = self.sources.len(), "refreshing market data");

        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let deadline = self.config.source_timeout;
            tasks.spawn(async move {
                let started = Instant::now();
                // The race: first of {fetch result, deadline}. On timeout the
                // fetch future is dropped, so a late result can never leak
                // into a snapshot that was already assembled.
                let outcome = match tokio::time::timeout(deadline, source.fetch()).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::timeout(format!(
                        "no response within {}ms",
                        deadline.as_millis()
                    ))),
                };
                (source.id(), outcome, started.elapsed().as_millis() as u64)
            });
        }

        let mut records = Vec::new();
        let mut status = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(list), duration_ms)) => {
                    status.insert(id, ExchangeStatus::ok(list.len(), duration_ms));
                    records.extend(list);
                }
                Ok((id, Err(error), duration_ms)) => {
                    tracing::warn!(exchange = id.as_str(), error = %error, "source failed");
                    status.insert(id, ExchangeStatus::failed(error.to_string(), duration_ms));
                }
                Err(join_error) => {
                    tracing::warn!(error = %join_error, "source task aborted");
                }
            }
        }

        // A task that died before reporting (an adapter bug, not a data
        // failure) still owes the snapshot a status entry.
        for source in &self.sources {
            status
                .entry(source.id())
                .or_insert_with(|| ExchangeStatus::failed("source task aborted", 0));
        }

        let snapshot = AggregatedSnapshot {
            records,
            status,
            timestamp_ms: now_ms,
        };

        self.cache.store(&snapshot, now_ms).await;
        self.persist(&snapshot).await;

        snapshot
    }

    async fn persist(&self, snapshot: &AggregatedSnapshot) {
        let Some(sink) = &self.sink else {
            return;
        };
        if snapshot.records.is_empty() {
            return;
        }

        let rows: Vec<_> = snapshot.records.iter().map(row_from_record).collect();
        let sink = Arc::clone(sink);
        match tokio::task::spawn_blocking(move || sink.insert_rows(&rows)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "failed to persist snapshot");
            }
            Err(error) => {
                tracing::warn!(error = %error, "persistence task aborted");
            }
        }
    }
}
