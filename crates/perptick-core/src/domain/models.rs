use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ExchangeId, Pair};

/// One venue's observation of one instrument at fetch time.
///
/// Records are produced exclusively by [`crate::normalize::normalize`] so
/// the annualization math has a single source of truth. They are never
/// mutated; a new aggregation cycle supersedes them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub exchange: ExchangeId,
    pub pair: Pair,
    /// Mark price. Non-negative; `0` is the "unavailable" sentinel.
    pub price: f64,
    /// Signed per-interval funding rate as a fraction, not a percentage.
    pub funding_rate: f64,
    /// Annualized funding yield in percentage points. The only
    /// cross-venue-comparable quantity; consumers must never compare raw
    /// `funding_rate` values because settlement intervals differ.
    pub apr: f64,
    pub timestamp_ms: i64,
}

/// Per-venue health for one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeStatus {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ExchangeStatus {
    pub fn ok(count: usize, duration_ms: u64) -> Self {
        Self {
            success: true,
            count,
            error: None,
            duration_ms,
        }
    }

    pub fn failed(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            count: 0,
            error: Some(error.into()),
            duration_ms,
        }
    }
}

/// Immutable result of one aggregation cycle across all venues.
///
/// `status` always carries exactly one entry per registered venue,
/// however many of them failed. An all-failures cycle is still a valid,
/// empty snapshot rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSnapshot {
    pub records: Vec<MarketRecord>,
    pub status: BTreeMap<ExchangeId, ExchangeStatus>,
    pub timestamp_ms: i64,
}

impl AggregatedSnapshot {
    /// Number of venues that reported successfully this cycle.
    pub fn reporting_sources(&self) -> usize {
        self.status.values().filter(|status| status.success).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_constructors_set_flags() {
        let ok = ExchangeStatus::ok(12, 80);
        assert!(ok.success);
        assert_eq!(ok.count, 12);
        assert_eq!(ok.error, None);

        let failed = ExchangeStatus::failed("timeout", 10_000);
        assert!(!failed.success);
        assert_eq!(failed.count, 0);
        assert_eq!(failed.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn counts_reporting_sources() {
        let mut status = BTreeMap::new();
        status.insert(ExchangeId::Vest, ExchangeStatus::ok(3, 40));
        status.insert(ExchangeId::Aster, ExchangeStatus::failed("boom", 5));
        let snapshot = AggregatedSnapshot {
            records: Vec::new(),
            status,
            timestamp_ms: 0,
        };
        assert_eq!(snapshot.reporting_sources(), 1);
        assert!(snapshot.is_empty());
    }
}
