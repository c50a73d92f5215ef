//! Historical spread series from persisted samples.
//!
//! Samples land in the warehouse one row per (cycle, venue, pair); a
//! query reduces them to a per-cycle cross-venue spread series for one
//! pair. Buckets with fewer than two distinct venues are dropped
//! entirely, not zero-filled: a missing comparison is not a zero spread.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use time::Duration;

use perptick_warehouse::{HistoryRow, HistoryStore, WarehouseError};

use crate::comparator::MetricKind;
use crate::{ExchangeId, MarketRecord, Pair, ValidationError};

/// Query window for a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    #[serde(rename = "24H")]
    H24,
    #[serde(rename = "7D")]
    D7,
    #[serde(rename = "30D")]
    D30,
    #[serde(rename = "ALL")]
    All,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H24 => "24H",
            Self::D7 => "7D",
            Self::D30 => "30D",
            Self::All => "ALL",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_uppercase().as_str() {
            "24H" => Ok(Self::H24),
            "7D" => Ok(Self::D7),
            "30D" => Ok(Self::D30),
            "ALL" => Ok(Self::All),
            _ => Err(ValidationError::InvalidPeriod {
                value: input.to_owned(),
            }),
        }
    }

    /// Inclusive lower bound of the window, `None` for an unbounded query.
    pub fn cutoff_ms(self, now_ms: i64) -> Option<i64> {
        let span = match self {
            Self::H24 => Duration::hours(24),
            Self::D7 => Duration::days(7),
            Self::D30 => Duration::days(30),
            Self::All => return None,
        };
        Some(now_ms - span.whole_milliseconds() as i64)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// One persisted observation projected onto the requested metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub timestamp_ms: i64,
    pub exchange: ExchangeId,
    pub value: f64,
}

/// Reduce samples to a per-timestamp spread series.
///
/// Samples sharing an exact `timestamp_ms` belong to one fetch cycle and
/// form one bucket. Values come out in ascending timestamp order, without
/// timestamps; alignment is the caller's concern via the period contract.
pub fn bucket_spreads(samples: &[HistorySample], metric: MetricKind) -> Vec<f64> {
    let mut buckets: BTreeMap<i64, BTreeMap<ExchangeId, f64>> = BTreeMap::new();
    for sample in samples {
        buckets
            .entry(sample.timestamp_ms)
            .or_default()
            .insert(sample.exchange, sample.value);
    }

    buckets
        .into_values()
        .filter(|venues| venues.len() >= 2)
        .map(|venues| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for value in venues.values() {
                min = min.min(*value);
                max = max.max(*value);
            }
            metric.spread(min, max)
        })
        .collect()
}

/// Project a warehouse row onto the requested metric. Rows from venues no
/// longer in the registry are skipped rather than failing the query.
pub fn sample_from_row(row: &HistoryRow, metric: MetricKind) -> Option<HistorySample> {
    let exchange = ExchangeId::parse(&row.exchange).ok()?;
    let value = match metric {
        MetricKind::Apr => row.apr,
        MetricKind::Price => row.price,
    };
    Some(HistorySample {
        timestamp_ms: row.timestamp_ms,
        exchange,
        value,
    })
}

/// Shape a record into its persisted form.
pub fn row_from_record(record: &MarketRecord) -> HistoryRow {
    HistoryRow {
        timestamp_ms: record.timestamp_ms,
        exchange: record.exchange.as_str().to_owned(),
        pair: record.pair.as_str().to_owned(),
        price: record.price,
        funding_rate: record.funding_rate,
        apr: record.apr,
    }
}

/// Store-backed history queries.
pub struct HistoryService {
    store: Arc<HistoryStore>,
}

impl HistoryService {
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self { store }
    }

    /// Bucketed spread series for one pair over the requested window.
    pub async fn history(
        &self,
        pair: &Pair,
        metric: MetricKind,
        period: Period,
        now_ms: i64,
    ) -> Result<Vec<f64>, WarehouseError> {
        let store = Arc::clone(&self.store);
        let pair = pair.as_str().to_owned();
        let since_ms = period.cutoff_ms(now_ms);

        let rows = tokio::task::spawn_blocking(move || store.samples(&pair, since_ms))
            .await
            .map_err(|error| WarehouseError::QueryError(error.to_string()))??;

        let samples: Vec<HistorySample> = rows
            .iter()
            .filter_map(|row| sample_from_row(row, metric))
            .collect();

        Ok(bucket_spreads(&samples, metric))
    }
}
