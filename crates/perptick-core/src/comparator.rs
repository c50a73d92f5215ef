//! Cross-venue comparison: per-pair arbitrage strategy and spread metric.
//!
//! Pure transforms over an already-fetched snapshot; no concurrency
//! control and no I/O. The visible-venue set is owned by the caller (a
//! presentation layer decides what is displayed) but the computation must
//! honor it, otherwise the printed strategy and the printed columns
//! disagree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{AggregatedSnapshot, ExchangeId, MarketRecord, Pair, ValidationError};

/// Which per-record quantity a comparison runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Annualized funding yield in percentage points.
    Apr,
    /// Mark price.
    Price,
}

impl MetricKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apr => "apr",
            Self::Price => "price",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "apr" => Ok(Self::Apr),
            "price" => Ok(Self::Price),
            _ => Err(ValidationError::InvalidMetric {
                value: input.to_owned(),
            }),
        }
    }

    /// Spread between the lowest and highest value of a pair.
    ///
    /// APR values are already annualized on a shared basis, so plain
    /// subtraction is valid. Price spreads are relative; a non-positive
    /// floor yields `0`, never a division error.
    pub fn spread(self, min: f64, max: f64) -> f64 {
        match self {
            Self::Apr => max - min,
            Self::Price => {
                if min > 0.0 {
                    (max - min) / min * 100.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Above this magnitude a spread is more likely bad data than alpha.
    pub const fn warning_threshold(self) -> f64 {
        match self {
            Self::Apr => 500.0,
            Self::Price => 10.0,
        }
    }

    fn value_of(self, record: &MarketRecord) -> f64 {
        match self {
            Self::Apr => record.apr,
            Self::Price => record.price,
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Long/short venue selection for one pair. A missing leg means fewer
/// than two visible venues reported; it renders as `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strategy {
    #[serde(serialize_with = "leg_or_dash")]
    pub long: Option<ExchangeId>,
    #[serde(serialize_with = "leg_or_dash")]
    pub short: Option<ExchangeId>,
}

fn leg_or_dash<S: Serializer>(leg: &Option<ExchangeId>, serializer: S) -> Result<S::Ok, S::Error> {
    match leg {
        Some(exchange) => serializer.serialize_str(exchange.as_str()),
        None => serializer.serialize_str("-"),
    }
}

/// One pair's cross-venue comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageRow {
    pub pair: Pair,
    /// Value per reporting venue, visible or not; visibility only gates
    /// the strategy/metric computation.
    pub venues: BTreeMap<ExchangeId, f64>,
    pub strategy: Strategy,
    pub metric: f64,
    pub warning: bool,
}

/// Derive arbitrage rows from a snapshot.
///
/// Rows come out in pair order. Within a pair, ties on the extreme values
/// resolve to the first venue encountered in sorted order; that
/// non-determinism boundary only exists for exactly equal values.
pub fn compare(
    snapshot: &AggregatedSnapshot,
    metric: MetricKind,
    visible: &BTreeSet<ExchangeId>,
) -> Vec<ArbitrageRow> {
    let mut grouped: BTreeMap<Pair, BTreeMap<ExchangeId, f64>> = BTreeMap::new();
    for record in &snapshot.records {
        // A venue reporting the same pair twice in one cycle: last wins.
        grouped
            .entry(record.pair.clone())
            .or_default()
            .insert(record.exchange, metric.value_of(record));
    }

    grouped
        .into_iter()
        .map(|(pair, venues)| row_for_pair(pair, venues, metric, visible))
        .collect()
}

fn row_for_pair(
    pair: Pair,
    venues: BTreeMap<ExchangeId, f64>,
    metric: MetricKind,
    visible: &BTreeSet<ExchangeId>,
) -> ArbitrageRow {
    let mut entries: Vec<(ExchangeId, f64)> = venues
        .iter()
        .filter(|(exchange, _)| visible.contains(exchange))
        .map(|(exchange, value)| (*exchange, *value))
        .collect();

    if entries.len() < 2 {
        // A spread needs two sides.
        return ArbitrageRow {
            pair,
            venues,
            strategy: Strategy {
                long: entries.first().map(|(exchange, _)| *exchange),
                short: None,
            },
            metric: 0.0,
            warning: false,
        };
    }

    entries.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (long, min) = entries[0];
    let (short, max) = entries[entries.len() - 1];
    let value = metric.spread(min, max);

    ArbitrageRow {
        pair,
        venues,
        strategy: Strategy {
            long: Some(long),
            short: Some(short),
        },
        metric: value,
        warning: value.abs() > metric.warning_threshold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::normalize::{normalize, FundingInterval};

    fn record(exchange: ExchangeId, pair: &str, price: f64, rate: f64) -> MarketRecord {
        normalize(exchange, pair, price, rate, FundingInterval::EIGHT_HOURS, 0).expect("record")
    }

    fn snapshot(records: Vec<MarketRecord>) -> AggregatedSnapshot {
        AggregatedSnapshot {
            records,
            status: BTreeMap::new(),
            timestamp_ms: 0,
        }
    }

    fn all_visible() -> BTreeSet<ExchangeId> {
        ExchangeId::ALL.into_iter().collect()
    }

    #[test]
    fn price_spread_uses_lowest_as_long_leg() {
        let snapshot = snapshot(vec![
            record(ExchangeId::Vest, "BTC", 100.0, 0.0),
            record(ExchangeId::Lighter, "BTC", 105.0, 0.0),
            record(ExchangeId::Aster, "BTC", 110.0, 0.0),
        ]);

        let rows = compare(&snapshot, MetricKind::Price, &all_visible());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.strategy.long, Some(ExchangeId::Vest));
        assert_eq!(row.strategy.short, Some(ExchangeId::Aster));
        assert_eq!(row.metric, 10.0);
        assert!(!row.warning);
    }

    #[test]
    fn apr_spread_is_plain_subtraction() {
        // Rates chosen so the annualized values are exactly 5 and 20.
        let low = 5.0 / (3.0 * 365.0 * 100.0);
        let high = 20.0 / (3.0 * 365.0 * 100.0);
        let snapshot = snapshot(vec![
            record(ExchangeId::Vest, "ETH", 3_500.0, low),
            record(ExchangeId::Extended, "ETH", 3_500.0, high),
        ]);

        let rows = compare(&snapshot, MetricKind::Apr, &all_visible());
        let row = &rows[0];
        assert!((row.metric - 15.0).abs() < 1e-9);
        assert_eq!(row.strategy.long, Some(ExchangeId::Vest));
        assert_eq!(row.strategy.short, Some(ExchangeId::Extended));
    }

    #[test]
    fn single_venue_yields_degenerate_row() {
        let snapshot = snapshot(vec![record(ExchangeId::Hibachi, "DOGE", 0.1, 0.0001)]);

        let rows = compare(&snapshot, MetricKind::Apr, &all_visible());
        let row = &rows[0];
        assert_eq!(row.strategy.long, Some(ExchangeId::Hibachi));
        assert_eq!(row.strategy.short, None);
        assert_eq!(row.metric, 0.0);
    }

    #[test]
    fn zero_floor_price_spread_is_zero_not_infinite() {
        let snapshot = snapshot(vec![
            record(ExchangeId::Vest, "NEW", 0.0, 0.0),
            record(ExchangeId::Aster, "NEW", 12.0, 0.0),
        ]);

        let rows = compare(&snapshot, MetricKind::Price, &all_visible());
        assert_eq!(rows[0].metric, 0.0);
        assert!(rows[0].metric.is_finite());
    }

    #[test]
    fn hidden_venues_are_excluded_from_strategy_but_kept_in_values() {
        let snapshot = snapshot(vec![
            record(ExchangeId::Vest, "BTC", 100.0, 0.0),
            record(ExchangeId::Lighter, "BTC", 105.0, 0.0),
            record(ExchangeId::Aster, "BTC", 110.0, 0.0),
        ]);
        let visible: BTreeSet<ExchangeId> =
            [ExchangeId::Vest, ExchangeId::Lighter].into_iter().collect();

        let rows = compare(&snapshot, MetricKind::Price, &visible);
        let row = &rows[0];
        assert_eq!(row.strategy.short, Some(ExchangeId::Lighter));
        assert_eq!(row.metric, 5.0);
        assert_eq!(row.venues.len(), 3);
    }

    #[test]
    fn implausible_spread_is_flagged() {
        let snapshot = snapshot(vec![
            record(ExchangeId::Vest, "ODD", 100.0, 0.0),
            record(ExchangeId::Aster, "ODD", 150.0, 0.0),
        ]);

        let rows = compare(&snapshot, MetricKind::Price, &all_visible());
        assert_eq!(rows[0].metric, 50.0);
        assert!(rows[0].warning);
    }

    #[test]
    fn strategy_serializes_missing_legs_as_dash() {
        let strategy = Strategy {
            long: Some(ExchangeId::Vest),
            short: None,
        };
        let json = serde_json::to_value(strategy).expect("json");
        assert_eq!(json["long"], "vest");
        assert_eq!(json["short"], "-");
    }
}
