//! End-to-end comparison scenarios: mock venues through the aggregator
//! into arbitrage rows.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use perptick_tests::{
    compare, record, Aggregator, AggregatorConfig, ExchangeId, FundingSource, MetricKind,
    MockBehavior, MockSource,
};

fn aggregator(sources: Vec<Arc<dyn FundingSource>>) -> Aggregator {
    Aggregator::new(
        sources,
        AggregatorConfig {
            source_timeout: Duration::from_secs(10),
            cache_ttl: None,
        },
    )
}

fn all_visible() -> BTreeSet<ExchangeId> {
    ExchangeId::ALL.into_iter().collect()
}

#[tokio::test]
async fn three_venue_price_spread_selects_cheapest_long_and_dearest_short() {
    let aggregator = aggregator(vec![
        Arc::new(MockSource::new(
            ExchangeId::Vest,
            MockBehavior::Records(vec![record(ExchangeId::Vest, "BTC", 100.0, 0.0001)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Lighter,
            MockBehavior::Records(vec![record(ExchangeId::Lighter, "BTC", 105.0, 0.0001)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Aster,
            MockBehavior::Records(vec![record(ExchangeId::Aster, "BTC", 110.0, 0.0001)]),
        )),
    ]);

    let snapshot = aggregator.refresh().await;
    let rows = compare(&snapshot, MetricKind::Price, &all_visible());

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.pair.as_str(), "BTC");
    assert_eq!(row.strategy.long, Some(ExchangeId::Vest));
    assert_eq!(row.strategy.short, Some(ExchangeId::Aster));
    assert_eq!(row.metric, 10.0);
}

#[tokio::test]
async fn apr_spread_between_two_venues_is_their_difference() {
    // Per-8h rates chosen so annualized values land exactly on 5 and 20.
    let low_rate = 5.0 / (3.0 * 365.0 * 100.0);
    let high_rate = 20.0 / (3.0 * 365.0 * 100.0);

    let aggregator = aggregator(vec![
        Arc::new(MockSource::new(
            ExchangeId::Extended,
            MockBehavior::Records(vec![record(ExchangeId::Extended, "ETH", 3_545.0, low_rate)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Pacifica,
            MockBehavior::Records(vec![record(
                ExchangeId::Pacifica,
                "ETH",
                3_550.0,
                high_rate,
            )]),
        )),
    ]);

    let snapshot = aggregator.refresh().await;
    let rows = compare(&snapshot, MetricKind::Apr, &all_visible());

    let row = &rows[0];
    assert!((row.metric - 15.0).abs() < 1e-9);
    assert_eq!(row.strategy.long, Some(ExchangeId::Extended));
    assert_eq!(row.strategy.short, Some(ExchangeId::Pacifica));
}

#[tokio::test]
async fn failed_venue_drops_out_of_the_comparison() {
    let aggregator = aggregator(vec![
        Arc::new(MockSource::new(
            ExchangeId::Vest,
            MockBehavior::Records(vec![record(ExchangeId::Vest, "SOL", 190.0, 0.0001)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Aster,
            MockBehavior::Fail("down".to_owned()),
        )),
    ]);

    let snapshot = aggregator.refresh().await;
    let rows = compare(&snapshot, MetricKind::Price, &all_visible());

    // Only one venue reported, so the row is degenerate rather than a
    // spread against stale or absent data.
    let row = &rows[0];
    assert_eq!(row.strategy.long, Some(ExchangeId::Vest));
    assert_eq!(row.strategy.short, None);
    assert_eq!(row.metric, 0.0);
}

#[tokio::test]
async fn pairs_group_across_venues_not_within_them() {
    let aggregator = aggregator(vec![
        Arc::new(MockSource::new(
            ExchangeId::Vest,
            MockBehavior::Records(vec![
                record(ExchangeId::Vest, "BTC", 96_200.0, 0.0001),
                record(ExchangeId::Vest, "ETH", 3_550.0, 0.0001),
            ]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Lighter,
            MockBehavior::Records(vec![record(ExchangeId::Lighter, "ETH", 3_548.0, 0.0001)]),
        )),
    ]);

    let snapshot = aggregator.refresh().await;
    let rows = compare(&snapshot, MetricKind::Price, &all_visible());

    assert_eq!(rows.len(), 2);
    let eth = rows
        .iter()
        .find(|row| row.pair.as_str() == "ETH")
        .expect("ETH row");
    assert_eq!(eth.venues.len(), 2);
    assert!(eth.strategy.short.is_some());

    let btc = rows
        .iter()
        .find(|row| row.pair.as_str() == "BTC")
        .expect("BTC row");
    assert_eq!(btc.strategy.short, None);
}

#[tokio::test]
async fn visibility_filter_changes_the_strategy_not_the_reported_values() {
    let aggregator = aggregator(vec![
        Arc::new(MockSource::new(
            ExchangeId::Vest,
            MockBehavior::Records(vec![record(ExchangeId::Vest, "BTC", 100.0, 0.0001)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Lighter,
            MockBehavior::Records(vec![record(ExchangeId::Lighter, "BTC", 104.0, 0.0001)]),
        )),
        Arc::new(MockSource::new(
            ExchangeId::Aster,
            MockBehavior::Records(vec![record(ExchangeId::Aster, "BTC", 110.0, 0.0001)]),
        )),
    ]);
    let snapshot = aggregator.refresh().await;

    let narrowed: BTreeSet<ExchangeId> =
        [ExchangeId::Vest, ExchangeId::Lighter].into_iter().collect();
    let rows = compare(&snapshot, MetricKind::Price, &narrowed);

    let row = &rows[0];
    assert_eq!(row.strategy.short, Some(ExchangeId::Lighter));
    assert_eq!(row.metric, 4.0);
    // All three reported values stay on the row for display.
    assert_eq!(row.venues.len(), 3);
}
