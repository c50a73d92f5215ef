//! Contract tests for venue adapters against canned payloads.
//!
//! No network: every adapter runs against a stub transport and must
//! translate its venue's schema into canonical records, filter
//! non-tradable instruments, and surface failures as typed errors
//! rather than panicking.

use std::sync::Arc;
use std::time::Duration;

use perptick_core::adapters::{
    default_registry, AsterAdapter, ExtendedAdapter, HyperliquidAdapter, OstiumAdapter,
    ParadexAdapter,
};
use perptick_core::SourceErrorKind;
use perptick_tests::{
    Aggregator, AggregatorConfig, ExchangeId, FailingHttpClient, FundingSource, HttpClient,
    StaticHttpClient,
};

#[tokio::test]
async fn hyperliquid_zips_universe_with_contexts_and_drops_delisted() {
    let body = r#"[
        {"universe": [
            {"name": "BTC"},
            {"name": "OLD", "isDelisted": true},
            {"name": "ETH"}
        ]},
        [
            {"markPx": "96250.0", "funding": "0.0000125"},
            {"markPx": "1.0", "funding": "0.5"},
            {"markPx": "3545.5", "funding": "-0.0000100"}
        ]
    ]"#;
    let adapter = HyperliquidAdapter::hyperliquid(Arc::new(StaticHttpClient::single(body)));

    let records = adapter.fetch().await.expect("fetch");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pair.as_str(), "BTC");
    assert_eq!(records[0].price, 96_250.0);
    // Hourly venue: apr = rate × 24 × 365 × 100.
    assert_eq!(records[0].apr, 0.0000125 * 24.0 * 365.0 * 100.0);
    assert_eq!(records[1].pair.as_str(), "ETH");
    assert!(records[1].apr < 0.0);
}

#[tokio::test]
async fn xyz_strips_the_deployer_namespace() {
    let body = r#"[
        {"universe": [{"name": "xyz:TSLA"}]},
        [{"markPx": "420.5", "funding": "0.0000100"}]
    ]"#;
    let adapter = HyperliquidAdapter::xyz(Arc::new(StaticHttpClient::single(body)));

    let records = adapter.fetch().await.expect("fetch");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].exchange, ExchangeId::Xyz);
    assert_eq!(records[0].pair.as_str(), "TSLA");
}

#[tokio::test]
async fn paradex_scales_rates_by_the_per_market_funding_period() {
    let summary = r#"{"results": [
        {"symbol": "BTC-USD-PERP", "mark_price": "96000.5", "funding_rate": "0.0001"},
        {"symbol": "BTC-USD-SPOT", "mark_price": "96000.0", "funding_rate": "0"}
    ]}"#;
    let markets = r#"{"results": [
        {"symbol": "BTC-USD-PERP", "funding_period_hours": 4.0}
    ]}"#;
    let adapter = ParadexAdapter::new(Arc::new(StaticHttpClient::new(vec![
        (
            "https://api.prod.paradex.trade/v1/markets/summary?market=ALL",
            summary,
        ),
        ("https://api.prod.paradex.trade/v1/markets", markets),
    ])));

    let records = adapter.fetch().await.expect("fetch");

    // The spot entry is filtered; the perp's 4h rate is normalized to 8h
    // (×2) and annualized on the 8h basis.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pair.as_str(), "BTC");
    assert_eq!(records[0].funding_rate, 0.0002);
    assert_eq!(records[0].apr, 0.0002 * 3.0 * 365.0 * 100.0);
}

#[tokio::test]
async fn ostium_unscales_fixed_point_subgraph_values() {
    let body = r#"{"data": {"pairs": [
        {"from": "BTC", "to": "USD",
         "lastTradePrice": "96200000000000000000000",
         "lastFundingRate": "100000"}
    ]}}"#;
    let adapter = OstiumAdapter::new(Arc::new(StaticHttpClient::single(body)));

    let records = adapter.fetch().await.expect("fetch");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pair.as_str(), "BTC");
    assert_eq!(records[0].price, 96_200.0);
    assert_eq!(records[0].funding_rate, 0.0001);
}

#[tokio::test]
async fn extended_keeps_only_active_markets() {
    let body = r#"{"data": [
        {"name": "BTC-USD", "status": "ACTIVE",
         "marketStats": {"markPrice": "96250", "fundingRate": "0.00001"}},
        {"name": "GONE-USD", "status": "DELISTED",
         "marketStats": {"markPrice": "1", "fundingRate": "0"}}
    ]}"#;
    let adapter = ExtendedAdapter::new(Arc::new(StaticHttpClient::single(body)));

    let records = adapter.fetch().await.expect("fetch");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pair.as_str(), "BTC");
}

#[tokio::test]
async fn aster_strips_concatenated_quotes_and_resolves_collisions() {
    let body = r#"[
        {"symbol": "BTCUSDT", "markPrice": "96300.0", "lastFundingRate": "0.00015"},
        {"symbol": "SPXUSDT", "markPrice": "1.05", "lastFundingRate": "0.0001"}
    ]"#;
    let adapter = AsterAdapter::new(Arc::new(StaticHttpClient::single(body)));

    let records = adapter.fetch().await.expect("fetch");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pair.as_str(), "BTC");
    // SPX on aster is the SPX6900 token, not the index product.
    assert_eq!(records[1].pair.as_str(), "SPX6900");
}

#[tokio::test]
async fn malformed_payload_is_a_typed_error_not_a_panic() {
    let adapter =
        HyperliquidAdapter::hyperliquid(Arc::new(StaticHttpClient::single("not even json")));

    let error = adapter.fetch().await.expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::MalformedPayload);
}

#[tokio::test]
async fn upstream_error_status_is_unavailable() {
    let adapter = ExtendedAdapter::new(Arc::new(StaticHttpClient::status(503)));

    let error = adapter.fetch().await.expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
}

#[tokio::test]
async fn every_adapter_survives_a_dead_network() {
    // The totality property: with the network down, every registered
    // adapter returns a typed error, and the orchestrator turns that
    // into an empty-but-valid snapshot.
    let http: Arc<dyn HttpClient> = Arc::new(FailingHttpClient);
    let registry = default_registry(http);

    for source in &registry {
        let error = source.fetch().await.expect_err("dead network must fail");
        assert_eq!(
            error.kind(),
            SourceErrorKind::Unavailable,
            "{} should classify transport failure",
            source.id()
        );
    }

    let aggregator = Aggregator::new(
        registry,
        AggregatorConfig {
            source_timeout: Duration::from_secs(10),
            cache_ttl: None,
        },
    );
    let snapshot = aggregator.refresh().await;

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.status.len(), ExchangeId::ALL.len());
    assert!(snapshot.status.values().all(|status| !status.success));
}
