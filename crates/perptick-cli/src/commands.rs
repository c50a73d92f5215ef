use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use perptick_core::adapters::default_registry;
use perptick_core::{
    compare, funding_interval, now_ms, Aggregator, AggregatorConfig, ExchangeId, HistoryService,
    HistoryStore, MetricKind, Pair, Period, ReqwestHttpClient,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Snapshot { pair, db } => snapshot(cli, pair.as_deref(), db.as_deref()).await,
        Command::Arb { metric, visible } => arb(cli, (*metric).into(), visible).await,
        Command::History {
            pair,
            metric,
            period,
            db,
        } => history(cli, pair, (*metric).into(), period, db).await,
        Command::Sources => sources(cli),
    }
}

fn build_aggregator(cli: &Cli) -> Aggregator {
    let http = Arc::new(ReqwestHttpClient::new());
    let config = AggregatorConfig {
        source_timeout: Duration::from_millis(cli.timeout_ms),
        cache_ttl: if cli.no_cache {
            None
        } else {
            AggregatorConfig::default().cache_ttl
        },
    };
    Aggregator::new(default_registry(http), config)
}

async fn snapshot(
    cli: &Cli,
    pair: Option<&str>,
    db: Option<&std::path::Path>,
) -> Result<(), CliError> {
    let mut aggregator = build_aggregator(cli);
    if let Some(path) = db {
        aggregator = aggregator.with_sink(Arc::new(HistoryStore::open(path)?));
    }

    let snapshot = aggregator.refresh().await;

    let records: Vec<_> = match pair {
        Some(raw) => {
            let pair = Pair::parse(raw)?;
            snapshot
                .records
                .iter()
                .filter(|record| record.pair == pair)
                .cloned()
                .collect()
        }
        None => snapshot.records.clone(),
    };

    output::render(
        &json!({
            "success": true,
            "count": records.len(),
            "data": records,
            "status": snapshot.status,
            "timestamp": snapshot.timestamp_ms,
        }),
        cli.pretty,
    )
}

async fn arb(cli: &Cli, metric: MetricKind, visible: &[String]) -> Result<(), CliError> {
    let visible: BTreeSet<ExchangeId> = if visible.is_empty() {
        ExchangeId::ALL.into_iter().collect()
    } else {
        visible
            .iter()
            .map(|name| ExchangeId::parse(name))
            .collect::<Result<_, _>>()?
    };

    let aggregator = build_aggregator(cli);
    let snapshot = aggregator.refresh().await;
    let rows = compare(&snapshot, metric, &visible);

    output::render(
        &json!({
            "success": true,
            "metric": metric,
            "count": rows.len(),
            "data": rows,
            "status": snapshot.status,
        }),
        cli.pretty,
    )
}

async fn history(
    cli: &Cli,
    pair: &str,
    metric: MetricKind,
    period: &str,
    db: &std::path::Path,
) -> Result<(), CliError> {
    let pair = Pair::parse(pair)?;
    let period = Period::parse(period)?;

    let store = Arc::new(HistoryStore::open(db)?);
    let service = HistoryService::new(store);
    let series = service.history(&pair, metric, period, now_ms()).await?;

    output::render(
        &json!({
            "success": true,
            "pair": pair,
            "type": metric,
            "period": period,
            "history": series,
        }),
        cli.pretty,
    )
}

fn sources(cli: &Cli) -> Result<(), CliError> {
    let venues: Vec<_> = ExchangeId::ALL
        .into_iter()
        .map(|exchange| {
            let interval = funding_interval(exchange);
            json!({
                "exchange": exchange,
                "funding_interval_hours": interval.hours,
                "interval_verified": interval.verified,
            })
        })
        .collect();

    output::render(&json!({ "success": true, "data": venues }), cli.pretty)
}
