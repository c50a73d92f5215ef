//! Paradex adapter.
//!
//! Paradex splits market data across two endpoints: the summary carries
//! prices and raw funding rates, the markets listing carries each
//! market's `funding_period_hours`. Both are fetched in parallel in one
//! round. Rates are normalized to an 8-hour basis with the venue's own
//! formula (`rate × 8 / funding_period_hours`) before annualization.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::interval_for;
use crate::clock;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::normalize::{normalize, parse_num};
use crate::source::{FundingSource, SourceError};
use crate::{ExchangeId, MarketRecord};

const SUMMARY_URL: &str = "https://api.prod.paradex.trade/v1/markets/summary?market=ALL";
const MARKETS_URL: &str = "https://api.prod.paradex.trade/v1/markets";

const DEFAULT_FUNDING_PERIOD_HOURS: f64 = 8.0;

pub struct ParadexAdapter {
    http: Arc<dyn HttpClient>,
}

impl ParadexAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(url))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("paradex transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "paradex returned status {}",
                response.status
            )));
        }

        Ok(response)
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let (summary, markets) = tokio::join!(self.get(SUMMARY_URL), self.get(MARKETS_URL));

        // The summary is the data source proper; the markets listing only
        // refines funding periods and may be absent without failing the venue.
        let summary = summary?;
        let summary: SummaryResponse = serde_json::from_str(&summary.body)
            .map_err(|error| SourceError::malformed(format!("paradex summary payload: {error}")))?;

        let funding_periods: HashMap<String, f64> = match markets {
            Ok(response) => serde_json::from_str::<MarketsResponse>(&response.body)
                .map(|markets| {
                    markets
                        .results
                        .into_iter()
                        .filter_map(|market| {
                            let hours = market.funding_period_hours?;
                            (hours > 0.0).then_some((market.symbol, hours))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Err(error) => {
                tracing::debug!(error = %error, "paradex markets listing unavailable; assuming default funding period");
                HashMap::new()
            }
        };

        let interval = interval_for(ExchangeId::Paradex);
        let now_ms = clock::now_ms();

        let records = summary
            .results
            .iter()
            .filter(|market| market.symbol.ends_with("-PERP"))
            .filter_map(|market| {
                let period = funding_periods
                    .get(&market.symbol)
                    .copied()
                    .unwrap_or(DEFAULT_FUNDING_PERIOD_HOURS);
                let rate_8h = parse_num(&market.funding_rate) * 8.0 / period;

                normalize(
                    ExchangeId::Paradex,
                    &market.symbol,
                    parse_num(&market.mark_price),
                    rate_8h,
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for ParadexAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Paradex
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    results: Vec<MarketSummary>,
}

#[derive(Debug, Deserialize)]
struct MarketSummary {
    symbol: String,
    #[serde(default)]
    mark_price: String,
    #[serde(default)]
    funding_rate: String,
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    results: Vec<MarketInfo>,
}

#[derive(Debug, Deserialize)]
struct MarketInfo {
    symbol: String,
    #[serde(default)]
    funding_period_hours: Option<f64>,
}
