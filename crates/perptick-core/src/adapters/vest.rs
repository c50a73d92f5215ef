//! Vest adapter.
//!
//! One GET against the latest-ticker endpoint. Vest quotes an hourly
//! funding rate per `-PERP` symbol.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::interval_for;
use crate::clock;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{normalize, parse_num};
use crate::source::{FundingSource, SourceError};
use crate::{ExchangeId, MarketRecord};

const TICKER_URL: &str = "https://serverprod.vest.exchange/v2/ticker/latest";

pub struct VestAdapter {
    http: Arc<dyn HttpClient>,
}

impl VestAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(TICKER_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("vest transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "vest returned status {}",
                response.status
            )));
        }

        let payload: TickerResponse = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("vest payload: {error}")))?;

        let interval = interval_for(ExchangeId::Vest);
        let now_ms = clock::now_ms();

        let records = payload
            .tickers
            .iter()
            .filter(|ticker| ticker.symbol.ends_with("-PERP"))
            .filter_map(|ticker| {
                normalize(
                    ExchangeId::Vest,
                    &ticker.symbol,
                    parse_num(&ticker.mark_price),
                    parse_num(&ticker.one_hr_funding_rate),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for VestAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Vest
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    tickers: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    symbol: String,
    #[serde(rename = "markPrice", default)]
    mark_price: String,
    #[serde(rename = "oneHrFundingRate", default)]
    one_hr_funding_rate: String,
}
