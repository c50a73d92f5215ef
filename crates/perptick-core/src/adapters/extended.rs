//! Extended adapter.
//!
//! One GET against the Starknet markets listing; every market carries its
//! own stats block. Markets not in `ACTIVE` status are filtered before
//! normalization.

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

const MARKETS_URL: &str = "https://api.starknet.extended.exchange/api/v1/info/markets";

pub struct ExtendedAdapter {
    http: Arc<dyn HttpClient>,
}

impl ExtendedAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(MARKETS_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("extended transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "extended returned status {}",
                response.status
            )));
        }

        let payload: MarketsResponse = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("extended payload: {error}")))?;

        let interval = interval_for(ExchangeId::Extended);
        let now_ms = clock::now_ms();

        let records = payload
            .data
            .iter()
            .filter(|market| market.status == "ACTIVE")
            .filter_map(|market| {
                normalize(
                    ExchangeId::Extended,
                    &market.name,
                    parse_num(&market.market_stats.mark_price),
                    parse_num(&market.market_stats.funding_rate),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for ExtendedAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Extended
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    #[serde(default)]
    data: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    name: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "marketStats", default)]
    market_stats: MarketStats,
}

#[derive(Debug, Default, Deserialize)]
struct MarketStats {
    #[serde(rename = "markPrice", default)]
    mark_price: String,
    #[serde(rename = "fundingRate", default)]
    funding_rate: String,
}
