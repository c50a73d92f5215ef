//! Hibachi adapter.
//!
//! One GET against the exchange-info endpoint. Contracts not in `LIVE`
//! status are filtered out. Hibachi's settlement cadence is undocumented,
//! so the interval table carries it as an unverified assumption.

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

const EXCHANGE_INFO_URL: &str = "https://api.hibachi.xyz/market/exchange-info";

pub struct HibachiAdapter {
    http: Arc<dyn HttpClient>,
}

impl HibachiAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(EXCHANGE_INFO_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("hibachi transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "hibachi returned status {}",
                response.status
            )));
        }

        let payload: ExchangeInfo = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("hibachi payload: {error}")))?;

        let interval = interval_for(ExchangeId::Hibachi);
        let now_ms = clock::now_ms();

        let records = payload
            .future_contracts
            .iter()
            .filter(|contract| contract.status == "LIVE")
            .filter_map(|contract| {
                let rate = contract
                    .funding_rate_estimation
                    .as_ref()
                    .map(|estimation| parse_num(&estimation.estimated_funding_rate))
                    .unwrap_or(0.0);

                normalize(
                    ExchangeId::Hibachi,
                    &contract.symbol,
                    parse_num(&contract.mark_price),
                    rate,
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for HibachiAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Hibachi
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    #[serde(rename = "futureContracts", default)]
    future_contracts: Vec<FutureContract>,
}

#[derive(Debug, Deserialize)]
struct FutureContract {
    symbol: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "markPrice", default)]
    mark_price: String,
    #[serde(rename = "fundingRateEstimation", default)]
    funding_rate_estimation: Option<FundingRateEstimation>,
}

#[derive(Debug, Deserialize)]
struct FundingRateEstimation {
    #[serde(rename = "estimatedFundingRate", default)]
    estimated_funding_rate: String,
}
