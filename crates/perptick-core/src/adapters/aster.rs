//! Aster adapter.
//!
//! Aster exposes a Binance-style futures API: the premium-index endpoint
//! returns a flat array with concatenated quote symbols (`BTCUSDT`) and
//! the standard 8-hour `lastFundingRate`.

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

const PREMIUM_INDEX_URL: &str = "https://fapi.asterdex.com/fapi/v1/premiumIndex";

pub struct AsterAdapter {
    http: Arc<dyn HttpClient>,
}

impl AsterAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(PREMIUM_INDEX_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("aster transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "aster returned status {}",
                response.status
            )));
        }

        let markets: Vec<PremiumIndex> = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("aster payload: {error}")))?;

        let interval = interval_for(ExchangeId::Aster);
        let now_ms = clock::now_ms();

        let records = markets
            .iter()
            .filter_map(|market| {
                normalize(
                    ExchangeId::Aster,
                    &market.symbol,
                    parse_num(&market.mark_price),
                    parse_num(&market.last_funding_rate),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for AsterAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Aster
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct PremiumIndex {
    symbol: String,
    #[serde(rename = "markPrice", default)]
    mark_price: String,
    #[serde(rename = "lastFundingRate", default)]
    last_funding_rate: String,
}
