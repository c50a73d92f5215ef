//! Pacifica adapter.
//!
//! One GET against the info endpoint; plain base-asset symbols with an
//! hourly funding rate.

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

const INFO_URL: &str = "https://api.pacifica.fi/api/v1/info";

pub struct PacificaAdapter {
    http: Arc<dyn HttpClient>,
}

impl PacificaAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(INFO_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("pacifica transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "pacifica returned status {}",
                response.status
            )));
        }

        let payload: InfoResponse = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("pacifica payload: {error}")))?;

        let interval = interval_for(ExchangeId::Pacifica);
        let now_ms = clock::now_ms();

        let records = payload
            .data
            .iter()
            .filter_map(|market| {
                normalize(
                    ExchangeId::Pacifica,
                    &market.symbol,
                    parse_num(&market.mark),
                    parse_num(&market.funding),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for PacificaAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Pacifica
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    data: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    symbol: String,
    #[serde(default)]
    mark: String,
    #[serde(default)]
    funding: String,
}
