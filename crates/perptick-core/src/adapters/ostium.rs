//! Ostium adapter.
//!
//! Ostium has no REST market-data API; state is read from its subgraph
//! with one GraphQL query. Raw values carry on-chain fixed-point scaling:
//! prices are 1e18, funding rates 1e9. The funding period behind the raw
//! rate is not documented anywhere public; the interval table carries it
//! as an unverified 8-hour assumption.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::adapters::interval_for;
use crate::clock;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{normalize, parse_num};
use crate::source::{FundingSource, SourceError};
use crate::{ExchangeId, MarketRecord};

const SUBGRAPH_URL: &str = "https://subgraph.satsuma-prod.com/391a61815d32/ostium/ost-prod/api";

const PAIRS_QUERY: &str = "{ pairs(first: 1000) { from to lastTradePrice lastFundingRate } }";

const PRICE_PRECISION: f64 = 1e18;
const FUNDING_RATE_PRECISION: f64 = 1e9;

pub struct OstiumAdapter {
    http: Arc<dyn HttpClient>,
}

impl OstiumAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let body = json!({ "query": PAIRS_QUERY });
        let request = HttpRequest::post_json(SUBGRAPH_URL, body.to_string());

        let response = self.http.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("ostium transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "ostium subgraph returned status {}",
                response.status
            )));
        }

        let payload: SubgraphResponse = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("ostium payload: {error}")))?;
        let pairs = payload
            .data
            .ok_or_else(|| SourceError::malformed("ostium payload: missing data"))?
            .pairs;

        let interval = interval_for(ExchangeId::Ostium);
        let now_ms = clock::now_ms();

        let records = pairs
            .iter()
            .filter_map(|pair| {
                let symbol = format!("{}-{}", pair.from, pair.to);
                let price = parse_num(&pair.last_trade_price) / PRICE_PRECISION;
                let rate = parse_num(&pair.last_funding_rate) / FUNDING_RATE_PRECISION;

                normalize(ExchangeId::Ostium, &symbol, price, rate, interval, now_ms).ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for OstiumAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Ostium
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct SubgraphResponse {
    #[serde(default)]
    data: Option<SubgraphData>,
}

#[derive(Debug, Deserialize)]
struct SubgraphData {
    #[serde(default)]
    pairs: Vec<SubgraphPair>,
}

#[derive(Debug, Deserialize)]
struct SubgraphPair {
    from: String,
    to: String,
    #[serde(rename = "lastTradePrice", default)]
    last_trade_price: String,
    #[serde(rename = "lastFundingRate", default)]
    last_funding_rate: String,
}
