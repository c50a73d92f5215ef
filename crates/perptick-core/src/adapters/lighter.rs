//! Lighter adapter.
//!
//! One GET against the order-book details endpoint, which carries price,
//! funding, and listing status per market. Lighter reports numeric prices
//! and stringly funding rates in the same payload.

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

const ORDER_BOOKS_URL: &str = "https://mainnet.zklighter.elliot.ai/api/v1/orderBookDetails";

pub struct LighterAdapter {
    http: Arc<dyn HttpClient>,
}

impl LighterAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let response = self
            .http
            .execute(HttpRequest::get(ORDER_BOOKS_URL))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("lighter transport error: {}", error.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "lighter returned status {}",
                response.status
            )));
        }

        let payload: OrderBooksResponse = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("lighter payload: {error}")))?;

        let interval = interval_for(ExchangeId::Lighter);
        let now_ms = clock::now_ms();

        let records = payload
            .order_book_details
            .iter()
            .filter(|market| market.status == "active")
            .filter_map(|market| {
                normalize(
                    ExchangeId::Lighter,
                    &market.symbol,
                    market.last_trade_price,
                    parse_num(&market.funding_rate),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for LighterAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Lighter
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct OrderBooksResponse {
    #[serde(default)]
    order_book_details: Vec<OrderBook>,
}

#[derive(Debug, Deserialize)]
struct OrderBook {
    symbol: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    last_trade_price: f64,
    #[serde(default)]
    funding_rate: String,
}
