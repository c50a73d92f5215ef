//! Hyperliquid family adapter.
//!
//! The main Hyperliquid exchange and HIP-3 deployers (xyz) share one API:
//! `POST /info` with `{"type":"metaAndAssetCtxs"}` returns a two-element
//! array of instrument metadata and per-asset contexts, index-aligned.
//! Deployers add a `dex` field to the same request and namespace their
//! asset names (`xyz:TSLA`), which the canonicalizer strips.

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

const INFO_URL: &str = "https://api.hyperliquid.xyz/info";

pub struct HyperliquidAdapter {
    id: ExchangeId,
    dex: Option<&'static str>,
    http: Arc<dyn HttpClient>,
}

impl HyperliquidAdapter {
    /// The main Hyperliquid exchange.
    pub fn hyperliquid(http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: ExchangeId::Hyperliquid,
            dex: None,
            http,
        }
    }

    /// The xyz HIP-3 perp deployer, served by the same API.
    pub fn xyz(http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: ExchangeId::Xyz,
            dex: Some("xyz"),
            http,
        }
    }

    async fn fetch_inner(&self) -> Result<Vec<MarketRecord>, SourceError> {
        let payload = match self.dex {
            Some(dex) => json!({ "type": "metaAndAssetCtxs", "dex": dex }),
            None => json!({ "type": "metaAndAssetCtxs" }),
        };

        let request = HttpRequest::post_json(INFO_URL, payload.to_string());
        let response = self.http.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("{} transport error: {}", self.id, error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "{} returned status {}",
                self.id, response.status
            )));
        }

        let (meta, contexts): (Meta, Vec<AssetContext>) = serde_json::from_str(&response.body)
            .map_err(|error| {
                SourceError::malformed(format!("{} payload: {error}", self.id))
            })?;

        let interval = interval_for(self.id);
        let now_ms = clock::now_ms();

        let records = meta
            .universe
            .iter()
            .zip(contexts.iter())
            .filter(|(asset, _)| !asset.is_delisted)
            .filter_map(|(asset, context)| {
                normalize(
                    self.id,
                    &asset.name,
                    parse_num(&context.mark_px),
                    parse_num(&context.funding),
                    interval,
                    now_ms,
                )
                .ok()
            })
            .collect();

        Ok(records)
    }
}

impl FundingSource for HyperliquidAdapter {
    fn id(&self) -> ExchangeId {
        self.id
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MarketRecord>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_inner())
    }
}

#[derive(Debug, Deserialize)]
struct Meta {
    universe: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    #[serde(rename = "isDelisted", default)]
    is_delisted: bool,
}

#[derive(Debug, Deserialize)]
struct AssetContext {
    #[serde(rename = "markPx", default)]
    mark_px: String,
    #[serde(default)]
    funding: String,
}
