//! Venue adapters: one thin translation layer per exchange.
//!
//! Each adapter owns exactly one venue's payload schema and endpoint set.
//! All records flow through the shared normalizer and canonicalizer, so an
//! adapter's only real job is transport plus field extraction plus the
//! tradability filter.

mod aster;
mod extended;
mod hibachi;
mod hyperliquid;
mod lighter;
mod ostium;
mod pacifica;
mod paradex;
mod vest;

use std::sync::Arc;

pub use aster::AsterAdapter;
pub use extended::ExtendedAdapter;
pub use hibachi::HibachiAdapter;
pub use hyperliquid::HyperliquidAdapter;
pub use lighter::LighterAdapter;
pub use ostium::OstiumAdapter;
pub use pacifica::PacificaAdapter;
pub use paradex::ParadexAdapter;
pub use vest::VestAdapter;

use crate::http_client::HttpClient;
use crate::normalize::{funding_interval, FundingInterval};
use crate::source::FundingSource;
use crate::ExchangeId;

/// Every registered adapter over a shared transport, in registry order.
pub fn default_registry(http: Arc<dyn HttpClient>) -> Vec<Arc<dyn FundingSource>> {
    vec![
        Arc::new(HyperliquidAdapter::hyperliquid(Arc::clone(&http))),
        Arc::new(HyperliquidAdapter::xyz(Arc::clone(&http))),
        Arc::new(ParadexAdapter::new(Arc::clone(&http))),
        Arc::new(VestAdapter::new(Arc::clone(&http))),
        Arc::new(ExtendedAdapter::new(Arc::clone(&http))),
        Arc::new(LighterAdapter::new(Arc::clone(&http))),
        Arc::new(HibachiAdapter::new(Arc::clone(&http))),
        Arc::new(AsterAdapter::new(Arc::clone(&http))),
        Arc::new(PacificaAdapter::new(Arc::clone(&http))),
        Arc::new(OstiumAdapter::new(http)),
    ]
}

/// Funding interval for a venue, warning once per fetch when the
/// configured interval has not been verified against the venue.
pub(crate) fn interval_for(exchange: ExchangeId) -> FundingInterval {
    let interval = funding_interval(exchange);
    if !interval.verified {
        tracing::warn!(
            exchange = exchange.as_str(),
            hours = interval.hours,
            "funding interval is an unverified assumption"
        );
    }
    interval
}
