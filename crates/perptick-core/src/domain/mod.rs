//! Canonical domain types shared by every component.

mod models;
mod pair;

pub use models::{AggregatedSnapshot, ExchangeStatus, MarketRecord};
pub use pair::Pair;
