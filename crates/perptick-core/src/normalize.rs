//! Shared normalizer: the single source of truth for annualization math.
//!
//! Every adapter hands raw venue values to [`normalize`] instead of
//! computing `apr` itself, so the formula
//! `apr = rate × (24 / interval_hours) × 365 × 100` is applied exactly
//! once, identically, for every venue. No rounding happens here; rounding
//! is a presentation concern.

use crate::canonical;
use crate::{ExchangeId, MarketRecord, ValidationError};

/// Funding settlement interval for one venue.
///
/// `verified` distinguishes intervals confirmed against venue behavior
/// from assumptions carried over for poorly documented venues. Unverified
/// entries are logged at fetch time instead of silently producing a
/// plausible-looking `apr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundingInterval {
    pub hours: f64,
    pub verified: bool,
}

impl FundingInterval {
    pub const HOURLY: Self = Self {
        hours: 1.0,
        verified: true,
    };

    pub const EIGHT_HOURS: Self = Self {
        hours: 8.0,
        verified: true,
    };

    pub const fn assumed(hours: f64) -> Self {
        Self {
            hours,
            verified: false,
        }
    }
}

/// Per-venue funding-interval configuration.
///
/// Explicit rather than inferred; the table is pinned by tests so an
/// interval change is a deliberate, reviewed edit.
pub fn funding_interval(exchange: ExchangeId) -> FundingInterval {
    match exchange {
        ExchangeId::Hyperliquid => FundingInterval::HOURLY,
        ExchangeId::Xyz => FundingInterval::HOURLY,
        ExchangeId::Paradex => FundingInterval::EIGHT_HOURS,
        ExchangeId::Vest => FundingInterval::HOURLY,
        ExchangeId::Extended => FundingInterval::HOURLY,
        ExchangeId::Lighter => FundingInterval::HOURLY,
        // Hibachi documents no settlement cadence; 8h matches observed payouts.
        ExchangeId::Hibachi => FundingInterval::assumed(8.0),
        ExchangeId::Aster => FundingInterval::EIGHT_HOURS,
        ExchangeId::Pacifica => FundingInterval::HOURLY,
        // The Ostium subgraph exposes a raw rate whose period is not stated;
        // treated as per-8h until confirmed on-chain.
        ExchangeId::Ostium => FundingInterval::assumed(8.0),
    }
}

/// Build a canonical record from raw venue values.
///
/// - the raw symbol is upper-cased and canonicalized (collision table
///   included);
/// - non-finite or negative prices collapse to the `0` sentinel;
/// - non-finite rates collapse to `0`;
/// - `apr` is exact, never rounded.
///
/// Fails only when the symbol cannot form a valid [`crate::Pair`]; such
/// instruments are skipped by adapters rather than failing the venue.
pub fn normalize(
    exchange: ExchangeId,
    raw_symbol: &str,
    price: f64,
    funding_rate: f64,
    interval: FundingInterval,
    timestamp_ms: i64,
) -> Result<MarketRecord, ValidationError> {
    let pair = canonical::canonicalize(exchange, raw_symbol)?;
    let price = coerce_price(price);
    let funding_rate = coerce_rate(funding_rate);
    let apr = funding_rate * (24.0 / interval.hours) * 365.0 * 100.0;

    Ok(MarketRecord {
        exchange,
        pair,
        price,
        funding_rate,
        apr,
        timestamp_ms,
    })
}

/// Coerce a raw price into the canonical domain: finite and non-negative,
/// with `0` as the "unavailable" sentinel.
pub fn coerce_price(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerce a raw funding rate: any finite value (rates are legitimately
/// negative), `0` otherwise.
pub fn coerce_rate(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a venue's stringly-typed number, collapsing garbage to `0` so a
/// record is always arithmetically safe to compare and sort.
pub fn parse_num(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(coerce_rate).unwrap_or(0.0)
}
