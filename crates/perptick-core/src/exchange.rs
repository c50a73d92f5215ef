//! Venue identifiers for the static adapter registry.
//!
//! The set of exchanges is closed and known at build time; there is no
//! dynamic adapter discovery. Adding a venue means adding a variant here,
//! an adapter module, and a row in the funding-interval table.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Identifier of a source venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Hyperliquid,
    Xyz,
    Paradex,
    Vest,
    Extended,
    Lighter,
    Hibachi,
    Aster,
    Pacifica,
    Ostium,
}

impl ExchangeId {
    /// Every registered venue, in registry order.
    pub const ALL: [ExchangeId; 10] = [
        Self::Hyperliquid,
        Self::Xyz,
        Self::Paradex,
        Self::Vest,
        Self::Extended,
        Self::Lighter,
        Self::Hibachi,
        Self::Aster,
        Self::Pacifica,
        Self::Ostium,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hyperliquid => "hyperliquid",
            Self::Xyz => "xyz",
            Self::Paradex => "paradex",
            Self::Vest => "vest",
            Self::Extended => "extended",
            Self::Lighter => "lighter",
            Self::Hibachi => "hibachi",
            Self::Aster => "aster",
            Self::Pacifica => "pacifica",
            Self::Ostium => "ostium",
        }
    }

    /// Parse a venue identifier from its wire/display form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|exchange| exchange.as_str() == normalized)
            .ok_or(ValidationError::UnknownExchange {
                value: input.to_owned(),
            })
    }
}

impl Display for ExchangeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        for exchange in ExchangeId::ALL {
            assert_eq!(ExchangeId::parse(exchange.as_str()).expect("parse"), exchange);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            ExchangeId::parse(" Hyperliquid ").expect("parse"),
            ExchangeId::Hyperliquid
        );
    }

    #[test]
    fn rejects_unknown_venue() {
        let err = ExchangeId::parse("binance").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownExchange { .. }));
    }
}
