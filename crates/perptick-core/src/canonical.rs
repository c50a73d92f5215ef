//! Pair canonicalization: venue-native symbols into the shared ticker space.
//!
//! Two stages, both deterministic and total for any valid ticker:
//!
//! 1. strip venue decoration that carries no asset identity: a namespace
//!    prefix (`xyz:` on the HIP-3 deployer) and quote/contract suffixes
//!    (`-PERP`, `-USD`, Binance-style concatenated `USDT`);
//! 2. apply the collision table, which remaps the few tickers that denote
//!    a *different* real-world asset on a given venue than the same ticker
//!    does elsewhere. Only listed entries are remapped; everything else
//!    passes through unchanged. This is what keeps an SPX6900 memecoin
//!    listing from being arbitraged against an S&P 500 index product.

use crate::{ExchangeId, Pair, ValidationError};

/// Venue-specific symbol decoration.
struct SymbolScheme {
    prefix: Option<&'static str>,
    suffixes: &'static [&'static str],
}

fn scheme(exchange: ExchangeId) -> SymbolScheme {
    match exchange {
        ExchangeId::Hyperliquid | ExchangeId::Lighter | ExchangeId::Pacifica => SymbolScheme {
            prefix: None,
            suffixes: &[],
        },
        ExchangeId::Xyz => SymbolScheme {
            prefix: Some("XYZ:"),
            suffixes: &[],
        },
        ExchangeId::Paradex => SymbolScheme {
            prefix: None,
            suffixes: &["-PERP", "-USD"],
        },
        ExchangeId::Vest => SymbolScheme {
            prefix: None,
            suffixes: &["-PERP"],
        },
        ExchangeId::Extended | ExchangeId::Ostium => SymbolScheme {
            prefix: None,
            suffixes: &["-USD"],
        },
        ExchangeId::Hibachi => SymbolScheme {
            prefix: None,
            suffixes: &["/USDT-P"],
        },
        ExchangeId::Aster => SymbolScheme {
            prefix: None,
            suffixes: &["USDT", "USD"],
        },
    }
}

/// Static collision table: `(venue, native ticker) -> canonical ticker`.
///
/// One row per known alias. Keep this table small and auditable; a wrong
/// entry silently merges unrelated instruments.
const COLLISIONS: &[(ExchangeId, &str, &str)] = &[
    // "SPX" on these venues is the SPX6900 token, not the S&P 500 index
    // product that Ostium lists under the same ticker.
    (ExchangeId::Hyperliquid, "SPX", "SPX6900"),
    (ExchangeId::Aster, "SPX", "SPX6900"),
];

/// Resolve a venue-native symbol to the canonical ticker.
///
/// Deterministic, independent of fetch order, and idempotent on already
/// canonical tickers.
pub fn canonicalize(exchange: ExchangeId, raw: &str) -> Result<Pair, ValidationError> {
    let mut symbol = raw.trim().to_ascii_uppercase();

    let scheme = scheme(exchange);
    if let Some(prefix) = scheme.prefix {
        if let Some(rest) = symbol.strip_prefix(prefix) {
            symbol = rest.to_owned();
        }
    }

    // Suffixes may stack ("BTC-USD-PERP"); strip until nothing matches,
    // never consuming the whole symbol.
    'stripping: loop {
        for suffix in scheme.suffixes {
            if symbol.len() > suffix.len() && symbol.ends_with(suffix) {
                symbol.truncate(symbol.len() - suffix.len());
                continue 'stripping;
            }
        }
        break;
    }

    for (venue, native, canonical) in COLLISIONS {
        if *venue == exchange && symbol == *native {
            symbol = (*canonical).to_owned();
            break;
        }
    }

    Pair::parse(&symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_paradex_contract_suffixes() {
        let pair = canonicalize(ExchangeId::Paradex, "BTC-USD-PERP").expect("pair");
        assert_eq!(pair.as_str(), "BTC");
    }

    #[test]
    fn strips_xyz_namespace_prefix() {
        let pair = canonicalize(ExchangeId::Xyz, "xyz:TSLA").expect("pair");
        assert_eq!(pair.as_str(), "TSLA");
    }

    #[test]
    fn strips_concatenated_quote_asset() {
        let pair = canonicalize(ExchangeId::Aster, "ETHUSDT").expect("pair");
        assert_eq!(pair.as_str(), "ETH");
    }

    #[test]
    fn strips_hibachi_contract_marker() {
        let pair = canonicalize(ExchangeId::Hibachi, "BTC/USDT-P").expect("pair");
        assert_eq!(pair.as_str(), "BTC");
    }

    #[test]
    fn collision_table_remaps_only_listed_venues() {
        let hyperliquid = canonicalize(ExchangeId::Hyperliquid, "SPX").expect("pair");
        assert_eq!(hyperliquid.as_str(), "SPX6900");

        let ostium = canonicalize(ExchangeId::Ostium, "SPX").expect("pair");
        assert_eq!(ostium.as_str(), "SPX");
    }

    #[test]
    fn canonical_tickers_are_fixed_points() {
        for (exchange, raw) in [
            (ExchangeId::Paradex, "BTC"),
            (ExchangeId::Aster, "ETH"),
            (ExchangeId::Hyperliquid, "SPX6900"),
            (ExchangeId::Ostium, "XAU"),
        ] {
            let once = canonicalize(exchange, raw).expect("pair");
            let twice = canonicalize(exchange, once.as_str()).expect("pair");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn never_strips_the_whole_symbol() {
        // A ticker that IS a suffix must survive stripping.
        let pair = canonicalize(ExchangeId::Aster, "USDT").expect("pair");
        assert_eq!(pair.as_str(), "USDT");
    }

    #[test]
    fn lower_case_input_is_upper_cased_first() {
        let pair = canonicalize(ExchangeId::Vest, "sol-perp").expect("pair");
        assert_eq!(pair.as_str(), "SOL");
    }
}
