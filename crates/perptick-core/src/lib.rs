//! # Perptick Core
//!
//! Aggregation and normalization engine for cross-exchange perpetuals
//! market data.
//!
//! ## Overview
//!
//! Perptick fans out to many API-incompatible perp venues, normalizes
//! each venue's mark price and funding rate into one canonical record
//! shape, and derives per-asset cross-venue arbitrage metrics:
//!
//! - **Canonical domain models** for market records, per-venue status,
//!   and aggregated snapshots
//! - **Adapter contract** plus one thin adapter per venue
//! - **Shared normalizer** so annualization math has a single source of
//!   truth
//! - **Pair canonicalizer** with a static ticker-collision table
//! - **Concurrent aggregator** with per-source deadlines, failure
//!   isolation, and a TTL snapshot cache
//! - **Comparator** deriving the long/short strategy and spread per pair
//! - **Historical bucketer** reducing persisted samples to a spread series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Venue adapters (Hyperliquid, Paradex, Vest, …) |
//! | [`aggregator`] | Concurrent fan-out orchestrator |
//! | [`cache`] | TTL-bounded snapshot cache |
//! | [`canonical`] | Symbol canonicalization and collision table |
//! | [`clock`] | Injected wall-clock abstraction |
//! | [`comparator`] | Per-pair arbitrage rows |
//! | [`domain`] | Domain models (record, status, snapshot, pair) |
//! | [`error`] | Core error types |
//! | [`exchange`] | Venue identifiers |
//! | [`history`] | Period windows and spread bucketing |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Unit/interval normalization |
//! | [`source`] | Adapter contract and source errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use perptick_core::adapters::default_registry;
//! use perptick_core::{Aggregator, AggregatorConfig, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let aggregator = Aggregator::new(default_registry(http), AggregatorConfig::default());
//!
//!     let snapshot = aggregator.refresh().await;
//!     println!(
//!         "{} records from {}/{} venues",
//!         snapshot.records.len(),
//!         snapshot.reporting_sources(),
//!         snapshot.status.len(),
//!     );
//! }
//! ```
//!
//! ## Failure model
//!
//! `refresh()` cannot fail: a venue that errors or exceeds its deadline
//! contributes an empty record list and a failure status entry, and the
//! remaining venues' records are unaffected. Even a cycle where every
//! venue fails returns a valid, empty snapshot.

pub mod adapters;
pub mod aggregator;
pub mod cache;
pub mod canonical;
pub mod clock;
pub mod comparator;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod history;
pub mod http_client;
pub mod normalize;
pub mod source;

// Re-export commonly used types at crate root for convenience

// Aggregation
pub use aggregator::{Aggregator, AggregatorConfig};

// Caching
pub use cache::SnapshotCache;

// Clock
pub use clock::{now_ms, Clock, SystemClock};

// Comparison
pub use comparator::{compare, ArbitrageRow, MetricKind, Strategy};

// Domain models
pub use domain::{AggregatedSnapshot, ExchangeStatus, MarketRecord, Pair};

// Error types
pub use error::{CoreError, ValidationError};

// History
pub use history::{bucket_spreads, HistorySample, HistoryService, Period};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Normalization
pub use normalize::{funding_interval, normalize, FundingInterval};

// Source contract
pub use source::{FundingSource, SourceError, SourceErrorKind};

// Venue identifiers
pub use exchange::ExchangeId;

// Warehouse (re-exported from perptick-warehouse)
pub use perptick_warehouse::{HistoryRow, HistoryStore, WarehouseError};
