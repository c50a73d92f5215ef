//! # Perptick Warehouse
//!
//! DuckDB-based time-series store for perptick.
//!
//! The aggregation engine optionally writes each normalized record here
//! as a `{timestamp, exchange, pair, price, funding_rate, apr}` row; the
//! historical bucketer reads rows back filtered by pair and time window.
//! A write failure never fails the aggregation call that produced the
//! data; callers log and move on.
//!
//! All user-supplied values reach SQL through parameterized statements.

mod error;
mod models;
mod store;

pub use error::WarehouseError;
pub use models::HistoryRow;
pub use store::HistoryStore;
