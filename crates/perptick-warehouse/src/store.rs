//! `DuckDB`-backed historical sample store.
//!
//! A single `market_history` table, parameterized statements only. The
//! connection sits behind a mutex: the refresh sink is the lone writer
//! and reads are short analytical scans, so pooling buys nothing here.

use std::path::Path;
use std::sync::Mutex;

use duckdb::{params, Connection};

use crate::error::WarehouseError;
use crate::models::HistoryRow;

const SCHEMA: &str = "
PRAGMA disable_progress_bar;
CREATE TABLE IF NOT EXISTS market_history (
    ts_ms        BIGINT  NOT NULL,
    exchange     VARCHAR NOT NULL,
    pair         VARCHAR NOT NULL,
    price        DOUBLE  NOT NULL,
    funding_rate DOUBLE  NOT NULL,
    apr          DOUBLE  NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_market_history_pair_ts ON market_history (pair, ts_ms);
";

pub struct HistoryStore {
    connection: Mutex<Connection>,
}

impl HistoryStore {
    /// Open (creating if needed) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WarehouseError> {
        let connection = Connection::open(path)
            .map_err(|error| WarehouseError::ConnectionError(error.to_string()))?;
        Self::from_connection(connection)
    }

    /// In-memory store, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let connection = Connection::open_in_memory()
            .map_err(|error| WarehouseError::ConnectionError(error.to_string()))?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, WarehouseError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Append rows in one transaction.
    pub fn insert_rows(&self, rows: &[HistoryRow]) -> Result<(), WarehouseError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut connection = self
            .connection
            .lock()
            .expect("warehouse connection mutex poisoned");
        let tx = connection
            .transaction()
            .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
        {
            let mut statement = tx
                .prepare(
                    "INSERT INTO market_history (ts_ms, exchange, pair, price, funding_rate, apr)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
            for row in rows {
                statement
                    .execute(params![
                        row.timestamp_ms,
                        row.exchange,
                        row.pair,
                        row.price,
                        row.funding_rate,
                        row.apr,
                    ])
                    .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|error| WarehouseError::QueryError(error.to_string()))
    }

    /// Rows for one pair, optionally bounded below, ascending by time.
    pub fn samples(
        &self,
        pair: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<HistoryRow>, WarehouseError> {
        let connection = self
            .connection
            .lock()
            .expect("warehouse connection mutex poisoned");

        let map_row = |row: &duckdb::Row<'_>| -> Result<HistoryRow, duckdb::Error> {
            Ok(HistoryRow {
                timestamp_ms: row.get(0)?,
                exchange: row.get(1)?,
                pair: row.get(2)?,
                price: row.get(3)?,
                funding_rate: row.get(4)?,
                apr: row.get(5)?,
            })
        };

        let mut out = Vec::new();
        match since_ms {
            Some(since_ms) => {
                let mut statement = connection
                    .prepare(
                        "SELECT ts_ms, exchange, pair, price, funding_rate, apr
                         FROM market_history
                         WHERE pair = ? AND ts_ms >= ?
                         ORDER BY ts_ms ASC",
                    )
                    .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
                let rows = statement
                    .query_map(params![pair, since_ms], map_row)
                    .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|error| WarehouseError::QueryError(error.to_string()))?);
                }
            }
            None => {
                let mut statement = connection
                    .prepare(
                        "SELECT ts_ms, exchange, pair, price, funding_rate, apr
                         FROM market_history
                         WHERE pair = ?
                         ORDER BY ts_ms ASC",
                    )
                    .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
                let rows = statement
                    .query_map(params![pair], map_row)
                    .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|error| WarehouseError::QueryError(error.to_string()))?);
                }
            }
        }

        Ok(out)
    }

    /// Total persisted rows, for diagnostics.
    pub fn row_count(&self) -> Result<usize, WarehouseError> {
        let connection = self
            .connection
            .lock()
            .expect("warehouse connection mutex poisoned");
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM market_history", [], |row| row.get(0))
            .map_err(|error| WarehouseError::QueryError(error.to_string()))?;
        Ok(count as usize)
    }
}
