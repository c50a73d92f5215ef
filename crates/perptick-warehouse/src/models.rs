use serde::{Deserialize, Serialize};

/// One persisted market observation: a venue's view of one pair at one
/// fetch cycle. The engine writes these through the optional sink; the
/// historical bucketer reads them back filtered by pair and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub timestamp_ms: i64,
    pub exchange: String,
    pub pair: String,
    pub price: f64,
    pub funding_rate: f64,
    pub apr: f64,
}
