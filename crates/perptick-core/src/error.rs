use thiserror::Error;

/// Validation and contract errors exposed by `perptick-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pair cannot be empty")]
    EmptyPair,
    #[error("pair length {len} exceeds max {max}")]
    PairTooLong { len: usize, max: usize },
    #[error("pair contains invalid character '{ch}' at index {index}")]
    PairInvalidChar { ch: char, index: usize },

    #[error("unknown exchange '{value}'")]
    UnknownExchange { value: String },

    #[error("invalid metric '{value}', expected one of apr, price")]
    InvalidMetric { value: String },
    #[error("invalid period '{value}', expected one of 24H, 7D, 30D, ALL")]
    InvalidPeriod { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Warehouse(#[from] perptick_warehouse::WarehouseError),
}
