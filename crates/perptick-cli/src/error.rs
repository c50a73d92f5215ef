use thiserror::Error;

use perptick_core::{CoreError, ValidationError, WarehouseError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Warehouse(_) => 3,
            Self::Core(_) | Self::Serialization(_) => 1,
        }
    }
}
