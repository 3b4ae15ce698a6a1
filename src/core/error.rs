use thiserror::Error;

use crate::core::types::CellId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No empty cell available for relocation")]
    NoEmptyCellAvailable,

    #[error("Partition invariant violated at cell {cell}: {detail}")]
    InvariantViolation { cell: CellId, detail: String },
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::Configuration(message.into())
    }

    pub fn invariant(cell: CellId, detail: impl Into<String>) -> Self {
        SimError::InvariantViolation {
            cell,
            detail: detail.into(),
        }
    }

    /// Whether the loop may continue after seeing this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::NoEmptyCellAvailable)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
