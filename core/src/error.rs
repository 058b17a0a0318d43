use thiserror::Error;

use crate::types::PrizeIndex;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid prize configuration: {reason}")]
    Config { reason: String },

    #[error("No spin is in flight")]
    NoSpinInFlight,

    #[error("Spin completion mismatch: in-flight spin resolved to {expected}, host reported {actual}")]
    SpinMismatch { expected: PrizeIndex, actual: PrizeIndex },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WheelResult<T> = Result<T, WheelError>;
