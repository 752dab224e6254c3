//! Boundary errors.
//!
//! Failing to find a solution is not an error: strategies report that through
//! [`crate::search::SearchOutcome`]. `SolverError` only covers malformed input
//! handed to the crate and persistence failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    /// The puzzle dimension is outside the supported range.
    #[error("invalid puzzle size {0}")]
    InvalidSize(usize),

    /// A serialized state could not be parsed.
    #[error("invalid puzzle state: {0}")]
    InvalidState(String),

    /// A state of one size was handed to an engine built for another.
    #[error("puzzle size mismatch: engine expects {expected}, state has {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// A move descriptor could not be parsed.
    #[error("invalid move descriptor {0:?}")]
    InvalidMove(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
