//! Error types for the vector store

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    /// Two vectors that had to share a dimension did not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A delimited field could not be read as a number.
    #[error("line {line}: cannot parse '{token}' as a number")]
    Parse { line: usize, token: String },

    #[error("out of memory while growing the store")]
    AllocationFailure,
}
