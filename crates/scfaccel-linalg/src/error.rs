//! Error types for scfaccel-linalg

use thiserror::Error;

/// Errors raised by the matrix views, the matrix combine and the dense solvers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shape does not match the requested operation
    #[error("{operand}: expected {expected_rows}x{expected_cols}, got {actual_rows}x{actual_cols}")]
    DimensionMismatch {
        operand: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// Backing buffer is shorter than the view it is meant to hold
    #[error("Buffer too short: ({nrows}, {ncols}) view with ld={ld} needs {required}, got {len}")]
    BufferTooShort {
        len: usize,
        nrows: usize,
        ncols: usize,
        ld: usize,
        required: usize,
    },

    /// Leading dimension smaller than the number of rows
    #[error("Invalid leading dimension {ld} for a matrix with {nrows} rows")]
    InvalidLeadingDimension { ld: usize, nrows: usize },

    /// Right-hand side length does not match the system size
    #[error("Right-hand side has length {actual}, system has size {expected}")]
    RhsLength { expected: usize, actual: usize },

    /// Zero (or numerically negligible) pivot during factorization
    #[error("Singular matrix: pivot {pivot} is below tolerance")]
    SingularMatrix { pivot: usize },

    /// NaN values encountered
    #[error("NaN values encountered in {matrix}")]
    NaNEncountered { matrix: String },

    /// Unknown transpose specifier
    #[error("Invalid transpose specifier '{0}': expected one of N, T, C, R")]
    InvalidTranspose(char),
}

/// Result type for linear algebra operations
pub type Result<T> = std::result::Result<T, LinalgError>;
