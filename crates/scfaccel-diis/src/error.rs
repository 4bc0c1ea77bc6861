//! Error types for DIIS extrapolation.

use scfaccel_linalg::LinalgError;
use thiserror::Error;

/// Result type for DIIS operations.
pub type Result<T> = std::result::Result<T, DiisError>;

/// Errors detected while setting up an extrapolation.
///
/// A singular normal-equations system is not an error: `extrapolate()`
/// reports it by returning `false`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiisError {
    /// One of the extrapolation space dimensions is zero.
    #[error("Empty extrapolation space: n_extrap={n_extrap}, n_mat={n_mat}, o_size={o_size}")]
    EmptyExtrapolationSpace {
        n_extrap: usize,
        n_mat: usize,
        o_size: usize,
    },

    /// Residual history does not provide the expected slots / tracks.
    #[error("Expected {expected_slots}x{expected_tracks} history, got {actual_slots} ({detail})")]
    HistoryShape {
        expected_slots: usize,
        expected_tracks: usize,
        actual_slots: usize,
        detail: String,
    },

    /// A residual buffer has the wrong length.
    #[error("Residual [{slot}][{track}] has length {actual}, expected {expected}")]
    ResidualLength {
        slot: usize,
        track: usize,
        expected: usize,
        actual: usize,
    },

    /// Number of coefficients does not match the number of trial solutions.
    #[error("Got {coefficients} coefficients for {trials} trial solutions")]
    CoefficientCount { coefficients: usize, trials: usize },

    /// Invalid history ring configuration.
    #[error("Invalid history configuration: {message}")]
    InvalidHistory { message: String },

    /// Linear algebra error.
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),
}
