//! DIIS extrapolation for self-consistent field iterations
//!
//! Given the residuals `e_0 … e_{n-1}` of the last `n` SCF iterations, the
//! engine finds weights `c` with `Σ c_k = 1` minimizing `‖Σ c_k e_k‖²`. The
//! caller combines its trial solutions with those weights to form the next
//! iterate.
//!
//! - [`ResidualHistory`]: borrowed `[slot][track]` residual buffers
//! - [`HistoryRing`]: owned rotation of the most recent iterations
//! - [`Diis`]: builds the bordered normal equations and solves them
//! - [`combine_trials`]: `Σ c_k · X_k` over the trial solutions
//! - [`ScfControls`]: toggles read by an outer SCF driver
//!
//! # Example
//!
//! ```
//! use scfaccel_diis::{combine_vectors, Diis, HistoryRing};
//!
//! let mut ring = HistoryRing::new(4, 1, 2).unwrap();
//! ring.push_with_trial(vec![vec![1.0, 0.0]], vec![2.0]).unwrap();
//! ring.push_with_trial(vec![vec![-1.0, 0.0]], vec![4.0]).unwrap();
//!
//! let weights = {
//!     let mut diis = Diis::new(ring.len(), 1, 2, ring.view()).unwrap();
//!     assert!(diis.extrapolate());
//!     diis.weights().to_vec()
//! };
//!
//! let mut next = [0.0];
//! combine_vectors(&weights, &ring.trials().unwrap(), &mut next).unwrap();
//! assert!((next[0] - 3.0).abs() < 1e-12);
//! ```

pub mod combine;
pub mod controls;
pub mod diis;
pub mod error;
pub mod history;
pub mod normal_equations;

// Re-export main types
pub use combine::{combine_trials, combine_vectors};
pub use controls::{DiisAlg, ScfControls};
pub use diis::{Diis, DiisOptions};
pub use error::{DiisError, Result};
pub use history::{HistoryRing, ResidualHistory};
pub use normal_equations::{
    build_normal_equations, constraint_rhs, fill_constraint_rhs, fill_normal_equations,
};
