//! DIIS extrapolation engine.
//!
//! Given `n_extrap` residual slots, [`Diis::extrapolate`] finds weights
//! `c_0 … c_{n-1}` with `Σ c_k = 1` minimizing `‖Σ c_k e_k‖²`, by solving the
//! bordered normal equations built in [`crate::normal_equations`].
//!
//! # Example
//!
//! ```
//! use scfaccel_diis::{Diis, ResidualHistory};
//!
//! let r0 = [1.0, 0.0, 0.0];
//! let r1 = [0.0, 1.0, 0.0];
//! let history = ResidualHistory::single_track(vec![&r0[..], &r1[..]]);
//!
//! let mut diis = Diis::new(2, 1, 3, history).unwrap();
//! assert!(diis.extrapolate());
//! assert!((diis.weights()[0] - 0.5).abs() < 1e-14);
//! assert!((diis.weights()[1] - 0.5).abs() < 1e-14);
//! ```

use scfaccel_linalg::{LinearSolver, Matrix, Scalar};

use crate::error::{DiisError, Result};
use crate::history::ResidualHistory;
use crate::normal_equations::{fill_constraint_rhs, fill_normal_equations};

/// Options for the extrapolation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiisOptions {
    /// Divide the inner-product block of B by its largest magnitude before
    /// solving. The weights are unchanged by this scaling; the multiplier
    /// entry is scaled back afterwards.
    /// Default: true
    pub scale_block: bool,
}

impl Default for DiisOptions {
    fn default() -> Self {
        Self { scale_block: true }
    }
}

impl DiisOptions {
    /// Options with block scaling switched on or off.
    pub fn with_scale_block(mut self, scale_block: bool) -> Self {
        self.scale_block = scale_block;
        self
    }
}

/// Extrapolation engine over a borrowed residual history.
///
/// The engine owns its coefficient vector and scratch matrices and borrows
/// the residual buffers for its whole lifetime. It is a single-owner handle:
/// it is neither `Clone` nor `Copy`. `extrapolate` takes `&mut self`, so one
/// instance can never run two extrapolations at once.
pub struct Diis<'a, T: Scalar, S = <T as Scalar>::Solver> {
    n_extrap: usize,
    n_mat: usize,
    o_size: usize,
    history: ResidualHistory<'a, T>,
    options: DiisOptions,
    solver: S,
    /// Unscaled B of the last call
    b: Matrix<T>,
    /// Matrix handed to the solver (overwritten by it)
    system: Matrix<T>,
    coeffs: Vec<T>,
}

impl<'a, T: Scalar> Diis<'a, T> {
    /// Create an engine using the field's default dense solver.
    ///
    /// # Arguments
    /// * `n_extrap` - Size of the extrapolation space (history depth)
    /// * `n_mat` - Number of residual tracks summed into each element of B
    /// * `o_size` - Length of every residual buffer
    /// * `history` - `n_extrap` slots of `n_mat` buffers of length `o_size`
    ///
    /// # Errors
    /// `EmptyExtrapolationSpace` if a dimension is zero, `HistoryShape` or
    /// `ResidualLength` if `history` does not match the dimensions.
    pub fn new(
        n_extrap: usize,
        n_mat: usize,
        o_size: usize,
        history: ResidualHistory<'a, T>,
    ) -> Result<Self> {
        Self::with_solver(n_extrap, n_mat, o_size, history, T::default_solver())
    }
}

impl<'a, T: Scalar, S: LinearSolver<T>> Diis<'a, T, S> {
    /// Create an engine delegating the dense solve to `solver`.
    ///
    /// # Errors
    /// See [`Diis::new`].
    pub fn with_solver(
        n_extrap: usize,
        n_mat: usize,
        o_size: usize,
        history: ResidualHistory<'a, T>,
        solver: S,
    ) -> Result<Self> {
        if n_extrap == 0 || n_mat == 0 || o_size == 0 {
            return Err(DiisError::EmptyExtrapolationSpace {
                n_extrap,
                n_mat,
                o_size,
            });
        }
        history.validate(n_extrap, n_mat, o_size)?;

        let n = n_extrap + 1;
        Ok(Self {
            n_extrap,
            n_mat,
            o_size,
            history,
            options: DiisOptions::default(),
            solver,
            b: Matrix::zeros(n, n),
            system: Matrix::zeros(n, n),
            coeffs: vec![T::zero(); n],
        })
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: DiisOptions) -> Self {
        self.options = options;
        self
    }

    /// Build B from the history and solve for the extrapolation coefficients.
    ///
    /// Returns `true` when the solve succeeded; [`Diis::coeffs`] then holds
    /// the weights followed by the multiplier. Returns `false` for a singular
    /// or numerically unusable system, in which case the coefficient contents
    /// are unspecified and must not be used.
    pub fn extrapolate(&mut self) -> bool {
        let n = self.n_extrap;

        fill_normal_equations(&self.history, n, self.n_mat, self.o_size, &mut self.b);
        fill_constraint_rhs(&mut self.coeffs, n);

        self.system.clone_from(&self.b);
        let scale = if self.options.scale_block {
            block_scale(&self.b, n)
        } else {
            1.0
        };
        if scale != 1.0 {
            let s = T::from_f64(scale);
            for j in 0..n {
                for k in 0..n {
                    self.system[[k, j]] = self.system[[k, j]] / s;
                }
            }
        }

        match self.solver.solve_in_place(&mut self.system, &mut self.coeffs) {
            Ok(()) => {
                self.coeffs[n] = self.coeffs[n] * T::from_f64(scale);
                log::debug!(
                    "DIIS extrapolation: n_extrap={}, n_mat={}, o_size={}, block scale={:.3e}",
                    n,
                    self.n_mat,
                    self.o_size,
                    scale
                );
                true
            }
            Err(err) => {
                log::debug!(
                    "DIIS extrapolation failed: n_extrap={}, block scale={:.3e}: {}",
                    n,
                    scale,
                    err
                );
                false
            }
        }
    }

    /// Coefficients of the last successful extrapolation, length `n_extrap + 1`.
    ///
    /// The final entry is the Lagrange multiplier of the constraint and is
    /// not an extrapolation weight.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// The `n_extrap` extrapolation weights (coefficients without the multiplier).
    pub fn weights(&self) -> &[T] {
        &self.coeffs[..self.n_extrap]
    }

    /// Bordered normal-equations matrix built by the last call.
    pub fn b_matrix(&self) -> &Matrix<T> {
        &self.b
    }

    /// Size of the extrapolation space
    pub fn n_extrap(&self) -> usize {
        self.n_extrap
    }

    /// Number of residual tracks per slot
    pub fn n_mat(&self) -> usize {
        self.n_mat
    }

    /// Length of every residual buffer
    pub fn o_size(&self) -> usize {
        self.o_size
    }

    /// Borrowed residual history
    pub fn history(&self) -> &ResidualHistory<'a, T> {
        &self.history
    }

    /// The injected solver
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Release the history borrow, keeping the coefficient vector.
    pub fn into_coeffs(self) -> Vec<T> {
        self.coeffs
    }
}

/// Largest magnitude in the inner-product block, or 1 when it is zero or
/// not finite.
fn block_scale<T: Scalar>(b: &Matrix<T>, n: usize) -> f64 {
    let mut max = 0.0f64;
    for j in 0..n {
        for k in 0..n {
            max = max.max(b[[k, j]].abs_val());
        }
    }
    if max > 0.0 && max.is_finite() {
        max
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use scfaccel_linalg::LinalgError;

    #[test]
    fn test_zero_dimension_rejected() {
        let h = ResidualHistory::<f64>::single_track(vec![]);
        assert_eq!(
            Diis::new(0, 1, 1, h).err(),
            Some(DiisError::EmptyExtrapolationSpace {
                n_extrap: 0,
                n_mat: 1,
                o_size: 1
            })
        );
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let r = [1.0, 2.0];
        let h = ResidualHistory::single_track(vec![&r[..]]);
        assert!(matches!(
            Diis::new(1, 1, 3, h),
            Err(DiisError::ResidualLength {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_single_slot_weight_is_one() {
        let r = [0.3, -1.7, 4.2];
        let h = ResidualHistory::single_track(vec![&r[..]]);
        let mut diis = Diis::new(1, 1, 3, h).unwrap();

        assert!(diis.extrapolate());
        assert_relative_eq!(diis.weights()[0], 1.0, epsilon = 1e-14);
        // multiplier equals the single inner product
        assert_relative_eq!(diis.coeffs()[1], 0.09 + 2.89 + 17.64, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_residual_single_slot() {
        let r = [0.0, 0.0];
        let h = ResidualHistory::single_track(vec![&r[..]]);
        let mut diis = Diis::new(1, 1, 2, h).unwrap();

        assert!(diis.extrapolate());
        assert_eq!(diis.weights(), &[1.0]);
    }

    #[test]
    fn test_scaling_does_not_change_weights() {
        let r0 = [1e-6, 2e-6, 0.0];
        let r1 = [0.0, 1e-6, -3e-6];
        let r2 = [2e-6, 0.0, 1e-6];
        let slots = || ResidualHistory::single_track(vec![&r0[..], &r1[..], &r2[..]]);

        let mut scaled = Diis::new(3, 1, 3, slots()).unwrap();
        let mut unscaled = Diis::new(3, 1, 3, slots())
            .unwrap()
            .with_options(DiisOptions::default().with_scale_block(false));

        assert!(scaled.extrapolate());
        assert!(unscaled.extrapolate());
        for (a, b) in scaled.coeffs().iter().zip(unscaled.coeffs()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_b_matrix_is_kept_unscaled() {
        let r0 = [3.0];
        let r1 = [1.0];
        let h = ResidualHistory::single_track(vec![&r0[..], &r1[..]]);
        let mut diis = Diis::new(2, 1, 1, h).unwrap();
        // parallel residuals: the block is singular, the bordered system is not
        assert!(diis.extrapolate());
        assert_eq!(diis.b_matrix()[[0, 0]], 9.0);
        assert_eq!(diis.b_matrix()[[0, 1]], 3.0);
        assert_eq!(diis.b_matrix()[[1, 1]], 1.0);
    }

    struct AlwaysSingular;

    impl<T: Scalar> LinearSolver<T> for AlwaysSingular {
        fn solve_in_place(
            &mut self,
            _a: &mut Matrix<T>,
            _b: &mut [T],
        ) -> scfaccel_linalg::Result<()> {
            Err(LinalgError::SingularMatrix { pivot: 0 })
        }
    }

    #[test]
    fn test_injected_solver_failure_is_reported() {
        let r0 = [Complex64::new(1.0, 0.0)];
        let r1 = [Complex64::new(0.0, 1.0)];
        let h = ResidualHistory::single_track(vec![&r0[..], &r1[..]]);
        let mut diis = Diis::with_solver(2, 1, 1, h, AlwaysSingular).unwrap();

        assert!(!diis.extrapolate());
        // B is still built
        assert_eq!(diis.b_matrix()[[0, 1]], Complex64::new(0.0, 1.0));
    }

    #[test]
    fn test_into_coeffs_releases_history() {
        let mut r = vec![1.0, 1.0];
        let coeffs = {
            let h = ResidualHistory::single_track(vec![&r[..]]);
            let mut diis = Diis::new(1, 1, 2, h).unwrap();
            assert!(diis.extrapolate());
            diis.into_coeffs()
        };
        r[0] = 5.0;
        assert_eq!(coeffs.len(), 2);
        assert_eq!(coeffs[0], 1.0);
        assert_eq!(r[0], 5.0);
    }
}
