//! Dense linear solves `A · x = b` by LU decomposition with partial pivoting.
//!
//! [`LinearSolver`] is the seam through which the extrapolation engine reaches
//! a dense solver. [`FaerLu`] is the built-in implementation for every
//! [`Scalar`] field, backed by faer's partial-pivot LU; other backends (or
//! test doubles) implement the trait directly.

use faer::prelude::Solve;
use faer::traits::ComplexField;
use faer::{Col, Mat};

use crate::error::{LinalgError, Result};
use crate::scalar::Scalar;
use crate::view::Matrix;

/// Default relative pivot tolerance of [`FaerLu`].
pub const DEFAULT_PIVOT_RTOL: f64 = 1e-14;

/// Capability to solve a square dense system in place.
pub trait LinearSolver<T> {
    /// Solve `A · x = b`, overwriting `b` with `x`.
    ///
    /// `a` is `N × N` and `b` has length `N`. On return `a` holds solver
    /// scratch (for [`FaerLu`], its packed LU factors) and must not be reused
    /// as the original matrix.
    ///
    /// # Errors
    /// Returns `LinalgError::SingularMatrix` when the system cannot be solved
    /// and `LinalgError::NaNEncountered` when the solution is not finite.
    fn solve_in_place(&mut self, a: &mut Matrix<T>, b: &mut [T]) -> Result<()>;
}

/// Options for the dense LU solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuOptions {
    /// Relative pivot tolerance: a pivot with `|u_kk| <= rtol * max|A|` is
    /// treated as zero. `0.0` rejects exact zeros only.
    /// Default: [`DEFAULT_PIVOT_RTOL`]
    pub rtol: f64,
}

impl Default for LuOptions {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_PIVOT_RTOL,
        }
    }
}

impl LuOptions {
    /// Create options with the specified rtol.
    pub fn with_rtol(rtol: f64) -> Self {
        Self { rtol }
    }
}

/// LU decomposition with partial (row) pivoting through faer, followed by
/// its triangular solves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerLu {
    options: LuOptions,
}

impl FaerLu {
    /// Solver using [`DEFAULT_PIVOT_RTOL`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with explicit options
    pub fn with_options(options: LuOptions) -> Self {
        Self { options }
    }

    /// Pivot tolerance in use
    pub fn rtol(&self) -> f64 {
        self.options.rtol
    }
}

impl<T: Scalar + ComplexField> LinearSolver<T> for FaerLu {
    fn solve_in_place(&mut self, a: &mut Matrix<T>, b: &mut [T]) -> Result<()> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(LinalgError::DimensionMismatch {
                operand: "A",
                expected_rows: n,
                expected_cols: n,
                actual_rows: n,
                actual_cols: a.ncols(),
            });
        }
        if b.len() != n {
            return Err(LinalgError::RhsLength {
                expected: n,
                actual: b.len(),
            });
        }

        let threshold = self.options.rtol * a.max_abs();
        let lu = Mat::from_fn(n, n, |i, j| a[[i, j]]).partial_piv_lu();

        let (l, u) = (lu.L(), lu.U());
        for k in 0..n {
            let pivot = u[(k, k)].abs_val();
            if pivot == 0.0 || pivot <= threshold {
                return Err(LinalgError::SingularMatrix { pivot: k });
            }
        }
        for j in 0..n {
            for i in 0..n {
                a[[i, j]] = if i > j { l[(i, j)] } else { u[(i, j)] };
            }
        }

        let mut x = Col::from_fn(n, |i| b[i]);
        lu.solve_in_place(&mut x);
        for (i, dst) in b.iter_mut().enumerate() {
            *dst = x[i];
        }

        if b.iter().any(|x| !x.is_finite()) {
            return Err(LinalgError::NaNEncountered {
                matrix: "solution".to_string(),
            });
        }
        Ok(())
    }
}

/// Solve `A · x = b` with the field's default solver, overwriting `b`.
///
/// # Errors
/// See [`LinearSolver::solve_in_place`].
pub fn gesv<T: Scalar>(a: &mut Matrix<T>, b: &mut [T]) -> Result<()> {
    T::default_solver().solve_in_place(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn residual<T: Scalar>(a: &Matrix<T>, x: &[T], b: &[T]) -> f64 {
        let n = a.nrows();
        (0..n)
            .map(|i| {
                let ax = (0..n).fold(T::zero(), |acc, j| acc + a[[i, j]] * x[j]);
                (ax - b[i]).abs_val()
            })
            .fold(0.0, f64::max)
    }

    fn test_solve_tridiagonal_generic<T: Scalar>() {
        let f = T::from_f64;
        let a = Matrix::from_rows(vec![
            vec![f(2.0), f(1.0), f(0.0)],
            vec![f(1.0), f(3.0), f(1.0)],
            vec![f(0.0), f(1.0), f(2.0)],
        ]);
        let b = vec![f(1.0), f(2.0), f(3.0)];

        let mut lu = a.clone();
        let mut x = b.clone();
        gesv(&mut lu, &mut x).unwrap();

        assert!(residual(&a, &x, &b) < 1e-12);
    }

    crate::scalar_tests!(test_solve_tridiagonal, test_solve_tridiagonal_generic);

    #[test]
    fn test_solve_requires_pivoting() {
        // zero leading entry forces a row interchange
        let a = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let mut lu = a.clone();
        let mut x = vec![2.0, 3.0];
        FaerLu::with_options(LuOptions::with_rtol(0.0))
            .solve_in_place(&mut lu, &mut x)
            .unwrap();

        assert_eq!(x, vec![3.0, 2.0]);
        // packed factors: unit L below the diagonal, U on and above it
        assert_eq!(lu[[0, 0]], 1.0);
        assert_eq!(lu[[1, 1]], 1.0);
    }

    #[test]
    fn test_singular_matrix_detected() {
        let mut a = Matrix::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![1.0, 0.0, 1.0],
        ]);
        let mut b = vec![1.0, 1.0, 1.0];

        let err = FaerLu::with_options(LuOptions::with_rtol(0.0))
            .solve_in_place(&mut a, &mut b)
            .unwrap_err();
        assert!(matches!(err, LinalgError::SingularMatrix { .. }));
    }

    #[test]
    fn test_zero_matrix_is_singular_at_first_pivot() {
        let mut a = Matrix::<f64>::zeros(2, 2);
        let mut b = vec![1.0, 1.0];
        assert_eq!(
            gesv(&mut a, &mut b),
            Err(LinalgError::SingularMatrix { pivot: 0 })
        );
    }

    #[test]
    fn test_rtol_rejects_tiny_pivot() {
        let a = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1e-10]]);

        let mut strict = a.clone();
        let mut b = vec![1.0, 1.0];
        let err = FaerLu::with_options(LuOptions::with_rtol(1e-8))
            .solve_in_place(&mut strict, &mut b)
            .unwrap_err();
        assert_eq!(err, LinalgError::SingularMatrix { pivot: 1 });

        let mut loose = a.clone();
        let mut b = vec![1.0, 1.0];
        FaerLu::with_options(LuOptions::with_rtol(1e-12))
            .solve_in_place(&mut loose, &mut b)
            .unwrap();
        assert!((b[1] - 1e10).abs() < 1.0);
    }

    #[test]
    fn test_default_rtol() {
        assert_eq!(FaerLu::new().rtol(), DEFAULT_PIVOT_RTOL);
        assert_eq!(LuOptions::default().rtol, 1e-14);
    }

    #[test]
    fn test_complex_system() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let a = Matrix::from_rows(vec![vec![one, i], vec![-i, Complex64::new(2.0, 0.0)]]);
        let b = vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, -1.0)];

        let mut lu = a.clone();
        let mut x = b.clone();
        gesv(&mut lu, &mut x).unwrap();

        assert!(residual(&a, &x, &b) < 1e-12);
    }

    #[test]
    fn test_non_square_rejected() {
        let mut a = Matrix::<f64>::zeros(2, 3);
        let mut b = vec![0.0, 0.0];
        assert!(matches!(
            gesv(&mut a, &mut b),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rhs_length_rejected() {
        let mut a: Matrix<f64> = Matrix::eye(3);
        let mut b = vec![0.0, 0.0];
        assert_eq!(
            gesv(&mut a, &mut b),
            Err(LinalgError::RhsLength {
                expected: 3,
                actual: 2
            })
        );
    }
}
