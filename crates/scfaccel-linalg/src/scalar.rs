//! Scalar field abstraction shared by the matrix kernels and the DIIS engine.
//!
//! Real and complex double precision are the two supported fields. Everything
//! that depends on the field (conjugation, the inner product, the dense solve
//! entry point) is selected through this trait, never by type inspection.

use std::fmt::Debug;

use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::lu::{FaerLu, LinearSolver};

/// Scalar field used for residuals, matrices and extrapolation coefficients.
pub trait Scalar:
    Clone
    + Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
    + Default
    + Send
    + Sync
    + 'static
{
    /// Dense linear solver used when the caller does not inject one.
    type Solver: LinearSolver<Self> + Default;

    /// Complex conjugate of the value.
    fn conj(self) -> Self;

    /// Square of the absolute value (for complex numbers, |z|^2).
    fn abs_sq(self) -> f64;

    /// Absolute value as f64.
    fn abs_val(self) -> f64 {
        self.abs_sq().sqrt()
    }

    /// Real part as f64.
    fn real(self) -> f64;

    /// Create from f64 value.
    fn from_f64(val: f64) -> Self;

    /// Check that every component is finite.
    fn is_finite(self) -> bool;

    /// Inner product `Σ conj(x_i) · y_i`.
    ///
    /// The first argument is conjugated, so `inner_product(x, x)` is real and
    /// non-negative. Only the common prefix of `x` and `y` contributes.
    fn inner_product(x: &[Self], y: &[Self]) -> Self {
        x.iter()
            .zip(y)
            .fold(Self::zero(), |acc, (&xi, &yi)| acc + xi.conj() * yi)
    }

    /// Fresh instance of the field's default dense solver.
    fn default_solver() -> Self::Solver {
        Self::Solver::default()
    }
}

impl Scalar for f64 {
    type Solver = FaerLu;

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self * self
    }

    #[inline]
    fn abs_val(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn real(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Scalar for Complex64 {
    type Solver = FaerLu;

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.norm_sqr()
    }

    #[inline]
    fn abs_val(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn real(self) -> f64 {
        self.re
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        Complex64::new(val, 0.0)
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

/// Macro to generate f64 and Complex64 test variants from a generic test function.
///
/// # Example
///
/// ```ignore
/// fn test_operation_generic<T: Scalar>() {
///     // test implementation
/// }
///
/// scfaccel_linalg::scalar_tests!(test_operation, test_operation_generic);
/// // Generates:
/// // #[test] fn test_operation_f64() { test_operation_generic::<f64>(); }
/// // #[test] fn test_operation_c64() { test_operation_generic::<Complex64>(); }
/// ```
#[macro_export]
macro_rules! scalar_tests {
    ($name:ident, $test_fn:ident) => {
        $crate::__paste::paste! {
            #[test]
            fn [<$name _f64>]() {
                $test_fn::<f64>();
            }

            #[test]
            fn [<$name _c64>]() {
                $test_fn::<num_complex::Complex64>();
            }
        }
    };
}
