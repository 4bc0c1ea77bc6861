//! Dense linear algebra kernels for SCF convergence acceleration
//!
//! This crate provides the numeric building blocks consumed by the DIIS
//! extrapolation engine and by the outer SCF loop:
//! - [`Scalar`]: real / complex double precision field abstraction
//! - [`MatRef`], [`MatMut`], [`Matrix`]: column-major strided views and owned storage
//! - [`mat_add`]: generalized matrix combine `C = α·op(A) + β·op(B)`
//! - [`LinearSolver`], [`FaerLu`]: injectable dense solve of `A · x = b`
//!
//! # Example
//!
//! ```
//! use scfaccel_linalg::{mat_add, Matrix, Op};
//!
//! let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
//! let b: Matrix<f64> = Matrix::eye(2);
//! let mut c = Matrix::zeros(2, 2);
//!
//! // C = Aᵀ + 2·I
//! mat_add(Op::Trans, Op::NoTrans, 2, 2, 1.0, a.view(), 2.0, b.view(), c.view_mut()).unwrap();
//! assert_eq!(c[[0, 1]], 3.0);
//! ```

pub mod error;
pub mod lu;
pub mod matadd;
pub mod scalar;
pub mod view;

// Re-export main types
pub use error::{LinalgError, Result};
pub use lu::{gesv, FaerLu, LinearSolver, LuOptions, DEFAULT_PIVOT_RTOL};
pub use matadd::{mat_add, mat_add_in_place, Op};
pub use scalar::Scalar;
pub use view::{MatMut, MatRef, Matrix};

#[doc(hidden)]
pub use paste as __paste;
