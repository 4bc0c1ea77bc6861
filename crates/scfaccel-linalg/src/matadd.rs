//! Generalized matrix combine `C = α·op(A) + β·op(B)`.
//!
//! `op` follows the GEMM conventions (`N`, `T`, `C`) with the addition of `R`,
//! a pure elementwise conjugation without transposition. The operands may
//! live in different scalar fields as long as `A`'s field embeds into the
//! field of `B` and `C` (real into complex, or the same field).
//!
//! # Aliasing
//!
//! [`mat_add`] borrows `C` exclusively, so neither operand can overlap it.
//! The one overlap that is well-defined, `C ← α·op(A) + β·C` with `op(B) = N`,
//! is provided by [`mat_add_in_place`]. Overlap under a transform cannot be
//! expressed at all:
//!
//! ```compile_fail
//! use scfaccel_linalg::{mat_add, MatMut, MatRef, Op};
//!
//! let mut buf = vec![1.0f64, 2.0, 3.0, 4.0];
//! let a = MatRef::from_slice(&buf, 2, 2).unwrap();
//! let c = MatMut::from_slice(&mut buf, 2, 2).unwrap();
//! mat_add(Op::Trans, Op::NoTrans, 2, 2, 1.0, a, 1.0, a, c).unwrap();
//! ```

use crate::error::{LinalgError, Result};
use crate::scalar::Scalar;
use crate::view::{MatMut, MatRef};

/// Operand transform applied before combining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Op {
    /// `op(X) = X` ('N')
    #[default]
    NoTrans,
    /// `op(X) = Xᵀ` ('T')
    Trans,
    /// `op(X) = Xᴴ` ('C')
    ConjTrans,
    /// `op(X) = conj(X)`, no transposition ('R')
    Conj,
}

impl Op {
    /// Whether the transform swaps rows and columns.
    pub fn is_transposed(self) -> bool {
        matches!(self, Op::Trans | Op::ConjTrans)
    }

    /// Shape the operand must have so that `op(X)` is `m × n`.
    pub fn operand_shape(self, m: usize, n: usize) -> (usize, usize) {
        if self.is_transposed() {
            (n, m)
        } else {
            (m, n)
        }
    }

    /// Element `(i, j)` of `op(x)`.
    #[inline]
    fn element<T: Scalar>(self, x: &MatRef<'_, T>, i: usize, j: usize) -> T {
        match self {
            Op::NoTrans => x[[i, j]],
            Op::Trans => x[[j, i]],
            Op::ConjTrans => x[[j, i]].conj(),
            Op::Conj => x[[i, j]].conj(),
        }
    }
}

impl TryFrom<char> for Op {
    type Error = LinalgError;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'N' => Ok(Op::NoTrans),
            'T' => Ok(Op::Trans),
            'C' => Ok(Op::ConjTrans),
            'R' => Ok(Op::Conj),
            _ => Err(LinalgError::InvalidTranspose(c)),
        }
    }
}

fn check_operand<T>(
    operand: &'static str,
    op: Op,
    m: usize,
    n: usize,
    x: &MatRef<'_, T>,
) -> Result<()> {
    let (rows, cols) = op.operand_shape(m, n);
    if x.nrows() != rows || x.ncols() != cols {
        return Err(LinalgError::DimensionMismatch {
            operand,
            expected_rows: rows,
            expected_cols: cols,
            actual_rows: x.nrows(),
            actual_cols: x.ncols(),
        });
    }
    Ok(())
}

fn check_output<T>(m: usize, n: usize, c: &MatMut<'_, T>) -> Result<()> {
    if c.nrows() != m || c.ncols() != n {
        return Err(LinalgError::DimensionMismatch {
            operand: "C",
            expected_rows: m,
            expected_cols: n,
            actual_rows: c.nrows(),
            actual_cols: c.ncols(),
        });
    }
    Ok(())
}

/// Compute `C = α·op(A) + β·op(B)` for an `m × n` result.
///
/// `A` is read in field `F1`, `B` and `C` share field `F2`. When `β` is zero,
/// `B` is not read.
///
/// # Errors
/// Returns `LinalgError::DimensionMismatch` if `op(A)`, `op(B)` or `C` is not
/// `m × n`.
#[allow(clippy::too_many_arguments)]
pub fn mat_add<F1, F2, S>(
    op_a: Op,
    op_b: Op,
    m: usize,
    n: usize,
    alpha: S,
    a: MatRef<'_, F1>,
    beta: S,
    b: MatRef<'_, F2>,
    mut c: MatMut<'_, F2>,
) -> Result<()>
where
    F1: Scalar,
    F2: Scalar + From<F1> + From<S>,
    S: Copy,
{
    check_operand("A", op_a, m, n, &a)?;
    check_operand("B", op_b, m, n, &b)?;
    check_output(m, n, &c)?;

    let alpha = F2::from(alpha);
    let beta = F2::from(beta);
    let skip_b = beta.is_zero();

    for j in 0..n {
        for i in 0..m {
            let mut val = alpha * F2::from(op_a.element(&a, i, j));
            if !skip_b {
                val = val + beta * op_b.element(&b, i, j);
            }
            c[[i, j]] = val;
        }
    }
    Ok(())
}

/// Compute `C ← α·op(A) + β·C` for an `m × n` matrix `C`.
///
/// This is the overlapping form of [`mat_add`] with `B = C` and `op(B) = N`.
/// When `β` is zero the previous contents of `C` are not read.
///
/// # Errors
/// Returns `LinalgError::DimensionMismatch` if `op(A)` or `C` is not `m × n`.
pub fn mat_add_in_place<F1, F2, S>(
    op_a: Op,
    m: usize,
    n: usize,
    alpha: S,
    a: MatRef<'_, F1>,
    beta: S,
    mut c: MatMut<'_, F2>,
) -> Result<()>
where
    F1: Scalar,
    F2: Scalar + From<F1> + From<S>,
    S: Copy,
{
    check_operand("A", op_a, m, n, &a)?;
    check_output(m, n, &c)?;

    let alpha = F2::from(alpha);
    let beta = F2::from(beta);
    let skip_c = beta.is_zero();

    for j in 0..n {
        for i in 0..m {
            let scaled = alpha * F2::from(op_a.element(&a, i, j));
            c[[i, j]] = if skip_c {
                scaled
            } else {
                scaled + beta * c[[i, j]]
            };
        }
    }
    Ok(())
}
