//! Bordered normal-equations system of a DIIS extrapolation.
//!
//! For `n` history slots the system is `(n+1) × (n+1)`:
//!
//! ```text
//! | B[0,0]    ..  B[0,n-1]    -1 |   | c[0]   |   |  0 |
//! |  ..            ..         .. | . |  ..    | = | .. |
//! | B[n-1,0]  ..  B[n-1,n-1]  -1 |   | c[n-1] |   |  0 |
//! |  -1       ..   -1          0 |   | λ      |   | -1 |
//! ```
//!
//! with `B_kj = Σ_track ⟨e_k, e_j⟩`. The border row forces `Σ c_k = 1`.

use scfaccel_linalg::{Matrix, Scalar};

use crate::history::ResidualHistory;

/// Fill `b` with the bordered normal-equations matrix of `history`.
///
/// `b` is resized if it is not `(n_extrap + 1)` square. The upper triangle is
/// accumulated from inner products and mirrored as its conjugate, so the
/// inner-product block is symmetric (real) or Hermitian (complex).
///
/// # Panics
/// If `history` has fewer than `n_extrap` slots or `n_mat` tracks, or a
/// residual buffer is shorter than `o_size`. [`ResidualHistory::validate`]
/// checks these bounds up front.
pub fn fill_normal_equations<T: Scalar>(
    history: &ResidualHistory<'_, T>,
    n_extrap: usize,
    n_mat: usize,
    o_size: usize,
    b: &mut Matrix<T>,
) {
    let n = n_extrap + 1;
    if b.nrows() != n || b.ncols() != n {
        *b = Matrix::zeros(n, n);
    } else {
        b.fill_zero();
    }

    for track in 0..n_mat {
        for j in 0..n_extrap {
            let e_j = &history.residual(j, track)[..o_size];
            for k in 0..=j {
                let e_k = &history.residual(k, track)[..o_size];
                let ip = T::inner_product(e_k, e_j);
                b[[k, j]] = b[[k, j]] + ip;
            }
        }
    }

    for j in 0..n_extrap {
        for k in 0..j {
            b[[j, k]] = b[[k, j]].conj();
        }
    }

    let minus_one = -T::one();
    for l in 0..n_extrap {
        b[[n_extrap, l]] = minus_one;
        b[[l, n_extrap]] = minus_one;
    }
    b[[n_extrap, n_extrap]] = T::zero();
}

/// Build a fresh bordered normal-equations matrix of `history`.
///
/// See [`fill_normal_equations`].
pub fn build_normal_equations<T: Scalar>(
    history: &ResidualHistory<'_, T>,
    n_extrap: usize,
    n_mat: usize,
    o_size: usize,
) -> Matrix<T> {
    let mut b = Matrix::zeros(n_extrap + 1, n_extrap + 1);
    fill_normal_equations(history, n_extrap, n_mat, o_size, &mut b);
    b
}

/// Fill `rhs` with the constraint right-hand side `[0, …, 0, -1]`.
pub fn fill_constraint_rhs<T: Scalar>(rhs: &mut Vec<T>, n_extrap: usize) {
    rhs.clear();
    rhs.resize(n_extrap + 1, T::zero());
    rhs[n_extrap] = -T::one();
}

/// Constraint right-hand side `[0, …, 0, -1]` of length `n_extrap + 1`.
pub fn constraint_rhs<T: Scalar>(n_extrap: usize) -> Vec<T> {
    let mut rhs = Vec::with_capacity(n_extrap + 1);
    fill_constraint_rhs(&mut rhs, n_extrap);
    rhs
}
