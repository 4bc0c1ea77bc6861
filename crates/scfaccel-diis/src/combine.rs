//! Combine trial solutions with extrapolation weights.
//!
//! The extrapolated quantity of an SCF step is `Σ c_k · X_k` over the trial
//! solutions `X_k` of the history slots. The sum is accumulated with
//! [`mat_add_in_place`], one trial per call.

use scfaccel_linalg::{mat_add_in_place, MatMut, MatRef, Op, Scalar};

use crate::error::{DiisError, Result};

/// Compute `out = Σ_k weights[k] · trials[k]`.
///
/// Every trial must have the shape of `out`. The previous contents of `out`
/// are overwritten.
///
/// # Errors
/// `CoefficientCount` if `weights` and `trials` differ in length or are
/// empty, `Linalg(DimensionMismatch)` if a trial has the wrong shape.
pub fn combine_trials<T: Scalar>(
    weights: &[T],
    trials: &[MatRef<'_, T>],
    mut out: MatMut<'_, T>,
) -> Result<()> {
    if weights.len() != trials.len() || weights.is_empty() {
        return Err(DiisError::CoefficientCount {
            coefficients: weights.len(),
            trials: trials.len(),
        });
    }

    let (m, n) = (out.nrows(), out.ncols());
    for (k, (&w, trial)) in weights.iter().zip(trials).enumerate() {
        let beta = if k == 0 { T::zero() } else { T::one() };
        mat_add_in_place(Op::NoTrans, m, n, w, *trial, beta, out.reborrow())?;
    }
    Ok(())
}

/// [`combine_trials`] over flat trial vectors, such as those stored in a
/// [`crate::HistoryRing`].
///
/// # Errors
/// Same as [`combine_trials`].
pub fn combine_vectors<T: Scalar>(weights: &[T], trials: &[&[T]], out: &mut [T]) -> Result<()> {
    let len = out.len();
    let views = trials
        .iter()
        .map(|t| MatRef::from_slice(t, t.len(), 1))
        .collect::<scfaccel_linalg::Result<Vec<_>>>()?;
    combine_trials(weights, &views, MatMut::from_slice(out, len, 1)?)
}
