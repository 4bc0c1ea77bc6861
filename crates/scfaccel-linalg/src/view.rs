//! Column-major matrix storage and non-owning strided views.
//!
//! Element `(i, j)` of a view with leading dimension `ld` lives at
//! `data[i + j * ld]`, the layout dense BLAS/LAPACK kernels expect. Views
//! never own their buffer; the borrow checker ties them to the caller's
//! storage for as long as they are alive.

use std::ops::{Index, IndexMut};

use num_traits::{One, Zero};

use crate::error::{LinalgError, Result};
use crate::scalar::Scalar;

fn check_layout(len: usize, nrows: usize, ncols: usize, ld: usize) -> Result<()> {
    if ld < nrows.max(1) {
        return Err(LinalgError::InvalidLeadingDimension { ld, nrows });
    }
    let required = if nrows == 0 || ncols == 0 {
        0
    } else {
        ld * (ncols - 1) + nrows
    };
    if len < required {
        return Err(LinalgError::BufferTooShort {
            len,
            nrows,
            ncols,
            ld,
            required,
        });
    }
    Ok(())
}

/// Shared view of a column-major matrix
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a, T> {
    data: &'a [T],
    nrows: usize,
    ncols: usize,
    ld: usize,
}

impl<'a, T> MatRef<'a, T> {
    /// Wrap `data` as an `nrows × ncols` matrix with leading dimension `ld`.
    pub fn new(data: &'a [T], nrows: usize, ncols: usize, ld: usize) -> Result<Self> {
        check_layout(data.len(), nrows, ncols, ld)?;
        Ok(Self {
            data,
            nrows,
            ncols,
            ld,
        })
    }

    /// Contiguous view (`ld == nrows`).
    pub fn from_slice(data: &'a [T], nrows: usize, ncols: usize) -> Result<Self> {
        Self::new(data, nrows, ncols, nrows.max(1))
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Leading dimension
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Element reference, `None` when out of bounds
    pub fn get(&self, i: usize, j: usize) -> Option<&'a T> {
        if i < self.nrows && j < self.ncols {
            self.data.get(i + j * self.ld)
        } else {
            None
        }
    }
}

impl<T> Index<[usize; 2]> for MatRef<'_, T> {
    type Output = T;

    fn index(&self, idx: [usize; 2]) -> &Self::Output {
        debug_assert!(idx[0] < self.nrows && idx[1] < self.ncols);
        &self.data[idx[0] + idx[1] * self.ld]
    }
}

/// Exclusive view of a column-major matrix
#[derive(Debug)]
pub struct MatMut<'a, T> {
    data: &'a mut [T],
    nrows: usize,
    ncols: usize,
    ld: usize,
}

impl<'a, T> MatMut<'a, T> {
    /// Wrap `data` as an `nrows × ncols` matrix with leading dimension `ld`.
    pub fn new(data: &'a mut [T], nrows: usize, ncols: usize, ld: usize) -> Result<Self> {
        check_layout(data.len(), nrows, ncols, ld)?;
        Ok(Self {
            data,
            nrows,
            ncols,
            ld,
        })
    }

    /// Contiguous view (`ld == nrows`).
    pub fn from_slice(data: &'a mut [T], nrows: usize, ncols: usize) -> Result<Self> {
        Self::new(data, nrows, ncols, nrows.max(1))
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Leading dimension
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Shorter-lived mutable view of the same matrix
    pub fn reborrow(&mut self) -> MatMut<'_, T> {
        MatMut {
            data: &mut *self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.ld,
        }
    }

    /// Shared view of the same matrix
    pub fn to_ref(&self) -> MatRef<'_, T> {
        MatRef {
            data: &*self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.ld,
        }
    }

    /// Mutable element reference, `None` when out of bounds
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.nrows && j < self.ncols {
            self.data.get_mut(i + j * self.ld)
        } else {
            None
        }
    }
}

impl<T> Index<[usize; 2]> for MatMut<'_, T> {
    type Output = T;

    fn index(&self, idx: [usize; 2]) -> &Self::Output {
        debug_assert!(idx[0] < self.nrows && idx[1] < self.ncols);
        &self.data[idx[0] + idx[1] * self.ld]
    }
}

impl<T> IndexMut<[usize; 2]> for MatMut<'_, T> {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        debug_assert!(idx[0] < self.nrows && idx[1] < self.ncols);
        &mut self.data[idx[0] + idx[1] * self.ld]
    }
}

/// Owned dense matrix, column-major
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Clone + Zero> Matrix<T> {
    /// Create a zeros matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix from a 2D vector given row by row
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut m = Self::zeros(nrows, ncols);
        for (i, row) in rows.into_iter().enumerate() {
            assert_eq!(row.len(), ncols, "ragged row {i}");
            for (j, val) in row.into_iter().enumerate() {
                m[[i, j]] = val;
            }
        }
        m
    }

    /// Reset every entry to zero, keeping the shape
    pub fn fill_zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = T::zero());
    }
}

impl<T: Clone + Zero + One> Matrix<T> {
    /// Create an identity matrix
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[[i, i]] = T::one();
        }
        m
    }
}

impl<T> Matrix<T> {
    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Column-major backing storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Shared view of the whole matrix
    pub fn view(&self) -> MatRef<'_, T> {
        MatRef {
            data: &self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.nrows.max(1),
        }
    }

    /// Exclusive view of the whole matrix
    pub fn view_mut(&mut self) -> MatMut<'_, T> {
        MatMut {
            data: &mut self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            ld: self.nrows.max(1),
        }
    }

    /// Swap rows `a` and `b` in place
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.ncols {
            self.data.swap(a + j * self.nrows, b + j * self.nrows);
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Largest entry magnitude, 0 for an empty matrix
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, x| acc.max(x.abs_val()))
    }
}

impl<T> Index<[usize; 2]> for Matrix<T> {
    type Output = T;

    fn index(&self, idx: [usize; 2]) -> &Self::Output {
        &self.data[idx[0] + idx[1] * self.nrows]
    }
}

impl<T> IndexMut<[usize; 2]> for Matrix<T> {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        &mut self.data[idx[0] + idx[1] * self.nrows]
    }
}
