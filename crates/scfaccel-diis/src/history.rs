//! Residual history: the `[slot][track]` error metrics an extrapolation reads.
//!
//! [`ResidualHistory`] only borrows. Whoever owns the buffers decides how
//! slots rotate between SCF iterations; [`HistoryRing`] is a ready-made owner
//! that keeps the most recent `capacity` iterations.

use std::collections::VecDeque;

use crate::error::{DiisError, Result};

/// Borrowed residual buffers indexed `[slot][track]`.
///
/// The lifetime `'a` pins the caller's buffers: while an engine built on this
/// history is alive the buffers cannot be mutated or dropped.
#[derive(Debug, Clone)]
pub struct ResidualHistory<'a, T> {
    slots: Vec<Vec<&'a [T]>>,
}

impl<'a, T> ResidualHistory<'a, T> {
    /// History from explicit `[slot][track]` buffers.
    pub fn new(slots: Vec<Vec<&'a [T]>>) -> Self {
        Self { slots }
    }

    /// History with one track per slot.
    pub fn single_track(slots: Vec<&'a [T]>) -> Self {
        Self {
            slots: slots.into_iter().map(|r| vec![r]).collect(),
        }
    }

    /// Number of slots
    pub fn n_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of tracks of the first slot (0 when empty)
    pub fn n_tracks(&self) -> usize {
        self.slots.first().map_or(0, Vec::len)
    }

    /// Residual buffer of `track` in `slot`.
    ///
    /// # Panics
    /// Panics if `slot` or `track` is out of range.
    pub fn residual(&self, slot: usize, track: usize) -> &'a [T] {
        self.slots[slot][track]
    }

    /// Check that the history holds exactly `n_extrap` slots of `n_mat`
    /// tracks, each of length `o_size`.
    ///
    /// # Errors
    /// `HistoryShape` or `ResidualLength` describing the first mismatch.
    pub fn validate(&self, n_extrap: usize, n_mat: usize, o_size: usize) -> Result<()> {
        if self.slots.len() != n_extrap {
            return Err(DiisError::HistoryShape {
                expected_slots: n_extrap,
                expected_tracks: n_mat,
                actual_slots: self.slots.len(),
                detail: "wrong slot count".to_string(),
            });
        }
        for (slot, tracks) in self.slots.iter().enumerate() {
            if tracks.len() != n_mat {
                return Err(DiisError::HistoryShape {
                    expected_slots: n_extrap,
                    expected_tracks: n_mat,
                    actual_slots: self.slots.len(),
                    detail: format!("slot {slot} has {} tracks", tracks.len()),
                });
            }
            for (track, residual) in tracks.iter().enumerate() {
                if residual.len() != o_size {
                    return Err(DiisError::ResidualLength {
                        slot,
                        track,
                        expected: o_size,
                        actual: residual.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    residuals: Vec<Vec<T>>,
    trial: Option<Vec<T>>,
}

/// Owned history of the most recent `capacity` iterations, oldest first.
///
/// Each slot stores `n_mat` residual tracks of length `o_size` and, optionally,
/// the trial solution the residuals belong to.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    capacity: usize,
    n_mat: usize,
    o_size: usize,
    entries: VecDeque<Entry<T>>,
}

impl<T> HistoryRing<T> {
    /// Create an empty ring.
    ///
    /// # Errors
    /// `InvalidHistory` if any dimension is zero.
    pub fn new(capacity: usize, n_mat: usize, o_size: usize) -> Result<Self> {
        if capacity == 0 || n_mat == 0 || o_size == 0 {
            return Err(DiisError::InvalidHistory {
                message: format!(
                    "capacity={capacity}, n_mat={n_mat}, o_size={o_size} must all be at least 1"
                ),
            });
        }
        Ok(Self {
            capacity,
            n_mat,
            o_size,
            entries: VecDeque::with_capacity(capacity),
        })
    }

    /// Maximum number of slots kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tracks per slot
    pub fn n_mat(&self) -> usize {
        self.n_mat
    }

    /// Length of every residual buffer
    pub fn o_size(&self) -> usize {
        self.o_size
    }

    /// Number of slots currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slot is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the next push evicts the oldest slot
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Drop every slot
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove the oldest slot, returning whether one was removed.
    ///
    /// Used to shrink the extrapolation space after a failed solve.
    pub fn drop_oldest(&mut self) -> bool {
        self.entries.pop_front().is_some()
    }

    /// Append the residual tracks of a new iteration.
    ///
    /// # Errors
    /// `HistoryShape` or `ResidualLength` if `residuals` is not `n_mat`
    /// buffers of length `o_size`.
    pub fn push(&mut self, residuals: Vec<Vec<T>>) -> Result<()> {
        self.push_entry(residuals, None)
    }

    /// Append residual tracks together with the trial solution they belong to.
    ///
    /// # Errors
    /// Same as [`HistoryRing::push`].
    pub fn push_with_trial(&mut self, residuals: Vec<Vec<T>>, trial: Vec<T>) -> Result<()> {
        self.push_entry(residuals, Some(trial))
    }

    fn push_entry(&mut self, residuals: Vec<Vec<T>>, trial: Option<Vec<T>>) -> Result<()> {
        if residuals.len() != self.n_mat {
            return Err(DiisError::HistoryShape {
                expected_slots: self.capacity,
                expected_tracks: self.n_mat,
                actual_slots: self.entries.len(),
                detail: format!("pushed {} tracks", residuals.len()),
            });
        }
        if let Some((track, r)) = residuals
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.o_size)
        {
            return Err(DiisError::ResidualLength {
                slot: self.entries.len(),
                track,
                expected: self.o_size,
                actual: r.len(),
            });
        }

        if self.is_full() {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry { residuals, trial });
        Ok(())
    }

    /// Borrowed view of every slot, oldest first.
    pub fn view(&self) -> ResidualHistory<'_, T> {
        ResidualHistory::new(
            self.entries
                .iter()
                .map(|e| e.residuals.iter().map(Vec::as_slice).collect())
                .collect(),
        )
    }

    /// Trial solution of `slot`, if one was pushed with it.
    pub fn trial(&self, slot: usize) -> Option<&[T]> {
        self.entries.get(slot)?.trial.as_deref()
    }

    /// Trial solutions of every slot, oldest first; `None` if any slot lacks one.
    pub fn trials(&self) -> Option<Vec<&[T]>> {
        self.entries.iter().map(|e| e.trial.as_deref()).collect()
    }
}
