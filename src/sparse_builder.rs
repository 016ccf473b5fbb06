//! Dense-to-sparse encoding for the vectors attached to a [`crate::query::Query`] (§9).
//!
//! A dense `f32` vector is encoded as ascending `(bin, intensity)` runs: one entry
//! per bin where the value *changes* from its predecessor, bracketed by an
//! explicit `(0, 0.0)` leading sentinel and a trailing `(array_size, 0.0)`
//! sentinel, mirroring a run-length-style encoding of a mostly-flat signal.

use crate::bin_math::is_equal;
use crate::config::Config;
use crate::query::{ScoreVector, SparseEntry};

/// Encode `dense` as a [`ScoreVector::Sparse`] run-change list.
pub fn to_sparse(dense: &[f32]) -> Vec<SparseEntry> {
    let mut entries = vec![SparseEntry { bin: 0, intensity: 0.0 }];
    let mut previous = 0.0f32;
    for (i, &value) in dense.iter().enumerate() {
        if !is_equal(value as f64, previous as f64) {
            entries.push(SparseEntry {
                bin: i as i32,
                intensity: value,
            });
            previous = value;
        }
    }
    entries.push(SparseEntry {
        bin: dense.len() as i32,
        intensity: 0.0,
    });
    entries
}

/// Decode a sparse run-change list back into a dense vector of length `array_size`.
pub fn to_dense(sparse: &[SparseEntry], array_size: usize) -> Vec<f32> {
    let mut dense = vec![0.0f32; array_size];
    for window in sparse.windows(2) {
        let start = window[0].bin.max(0) as usize;
        let end = (window[1].bin as usize).min(array_size);
        if start >= end {
            continue;
        }
        for slot in &mut dense[start..end] {
            *slot = window[0].intensity;
        }
    }
    dense
}

/// Wrap `dense` as the representation `config.sparse_matrix_enabled` selects.
pub fn encode(dense: Vec<f32>, config: &Config) -> ScoreVector {
    if config.sparse_matrix_enabled {
        ScoreVector::Sparse(to_sparse(&dense))
    } else {
        ScoreVector::Dense(dense)
    }
}
