//! Sparse feature vectors produced by vectorizers.

use crate::error::{JarvisError, Result};

/// A sparse feature vector with a fixed dimension.
///
/// Entries are kept sorted by column index, unique, and non-zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        SparseVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(column, value)` pairs.
    ///
    /// Duplicate columns are summed and zero values dropped. Columns outside
    /// `0..dim` and non-finite values are rejected.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(column, _)) = entries.iter().find(|(column, _)| *column >= dim) {
            return Err(JarvisError::invalid_argument(format!(
                "column {column} out of range for dimension {dim}"
            )));
        }
        if entries.iter().any(|(_, value)| !value.is_finite()) {
            return Err(JarvisError::invalid_argument("non-finite feature value"));
        }

        entries.sort_by_key(|(column, _)| *column);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (column, value) in entries {
            match merged.last_mut() {
                Some((last, sum)) if *last == column => *sum += value,
                _ => merged.push((column, value)),
            }
        }
        merged.retain(|(_, value)| *value != 0.0);

        Ok(SparseVector {
            dim,
            entries: merged,
        })
    }

    /// Build a vector from a dense slice.
    pub fn from_dense(values: &[f64]) -> Self {
        SparseVector {
            dim: values.len(),
            entries: values
                .iter()
                .enumerate()
                .filter(|(_, value)| **value != 0.0)
                .map(|(column, value)| (column, *value))
                .collect(),
        }
    }

    /// The dimension of the feature space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// True when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// The non-zero `(column, value)` pairs, sorted by column.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Dot product with a dense vector. Missing dense components count as zero.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(column, value)| dense.get(column).map_or(0.0, |w| w * value))
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f64>()
            .sqrt()
    }

    /// Expand into a dense vector of length `dim`.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(column, value) in &self.entries {
            dense[column] = value;
        }
        dense
    }
}
