//! Exact (brute force) L2 index over dense ids.

use std::cmp::Ordering;

use factcheck_core::similarity::squared_l2_distance;

use crate::error::{IndexError, Result};

/// Row-major vectors; row `i` is statement id `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

/// One nearest-neighbor hit: statement id and true (not squared) L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f32,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Rebuild from a flat row-major buffer. `data.len()` must be a multiple of `dimension`.
    pub(crate) fn from_raw(dimension: usize, data: Vec<f32>) -> Self {
        debug_assert!(dimension > 0 && data.len() % dimension == 0);
        Self { dimension, data }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn raw(&self) -> &[f32] {
        &self.data
    }

    /// Append a vector; its id is the previous length.
    pub fn add(&mut self, vector: &[f32]) -> Result<usize> {
        self.check_dimension(vector)?;
        let id = self.len();
        self.data.extend_from_slice(vector);
        Ok(id)
    }

    /// The `k` nearest rows, by ascending distance then ascending id.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimension(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(id, row)| (id, squared_l2_distance(row, query)))
            .collect();

        scored.sort_by(|a, b| match a.1.total_cmp(&b.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(id, squared)| Neighbor {
                id,
                distance: squared.sqrt(),
            })
            .collect())
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                found: vector.len(),
            });
        }
        Ok(())
    }
}
