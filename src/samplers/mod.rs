//! Minimal subset sampling.

pub mod uniform;

pub use uniform::UniformSubsetSampler;

use crate::types::Point;

/// Scratch buffers for one minimal subset: the chosen indices and the
/// gathered points of both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimalSubset {
    pub indices: Vec<usize>,
    pub a: Vec<Point>,
    pub b: Vec<Point>,
}

impl MinimalSubset {
    /// Buffers for a subset of `size` correspondences.
    pub fn with_size(size: usize) -> Self {
        Self {
            indices: vec![0; size],
            a: vec![Point::origin(); size],
            b: vec![Point::origin(); size],
        }
    }

    /// The whole correspondence set taken as the only subset.
    pub fn whole(points_a: &[Point], points_b: &[Point]) -> Self {
        Self {
            indices: (0..points_a.len()).collect(),
            a: points_a.to_vec(),
            b: points_b.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn set(&mut self, slot: usize, index: usize, points_a: &[Point], points_b: &[Point]) {
        self.indices[slot] = index;
        self.a[slot] = points_a[index];
        self.b[slot] = points_b[index];
    }
}
