//! Core shared types for the robust estimators.
//!
//! Correspondences are kept as parallel slices of `nalgebra` points and models
//! as dynamic matrices, so kernels for any model shape can share one driver.

use nalgebra::{DMatrix, Point2};

/// Dynamic matrix of `f64` used for model instances and packed model buffers.
pub type DataMatrix = DMatrix<f64>;

/// A single 2D image point.
pub type Point = Point2<f64>;

/// Shape of one fitted model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSize {
    pub rows: usize,
    pub cols: usize,
}

impl ModelSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Zeroed matrix holding a single model.
    pub fn zeros(&self) -> DataMatrix {
        DataMatrix::zeros(self.rows, self.cols)
    }

    /// Zeroed buffer holding `count` models stacked along the rows.
    pub fn buffer(&self, count: usize) -> DataMatrix {
        DataMatrix::zeros(self.rows * count, self.cols)
    }
}

/// How the sampler validates subsets for degeneracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetCheck {
    /// Validate only the newest point each time one is added.
    Partial,
    /// Validate every point once the subset is complete.
    Full,
}
