//! The kernel trait the generic drivers are written against.
//!
//! A [`ModelKernel`] knows one geometry: how to fit candidate models from a
//! minimal subset, how far each correspondence is from a model, and which
//! subsets are too degenerate to fit. The RANSAC and LMedS drivers in
//! [`crate::estimator`] never look past this trait.

use crate::degeneracy::check_subset;
use crate::types::{DataMatrix, Point, SubsetCheck};

pub trait ModelKernel {
    /// Fit candidate models to a minimal subset.
    ///
    /// `models` holds room for the configured maximum number of solutions,
    /// stacked along the rows. Returns how many were written; zero means the
    /// subset produced no usable model.
    fn fit_models(&self, subset_a: &[Point], subset_b: &[Point], models: &mut DataMatrix) -> usize;

    /// Write one error per correspondence into `errors`.
    ///
    /// Errors are compared against a squared threshold, so they should be
    /// squared distances or another score monotone in them.
    fn compute_reprojection_error(
        &self,
        points_a: &[Point],
        points_b: &[Point],
        model: &DataMatrix,
        errors: &mut [f64],
    );

    /// Whether the first `count` points of a subset are usable.
    fn is_subset_acceptable(&self, points: &[Point], count: usize, mode: SubsetCheck) -> bool {
        check_subset(points, count, mode)
    }
}

impl<K: ModelKernel + ?Sized> ModelKernel for &K {
    fn fit_models(&self, subset_a: &[Point], subset_b: &[Point], models: &mut DataMatrix) -> usize {
        (**self).fit_models(subset_a, subset_b, models)
    }

    fn compute_reprojection_error(
        &self,
        points_a: &[Point],
        points_b: &[Point],
        model: &DataMatrix,
        errors: &mut [f64],
    ) {
        (**self).compute_reprojection_error(points_a, points_b, model, errors)
    }

    fn is_subset_acceptable(&self, points: &[Point], count: usize, mode: SubsetCheck) -> bool {
        (**self).is_subset_acceptable(points, count, mode)
    }
}
