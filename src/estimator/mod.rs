//! Generic robust estimator driving a [`ModelKernel`].
//!
//! [`RobustEstimator`] owns a kernel, its settings and a seedable sampler.
//! The two drivers live in their own modules:
//! - [`RobustEstimator::estimate_ransac`] keeps the candidate with the most
//!   inliers under a fixed threshold and shrinks its iteration budget as the
//!   inlier ratio improves.
//! - [`RobustEstimator::estimate_lmeds`] keeps the candidate with the least
//!   median error and derives the inlier threshold from that median.
//!
//! Invalid input is returned as an [`EstimatorError`]. A run that ends
//! without a model is still `Ok`, with the reason in the report's `failure`.

mod lmeds;
mod ransac;

pub use lmeds::LmedsReport;
pub use ransac::RansacReport;

use crate::core::ModelKernel;
use crate::error::EstimatorError;
use crate::samplers::{MinimalSubset, UniformSubsetSampler};
use crate::scoring::count_inliers;
use crate::settings::EstimatorSettings;
use crate::types::{DataMatrix, Point};
use crate::utils::UniformRandomGenerator;

/// RANSAC and LMedS over a pluggable kernel.
///
/// Every run takes `&mut self` because it advances the random generator.
#[derive(Debug, Clone)]
pub struct RobustEstimator<K> {
    kernel: K,
    settings: EstimatorSettings,
    sampler: UniformSubsetSampler,
}

impl<K: ModelKernel> RobustEstimator<K> {
    /// Build an estimator seeded from the wall clock.
    pub fn new(kernel: K, settings: EstimatorSettings) -> Result<Self, EstimatorError> {
        Self::with_rng(kernel, settings, UniformRandomGenerator::from_wall_clock())
    }

    /// Build an estimator with a fixed seed.
    pub fn with_seed(
        kernel: K,
        settings: EstimatorSettings,
        seed: u64,
    ) -> Result<Self, EstimatorError> {
        Self::with_rng(kernel, settings, UniformRandomGenerator::from_seed(seed))
    }

    fn with_rng(
        kernel: K,
        settings: EstimatorSettings,
        rng: UniformRandomGenerator,
    ) -> Result<Self, EstimatorError> {
        settings.validate()?;
        let sampler = UniformSubsetSampler::new(
            rng,
            settings.subset_check(),
            settings.max_sampling_attempts,
        );
        Ok(Self {
            kernel,
            settings,
            sampler,
        })
    }

    /// Restart the random sequence from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.sampler.reseed(seed);
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Zeroed matrix shaped like one model of this estimator.
    pub fn model_buffer(&self) -> DataMatrix {
        self.settings.model_size.zeros()
    }

    /// Compute the errors of `model` over all correspondences and mark those
    /// within `threshold` (compared as `error <= threshold²`).
    ///
    /// Returns the number of inliers, which always equals the number of
    /// `true` entries written to `mask`.
    pub fn find_inliers(
        &self,
        points_a: &[Point],
        points_b: &[Point],
        model: &DataMatrix,
        errors: &mut [f64],
        mask: &mut [bool],
        threshold: f64,
    ) -> Result<usize, EstimatorError> {
        let count = check_correspondences(points_a, points_b)?;
        check_mask(count, mask)?;
        if errors.len() != count {
            return Err(EstimatorError::ErrorBufferLength {
                expected: count,
                got: errors.len(),
            });
        }
        self.check_model(model)?;
        check_threshold(threshold)?;

        Ok(self.score(points_a, points_b, model, errors, mask, threshold))
    }

    fn score(
        &self,
        points_a: &[Point],
        points_b: &[Point],
        model: &DataMatrix,
        errors: &mut [f64],
        mask: &mut [bool],
        threshold: f64,
    ) -> usize {
        self.kernel.compute_reprojection_error(points_a, points_b, model, errors);
        count_inliers(errors, mask, threshold)
    }

    fn check_model(&self, model: &DataMatrix) -> Result<(), EstimatorError> {
        let size = self.settings.model_size;
        if model.nrows() != size.rows || model.ncols() != size.cols {
            return Err(EstimatorError::ModelShape {
                rows: size.rows,
                cols: size.cols,
                got_rows: model.nrows(),
                got_cols: model.ncols(),
            });
        }
        Ok(())
    }
}

/// Scratch buffers for one run, sized once from the data and settings.
struct Workspace {
    /// Packed kernel output, `max_basic_solutions` models stacked by rows.
    models: DataMatrix,
    /// The candidate currently being scored.
    candidate: DataMatrix,
    errors: Vec<f64>,
    subset: MinimalSubset,
    /// `false` when the whole set is the only subset.
    sampled: bool,
}

impl Workspace {
    fn new(settings: &EstimatorSettings, points_a: &[Point], points_b: &[Point]) -> Self {
        let sampled = points_a.len() > settings.model_points;
        let subset = if sampled {
            MinimalSubset::with_size(settings.model_points)
        } else {
            MinimalSubset::whole(points_a, points_b)
        };
        Self {
            models: settings.model_size.buffer(settings.max_basic_solutions),
            candidate: settings.model_size.zeros(),
            errors: vec![0.0; points_a.len()],
            subset,
            sampled,
        }
    }

    /// Run the kernel on the current subset; returns how many candidates it
    /// produced, never more than the buffer holds.
    fn fit<K: ModelKernel>(&mut self, kernel: &K, max_solutions: usize) -> usize {
        self.models.fill(0.0);
        kernel
            .fit_models(&self.subset.a, &self.subset.b, &mut self.models)
            .min(max_solutions)
    }

    /// Whether a sampled run used up its whole iteration cap.
    fn ran_to_cap(&self, iter: usize, max_iters: usize) -> bool {
        self.sampled && iter == max_iters
    }

    /// Copy candidate `i` out of the packed buffer.
    fn load_candidate(&mut self, i: usize) {
        let rows = self.candidate.nrows();
        self.candidate.copy_from(&self.models.rows(i * rows, rows));
    }
}

fn check_correspondences(points_a: &[Point], points_b: &[Point]) -> Result<usize, EstimatorError> {
    if points_a.len() != points_b.len() {
        return Err(EstimatorError::LengthMismatch {
            a: points_a.len(),
            b: points_b.len(),
        });
    }
    Ok(points_a.len())
}

fn check_mask(count: usize, mask: &[bool]) -> Result<(), EstimatorError> {
    if mask.len() != count {
        return Err(EstimatorError::MaskLength {
            expected: count,
            got: mask.len(),
        });
    }
    Ok(())
}

fn check_threshold(threshold: f64) -> Result<(), EstimatorError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(EstimatorError::Threshold(threshold));
    }
    Ok(())
}

fn check_confidence(confidence: f64) -> Result<(), EstimatorError> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(EstimatorError::Confidence(confidence));
    }
    Ok(())
}
