use log::{debug, trace, warn};

use super::{check_confidence, check_correspondences, check_mask, check_threshold, Workspace};
use super::RobustEstimator;
use crate::core::ModelKernel;
use crate::error::{EstimatorError, Failure};
use crate::scoring::count_inliers;
use crate::termination::update_num_iters;
use crate::types::{DataMatrix, Point};

/// Outcome of a RANSAC run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RansacReport {
    /// Sampling iterations actually executed.
    pub iterations: usize,
    /// Inliers of the best model, zero on failure.
    pub inlier_count: usize,
    /// Why no model was found, `None` on success.
    pub failure: Option<Failure>,
}

impl RansacReport {
    fn failed(failure: Failure, iterations: usize) -> Self {
        Self {
            iterations,
            inlier_count: 0,
            failure: Some(failure),
        }
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Turn a failed run into [`EstimatorError::EstimationFailed`].
    pub fn into_result(self) -> Result<Self, EstimatorError> {
        match self.failure {
            Some(failure) => Err(EstimatorError::EstimationFailed(failure)),
            None => Ok(self),
        }
    }
}

impl<K: ModelKernel> RobustEstimator<K> {
    /// Estimate a model with RANSAC.
    ///
    /// `mask` comes in with the caller's initial content and, on success,
    /// leaves holding the inliers of the best model, which is written into
    /// `model`. A candidate replaces the best one only when it has strictly
    /// more inliers than both the current best and `model_points - 1`.
    ///
    /// After each improvement the remaining iteration budget is recomputed
    /// from `confidence` and the observed outlier ratio; it only ever shrinks.
    pub fn estimate_ransac(
        &mut self,
        points_a: &[Point],
        points_b: &[Point],
        model: &mut DataMatrix,
        mask: &mut [bool],
        threshold: f64,
        confidence: f64,
    ) -> Result<RansacReport, EstimatorError> {
        let count = check_correspondences(points_a, points_b)?;
        check_mask(count, mask)?;
        self.check_model(model)?;
        check_threshold(threshold)?;
        check_confidence(confidence)?;

        let model_points = self.settings.model_points;
        if count < model_points {
            return Ok(RansacReport::failed(Failure::InsufficientData, 0));
        }

        let max_iters = self.settings.max_iters;
        let max_solutions = self.settings.max_basic_solutions;
        let mut ws = Workspace::new(&self.settings, points_a, points_b);
        let mut niters = if ws.sampled { max_iters } else { 1 };

        let mut best_mask = mask.to_vec();
        let mut trial_mask = vec![false; count];
        let mut best_count = 0;

        let mut iter = 0;
        while iter < niters {
            if ws.sampled
                && !self
                    .sampler
                    .sample(&self.kernel, points_a, points_b, &mut ws.subset)
            {
                if iter == 0 {
                    debug!("RANSAC could not draw a first subset");
                    return Ok(RansacReport::failed(Failure::SamplingExhausted, 0));
                }
                debug!("RANSAC stopping at iteration {iter}: subset sampling exhausted");
                break;
            }

            let produced = ws.fit(&self.kernel, max_solutions);
            trace!("RANSAC iteration {iter}: {produced} candidate(s)");

            for i in 0..produced {
                ws.load_candidate(i);
                self.kernel.compute_reprojection_error(
                    points_a,
                    points_b,
                    &ws.candidate,
                    &mut ws.errors,
                );
                let good = count_inliers(&ws.errors, &mut trial_mask, threshold);

                if good > best_count.max(model_points - 1) {
                    std::mem::swap(&mut best_mask, &mut trial_mask);
                    model.copy_from(&ws.candidate);
                    best_count = good;
                    let outlier_ratio = (count - good) as f64 / count as f64;
                    niters = update_num_iters(confidence, outlier_ratio, model_points, niters)?;
                    debug!(
                        "RANSAC iteration {iter}: new best with {good}/{count} inliers, \
                         budget now {niters}"
                    );
                }
            }
            iter += 1;
        }

        if ws.ran_to_cap(iter, max_iters) {
            warn!("RANSAC ran to the iteration cap of {max_iters}");
        }

        if best_count == 0 {
            return Ok(RansacReport::failed(Failure::NoValidModel, iter));
        }
        mask.copy_from_slice(&best_mask);

        Ok(RansacReport {
            iterations: iter,
            inlier_count: best_count,
            failure: None,
        })
    }
}
