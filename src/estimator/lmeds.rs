use log::{debug, trace};

use super::{check_confidence, check_correspondences, check_mask, Workspace};
use super::RobustEstimator;
use crate::core::ModelKernel;
use crate::error::{EstimatorError, Failure};
use crate::scoring::{median, robust_sigma};
use crate::settings::IterationCap;
use crate::termination::lmeds_num_iters;
use crate::types::{DataMatrix, Point};

/// Outcome of an LMedS run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmedsReport {
    /// Sampling iterations actually executed.
    pub iterations: usize,
    /// Points within `sigma` of the best model.
    pub inlier_count: usize,
    /// Least median error seen, if any candidate was scored.
    pub min_median: Option<f64>,
    /// Inlier threshold derived from `min_median`.
    pub sigma: Option<f64>,
    /// Why no model was accepted, `None` on success.
    pub failure: Option<Failure>,
}

impl LmedsReport {
    fn failed(failure: Failure, iterations: usize) -> Self {
        Self {
            iterations,
            inlier_count: 0,
            min_median: None,
            sigma: None,
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
    /// Estimate a model with Least Median of Squares.
    ///
    /// Runs a fixed number of trials derived from `confidence` and an assumed
    /// outlier ratio of 0.45, clamped to `[3, cap]`, and keeps the candidate
    /// whose median error over all correspondences is smallest. The inlier
    /// threshold is then derived from that median and written to `mask`.
    ///
    /// Succeeds when at least `model_points` correspondences end up inliers.
    /// A cap resolving to zero iterations is rejected.
    pub fn estimate_lmeds(
        &mut self,
        points_a: &[Point],
        points_b: &[Point],
        model: &mut DataMatrix,
        mask: &mut [bool],
        confidence: f64,
        cap: IterationCap,
    ) -> Result<LmedsReport, EstimatorError> {
        let count = check_correspondences(points_a, points_b)?;
        check_mask(count, mask)?;
        self.check_model(model)?;
        check_confidence(confidence)?;
        cap.validate()?;

        let model_points = self.settings.model_points;
        if count < model_points {
            return Ok(LmedsReport::failed(Failure::InsufficientData, 0));
        }

        let max_solutions = self.settings.max_basic_solutions;
        let mut ws = Workspace::new(&self.settings, points_a, points_b);
        let niters = if ws.sampled {
            lmeds_num_iters(confidence, model_points, cap.resolve(count))
        } else {
            1
        };
        debug!("LMedS running {niters} trial(s) over {count} correspondences");

        // Kernels report unprojectable points as `f64::MAX`; a median at or
        // above it never counts as a model.
        let mut min_median = f64::MAX;
        let mut iter = 0;
        while iter < niters {
            if ws.sampled
                && !self
                    .sampler
                    .sample(&self.kernel, points_a, points_b, &mut ws.subset)
            {
                if iter == 0 {
                    debug!("LMedS could not draw a first subset");
                    return Ok(LmedsReport::failed(Failure::SamplingExhausted, 0));
                }
                debug!("LMedS stopping at iteration {iter}: subset sampling exhausted");
                break;
            }

            let produced = ws.fit(&self.kernel, max_solutions);
            for i in 0..produced {
                ws.load_candidate(i);
                self.kernel.compute_reprojection_error(
                    points_a,
                    points_b,
                    &ws.candidate,
                    &mut ws.errors,
                );
                let Some(med) = median(&mut ws.errors) else {
                    continue;
                };
                trace!("LMedS iteration {iter}: candidate {i} median {med}");
                if med < min_median {
                    min_median = med;
                    model.copy_from(&ws.candidate);
                }
            }
            iter += 1;
        }

        if min_median >= f64::MAX {
            return Ok(LmedsReport::failed(Failure::NoValidModel, iter));
        }

        let sigma = robust_sigma(min_median, count, model_points);
        let inlier_count = self.score(points_a, points_b, model, &mut ws.errors, mask, sigma);
        debug!("LMedS best median {min_median}, sigma {sigma}, {inlier_count}/{count} inliers");

        let failure = (inlier_count < model_points).then_some(Failure::BelowQualityFloor);
        Ok(LmedsReport {
            iterations: iter,
            inlier_count,
            min_median: Some(min_median),
            sigma: Some(sigma),
            failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::test_kernels::{
        shifted, BarrenKernel, RationedKernel, TranslationKernel, UnboundedKernel,
    };
    use crate::settings::EstimatorSettings;
    use crate::types::ModelSize;
    use approx::assert_relative_eq;

    fn estimator() -> RobustEstimator<TranslationKernel> {
        RobustEstimator::with_seed(
            TranslationKernel::default(),
            TranslationKernel::settings(2000),
            29,
        )
        .unwrap()
    }

    #[test]
    fn recovers_translation_with_outliers() {
        let (a, b) = shifted(50, 3);
        let mut est = estimator();
        let mut model = est.model_buffer();
        let mut mask = vec![false; a.len()];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.9999, IterationCap::Absolute(100))
            .unwrap();

        assert!(report.success());
        assert_relative_eq!(model[(0, 0)], 3.0, epsilon = 1e-12);
        assert_relative_eq!(model[(0, 1)], -2.0, epsilon = 1e-12);
        assert_eq!(report.min_median, Some(0.0));
        assert_eq!(report.sigma, Some(crate::scoring::MIN_SIGMA));
        // Outliers sit at every third index starting from zero.
        assert_eq!(report.inlier_count, 33);
        assert!(mask.iter().enumerate().all(|(i, &m)| m == (i % 3 != 0)));
    }

    #[test]
    fn trial_count_is_fixed_by_confidence() {
        let (a, b) = shifted(50, 0);
        let mut est = estimator();
        let mut model = est.model_buffer();
        let mut mask = vec![false; a.len()];

        // log(0.01) / log(0.45) = 5.77 for one-point samples.
        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(100))
            .unwrap();
        assert_eq!(report.iterations, 6);
        assert_eq!(est.kernel().fits.get(), 6);
    }

    #[test]
    fn cap_can_scale_with_data_size() {
        let (a, b) = shifted(2, 0);
        let mut est = estimator();
        let mut model = est.model_buffer();
        let mut mask = vec![false; a.len()];

        // Zero means one trial per correspondence, below the minimum of three.
        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::from_signed(0))
            .unwrap();
        assert_eq!(report.iterations, 2);

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::from_signed(-2))
            .unwrap();
        assert_eq!(report.iterations, 4);
    }

    #[test]
    fn whole_set_is_a_single_trial() {
        let (a, b) = shifted(1, 0);
        let mut est = estimator();
        let mut model = est.model_buffer();
        let mut mask = vec![false];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(50))
            .unwrap();

        assert!(report.success());
        assert_eq!(report.iterations, 1);
        assert_eq!(est.kernel().fits.get(), 1);
        assert_eq!(mask, vec![true]);
    }

    #[test]
    fn no_candidates_means_no_model() {
        let mut est =
            RobustEstimator::with_seed(BarrenKernel, TranslationKernel::settings(10), 2).unwrap();
        let (a, b) = shifted(10, 0);
        let mut model = est.model_buffer();
        let mut mask = vec![false; 10];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(10))
            .unwrap();
        assert_eq!(report.failure, Some(Failure::NoValidModel));
        assert_eq!(report.min_median, None);
    }

    #[test]
    fn too_few_inliers_fall_below_the_floor() {
        // Four-point samples over five correspondences: three share nearly the
        // same shift and two are far off, so the best median stays tiny and
        // only three points fall within sigma.
        let settings = EstimatorSettings::new(4, ModelSize::new(1, 2), 1, 100);
        let mut est =
            RobustEstimator::with_seed(TranslationKernel::default(), settings, 4).unwrap();
        let a = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(3.0, 9.0),
            Point::new(12.0, 11.0),
            Point::new(-4.0, 6.0),
        ];
        let shifts = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1000.0, 0.0), (0.0, 1000.0)];
        let b: Vec<Point> = a
            .iter()
            .zip(shifts)
            .map(|(p, (dx, dy))| Point::new(p.x + dx, p.y + dy))
            .collect();
        let mut model = est.model_buffer();
        let mut mask = vec![false; a.len()];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(20))
            .unwrap();

        assert!(report.min_median.is_some());
        assert_eq!(report.failure, Some(Failure::BelowQualityFloor));
        assert_eq!(report.inlier_count, 3);
        assert_eq!(mask, vec![true, true, true, false, false]);
    }

    #[test]
    fn insufficient_data_is_reported() {
        let settings = EstimatorSettings::new(3, ModelSize::new(1, 2), 1, 100);
        let mut est =
            RobustEstimator::with_seed(TranslationKernel::default(), settings, 4).unwrap();
        let (a, b) = shifted(2, 0);
        let mut model = est.model_buffer();
        let mut mask = vec![false; 2];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::OnePerPoint)
            .unwrap();
        assert_eq!(report.failure, Some(Failure::InsufficientData));
    }

    #[test]
    fn errors_at_the_float_limit_are_not_a_model() {
        // Odd count, so the median is an unaveraged `f64::MAX`.
        let settings = TranslationKernel::settings(10);
        let mut est = RobustEstimator::with_seed(UnboundedKernel, settings, 6).unwrap();
        let (a, b) = shifted(11, 0);
        let mut model = est.model_buffer();
        let mut mask = vec![false; 11];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(10))
            .unwrap();
        assert_eq!(report.failure, Some(Failure::NoValidModel));
        assert_eq!(report.min_median, None);
        assert_eq!(report.sigma, None);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn zero_iteration_cap_is_rejected() {
        let (a, b) = shifted(10, 0);
        let mut est = estimator();
        let mut model = est.model_buffer();
        let mut mask = vec![false; 10];

        for cap in [IterationCap::Absolute(0), IterationCap::PerPoint(0)] {
            assert_eq!(
                est.estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, cap),
                Err(EstimatorError::NonPositive("cap"))
            );
        }
        assert_eq!(est.kernel().fits.get(), 0);
    }

    #[test]
    fn sampling_running_dry_keeps_the_best_model() {
        // Two checks per one-point subset: three subsets, then nothing.
        let mut est = RobustEstimator::with_seed(
            RationedKernel::new(6),
            TranslationKernel::settings(100),
            12,
        )
        .unwrap();
        let (a, b) = shifted(30, 3);
        let mut model = est.model_buffer();
        let mut mask = vec![false; a.len()];

        let report = est
            .estimate_lmeds(&a, &b, &mut model, &mut mask, 0.99, IterationCap::Absolute(100))
            .unwrap();

        assert!(report.success());
        assert_eq!(report.iterations, 3);
        assert_eq!(est.kernel().inner.fits.get(), 3);
        assert!(report.min_median.is_some());
        assert_eq!(mask.iter().filter(|&&m| m).count(), report.inlier_count);
    }
}
