//! High-level API for common estimation tasks.

use crate::error::EstimatorError;
use crate::estimator::RobustEstimator;
use crate::kernels::HomographyKernel;
use crate::models::Homography;
use crate::settings::IterationCap;
use crate::types::Point;

/// Robust method used by the high-level functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// RANSAC with a reprojection threshold in the units of the points.
    Ransac { threshold: f64 },
    /// Least Median of Squares; the threshold is derived from the data.
    Lmeds { cap: IterationCap },
}

/// Options for [`estimate_homography`].
#[derive(Debug, Clone, PartialEq)]
pub struct HomographyOptions {
    pub method: Method,
    pub confidence: f64,
    /// RANSAC iteration cap.
    pub max_iters: usize,
    /// Fixed seed for reproducible runs; wall-clock seeded when `None`.
    pub seed: Option<u64>,
}

impl Default for HomographyOptions {
    fn default() -> Self {
        Self {
            method: Method::Ransac { threshold: 3.0 },
            confidence: 0.995,
            max_iters: 2000,
            seed: None,
        }
    }
}

/// Result of a robust estimation.
#[derive(Debug, Clone)]
pub struct EstimationResult<M> {
    /// The estimated model.
    pub model: M,
    /// Indices of inlier points.
    pub inliers: Vec<usize>,
    /// Per-correspondence inlier flags.
    pub mask: Vec<bool>,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Estimate a homography mapping `points1` onto `points2`.
///
/// A run that finds no acceptable model is returned as
/// [`EstimatorError::EstimationFailed`].
///
/// ```
/// use robust_estimator::api::{estimate_homography, HomographyOptions};
/// use robust_estimator::types::Point;
///
/// let points1: Vec<Point> = (0..20)
///     .map(|i| Point::new((i % 5) as f64 * 10.0, (i / 5) as f64 * 7.0 + (i % 3) as f64))
///     .collect();
/// let points2: Vec<Point> = points1.iter().map(|p| Point::new(p.x + 4.0, p.y - 1.0)).collect();
///
/// let options = HomographyOptions { seed: Some(7), ..Default::default() };
/// let result = estimate_homography(&points1, &points2, Some(options)).unwrap();
/// assert_eq!(result.inliers.len(), 20);
/// ```
pub fn estimate_homography(
    points1: &[Point],
    points2: &[Point],
    options_opt: Option<HomographyOptions>,
) -> Result<EstimationResult<Homography>, EstimatorError> {
    let options = options_opt.unwrap_or_default();
    let settings = HomographyKernel::settings(options.max_iters);
    let kernel = HomographyKernel::new();
    let mut estimator = match options.seed {
        Some(seed) => RobustEstimator::with_seed(kernel, settings, seed)?,
        None => RobustEstimator::new(kernel, settings)?,
    };

    let mut model = estimator.model_buffer();
    let mut mask = vec![false; points1.len()];
    let iterations = match options.method {
        Method::Ransac { threshold } => {
            estimator
                .estimate_ransac(
                    points1,
                    points2,
                    &mut model,
                    &mut mask,
                    threshold,
                    options.confidence,
                )?
                .into_result()?
                .iterations
        }
        Method::Lmeds { cap } => {
            estimator
                .estimate_lmeds(
                    points1,
                    points2,
                    &mut model,
                    &mut mask,
                    options.confidence,
                    cap,
                )?
                .into_result()?
                .iterations
        }
    };

    let model = Homography::from_data_matrix(&model)
        .map(|h| h.normalized())
        .ok_or(EstimatorError::ModelShape {
            rows: 3,
            cols: 3,
            got_rows: model.nrows(),
            got_cols: model.ncols(),
        })?;
    let inliers = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect();

    Ok(EstimationResult {
        model,
        inliers,
        mask,
        iterations,
    })
}
