//! # robust-estimator - RANSAC and LMedS over pluggable kernels
//!
//! `robust-estimator` fits geometric models to noisy point correspondences.
//! A generic [`RobustEstimator`] samples minimal subsets, asks a
//! [`ModelKernel`] for candidate models, scores each candidate on the whole
//! data set and keeps the best one, using either
//! - **RANSAC**: most inliers under a fixed threshold, with an iteration
//!   budget that shrinks as the inlier ratio improves, or
//! - **LMedS**: least median error, with the inlier threshold derived from
//!   that median afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use robust_estimator::kernels::HomographyKernel;
//! use robust_estimator::types::Point;
//! use robust_estimator::RobustEstimator;
//!
//! let a: Vec<Point> = (0..12)
//!     .map(|i| Point::new((i % 4) as f64 * 5.0, (i / 4) as f64 * 4.0 + (i % 3) as f64))
//!     .collect();
//! let b: Vec<Point> = a.iter().map(|p| Point::new(p.x + 2.0, p.y + 1.0)).collect();
//!
//! let mut estimator =
//!     RobustEstimator::with_seed(HomographyKernel::new(), HomographyKernel::settings(500), 1)
//!         .unwrap();
//! let mut model = estimator.model_buffer();
//! let mut mask = vec![false; a.len()];
//!
//! let report = estimator
//!     .estimate_ransac(&a, &b, &mut model, &mut mask, 1.0, 0.99)
//!     .unwrap();
//! assert!(report.success());
//! assert_eq!(report.inlier_count, 12);
//! ```
//!
//! ## Writing a kernel
//!
//! A kernel fits models from a minimal subset and measures how far each
//! correspondence is from a model. Models are written into a packed buffer of
//! `max_basic_solutions` instances stacked along the rows.
//!
//! ```rust
//! use robust_estimator::core::ModelKernel;
//! use robust_estimator::types::{DataMatrix, Point};
//!
//! /// `b = a + t`, stored as a 1x2 row.
//! struct Translation;
//!
//! impl ModelKernel for Translation {
//!     fn fit_models(&self, a: &[Point], b: &[Point], models: &mut DataMatrix) -> usize {
//!         let t = b[0] - a[0];
//!         models[(0, 0)] = t.x;
//!         models[(0, 1)] = t.y;
//!         1
//!     }
//!
//!     fn compute_reprojection_error(
//!         &self,
//!         a: &[Point],
//!         b: &[Point],
//!         model: &DataMatrix,
//!         errors: &mut [f64],
//!     ) {
//!         for ((pa, pb), e) in a.iter().zip(b).zip(errors.iter_mut()) {
//!             let dx = pa.x + model[(0, 0)] - pb.x;
//!             let dy = pa.y + model[(0, 1)] - pb.y;
//!             *e = dx * dx + dy * dy;
//!         }
//!     }
//! }
//! ```
//!
//! The default [`ModelKernel::is_subset_acceptable`] rejects subsets with
//! three collinear points; override it for geometries with other
//! degeneracies.
//!
//! ## Modules
//!
//! - **[`api`]**: High-level estimation functions
//! - **[`core`]**: The [`ModelKernel`] trait
//! - **[`estimator`]**: The RANSAC and LMedS drivers
//! - **[`kernels`]**: Built-in kernels
//! - **[`samplers`]**: Minimal subset sampling
//! - **[`scoring`]**: Inlier counting, medians and robust scale
//! - **[`termination`]**: Iteration budgets
//! - **[`settings`]**: Configuration types

pub mod api;
pub mod core;
pub mod degeneracy;
pub mod error;
pub mod estimator;
pub mod kernels;
pub mod models;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod termination;
pub mod types;
pub mod utils;

pub use api::{estimate_homography, EstimationResult, HomographyOptions, Method};
pub use crate::core::ModelKernel;
pub use error::{EstimatorError, Failure};
pub use estimator::{LmedsReport, RansacReport, RobustEstimator};
pub use settings::{EstimatorSettings, IterationCap};
