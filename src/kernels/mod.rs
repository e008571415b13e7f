//! Concrete kernels for the generic estimators.

pub mod homography;

pub use homography::HomographyKernel;
