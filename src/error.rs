//! Error and failure types.
//!
//! Malformed input (mismatched lengths, bad parameters) is a hard error and is
//! returned as [`EstimatorError`]. A run that simply fails to find a model is
//! not an error; it is reported through a [`Failure`] inside the run report.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("point sets differ in length: {a} vs {b}")]
    LengthMismatch { a: usize, b: usize },
    #[error("mask has {got} entries, expected {expected}")]
    MaskLength { expected: usize, got: usize },
    #[error("error buffer has {got} entries, expected {expected}")]
    ErrorBufferLength { expected: usize, got: usize },
    #[error("model buffer is {got_rows}x{got_cols}, expected {rows}x{cols}")]
    ModelShape {
        rows: usize,
        cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("confidence must lie in [0, 1], got {0}")]
    Confidence(f64),
    #[error("threshold must be finite and non-negative, got {0}")]
    Threshold(f64),
    #[error("estimation failed: {0}")]
    EstimationFailed(Failure),
}

/// Why a run produced no usable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Fewer correspondences than needed for one model.
    InsufficientData,
    /// No non-degenerate subset could be drawn on the first iteration.
    SamplingExhausted,
    /// The kernel never produced a usable candidate.
    NoValidModel,
    /// LMedS found a model but too few points agree with it.
    BelowQualityFloor,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Failure::InsufficientData => "not enough correspondences",
            Failure::SamplingExhausted => "could not draw a non-degenerate subset",
            Failure::NoValidModel => "no candidate model was found",
            Failure::BelowQualityFloor => "too few inliers for the best model",
        };
        f.write_str(msg)
    }
}
