//! Iteration budgets for the sampling loops.
//!
//! RANSAC shrinks its budget each time a better model shows up, using
//! `N = log(1 - p) / log(1 - (1 - ep)^k)` for confidence `p`, outlier ratio
//! `ep` and `k` points per sample. LMedS computes the same formula once for a
//! fixed outlier ratio.

use crate::error::EstimatorError;

/// Outlier ratio LMedS is designed to tolerate.
pub const LMEDS_OUTLIER_RATIO: f64 = 0.45;

/// Smallest number of LMedS trials.
pub const LMEDS_MIN_ITERS: usize = 3;

/// Trials needed to draw an outlier-free sample with confidence `p` when a
/// fraction `ep` of the data are outliers.
///
/// Both probabilities are clamped to `[0, 1]`. The result never exceeds
/// `max_iters`; it is zero when an outlier-free sample is already certain.
pub fn update_num_iters(
    p: f64,
    ep: f64,
    model_points: usize,
    max_iters: usize,
) -> Result<usize, EstimatorError> {
    if model_points == 0 {
        return Err(EstimatorError::NonPositive("model_points"));
    }
    let p = p.clamp(0.0, 1.0);
    let ep = ep.clamp(0.0, 1.0);

    let num = (1.0 - p).max(f64::MIN_POSITIVE).ln();
    let denom = 1.0 - (1.0 - ep).powi(exponent(model_points));
    if denom < f64::MIN_POSITIVE {
        return Ok(0);
    }
    let denom = denom.ln();

    if denom >= 0.0 || -num >= max_iters as f64 * -denom {
        Ok(max_iters)
    } else {
        Ok((num / denom).round() as usize)
    }
}

/// Fixed LMedS trial count for `confidence`, clamped to
/// `[LMEDS_MIN_ITERS, max_iters]`.
pub fn lmeds_num_iters(confidence: f64, model_points: usize, max_iters: usize) -> usize {
    let num = (1.0 - confidence).max(f64::MIN_POSITIVE).ln();
    let denom = (1.0 - (1.0 - LMEDS_OUTLIER_RATIO).powi(exponent(model_points))).ln();
    let raw = (num / denom).round();
    // NaN and negative values saturate to zero, infinity to usize::MAX.
    (raw as usize).max(LMEDS_MIN_ITERS).min(max_iters)
}

fn exponent(model_points: usize) -> i32 {
    i32::try_from(model_points).unwrap_or(i32::MAX)
}
