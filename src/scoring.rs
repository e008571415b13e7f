//! Scoring primitives shared by the RANSAC and LMedS drivers.

/// Mark every error at most `threshold²` as an inlier and count them.
///
/// `errors` and `mask` must have the same length.
pub fn count_inliers(errors: &[f64], mask: &mut [bool], threshold: f64) -> usize {
    debug_assert_eq!(errors.len(), mask.len());
    let threshold_sq = threshold * threshold;
    let mut count = 0;
    for (e, m) in errors.iter().zip(mask.iter_mut()) {
        *m = *e <= threshold_sq;
        count += usize::from(*m);
    }
    count
}

/// Median of `errors`, sorting them in place. Even lengths average the two
/// central elements. Returns `None` for an empty slice.
pub fn median(errors: &mut [f64]) -> Option<f64> {
    let n = errors.len();
    if n == 0 {
        return None;
    }
    errors.sort_unstable_by(f64::total_cmp);
    let mid = n / 2;
    if n % 2 == 1 {
        Some(errors[mid])
    } else {
        Some((errors[mid - 1] + errors[mid]) * 0.5)
    }
}

/// Smallest inlier threshold LMedS will use.
pub const MIN_SIGMA: f64 = 0.001;

/// Robust noise scale derived from the least median of squared errors.
///
/// `1.4826` turns a median into a standard deviation for Gaussian noise,
/// `1 + 5 / (n - p)` corrects for small samples and `2.5` widens the band to
/// a typical inlier threshold.
pub fn robust_sigma(min_median: f64, count: usize, model_points: usize) -> f64 {
    let spare = count.saturating_sub(model_points).max(1) as f64;
    let sigma = 2.5 * 1.4826 * (1.0 + 5.0 / spare) * min_median.sqrt();
    if sigma.is_nan() {
        MIN_SIGMA
    } else {
        sigma.max(MIN_SIGMA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_against_squared_threshold() {
        let errors = [0.01, 0.16, 0.36, 1.0, 0.09];
        let mut mask = [false; 5];
        let n = count_inliers(&errors, &mut mask, 0.5);
        assert_eq!(n, 3);
        assert_eq!(mask, [true, true, false, false, true]);
    }

    #[test]
    fn count_matches_mask_and_is_idempotent() {
        let errors: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin().abs()).collect();
        let mut first = vec![false; errors.len()];
        let mut second = vec![true; errors.len()];
        let n1 = count_inliers(&errors, &mut first, 0.8);
        let n2 = count_inliers(&errors, &mut second, 0.8);
        assert_eq!(n1, n2);
        assert_eq!(first, second);
        assert_eq!(n1, first.iter().filter(|&&m| m).count());
    }

    #[test]
    fn threshold_is_inclusive() {
        let errors = [4.0];
        let mut mask = [false];
        assert_eq!(count_inliers(&errors, &mut mask, 2.0), 1);
    }

    #[test]
    fn median_of_odd_and_even_lengths() {
        let mut odd = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(median(&mut odd), Some(3.0));
        assert_eq!(odd[2], 3.0);

        let mut even = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut even), Some(2.5));

        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn sigma_follows_small_sample_correction() {
        let s = robust_sigma(4.0, 14, 4);
        assert_relative_eq!(s, 2.5 * 1.4826 * 1.5 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn sigma_never_collapses_to_zero() {
        assert_eq!(robust_sigma(0.0, 100, 4), MIN_SIGMA);
        assert_eq!(robust_sigma(0.0, 4, 4), MIN_SIGMA);
    }
}
