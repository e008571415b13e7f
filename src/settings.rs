//! Configuration types for the robust estimators.

use crate::error::EstimatorError;
use crate::types::{ModelSize, SubsetCheck};

/// Default cap on random draws when looking for one minimal subset.
pub const DEFAULT_SAMPLING_ATTEMPTS: usize = 300;

/// Construction parameters shared by the RANSAC and LMedS drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorSettings {
    /// Correspondences needed to fit one model.
    pub model_points: usize,
    /// Shape of a single model instance.
    pub model_size: ModelSize,
    /// Upper bound on models returned by one kernel call.
    pub max_basic_solutions: usize,
    /// Hard RANSAC iteration cap.
    pub max_iters: usize,
    /// Validate subsets point by point while sampling.
    pub check_partial_subsets: bool,
    /// Random draws allowed per minimal subset.
    pub max_sampling_attempts: usize,
}

impl EstimatorSettings {
    pub fn new(
        model_points: usize,
        model_size: ModelSize,
        max_basic_solutions: usize,
        max_iters: usize,
    ) -> Self {
        Self {
            model_points,
            model_size,
            max_basic_solutions,
            max_iters,
            check_partial_subsets: true,
            max_sampling_attempts: DEFAULT_SAMPLING_ATTEMPTS,
        }
    }

    pub fn with_check_partial_subsets(mut self, enabled: bool) -> Self {
        self.check_partial_subsets = enabled;
        self
    }

    pub fn with_max_sampling_attempts(mut self, attempts: usize) -> Self {
        self.max_sampling_attempts = attempts;
        self
    }

    pub fn subset_check(&self) -> SubsetCheck {
        if self.check_partial_subsets {
            SubsetCheck::Partial
        } else {
            SubsetCheck::Full
        }
    }

    pub fn validate(&self) -> Result<(), EstimatorError> {
        let positive = [
            ("model_points", self.model_points),
            ("model_size.rows", self.model_size.rows),
            ("model_size.cols", self.model_size.cols),
            ("max_basic_solutions", self.max_basic_solutions),
            ("max_iters", self.max_iters),
            ("max_sampling_attempts", self.max_sampling_attempts),
        ];
        match positive.iter().find(|(_, v)| *v == 0) {
            Some((name, _)) => Err(EstimatorError::NonPositive(name)),
            None => Ok(()),
        }
    }
}

/// Iteration cap for LMedS, optionally scaled with the data size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationCap {
    /// Fixed number of iterations.
    Absolute(usize),
    /// `m * N` iterations for `N` correspondences.
    PerPoint(usize),
    /// `N` iterations.
    OnePerPoint,
}

impl IterationCap {
    /// Signed convention: positive is absolute, negative scales with `N`, zero is `N`.
    pub fn from_signed(value: i64) -> Self {
        match value {
            v if v > 0 => IterationCap::Absolute(v as usize),
            v if v < 0 => IterationCap::PerPoint(v.unsigned_abs() as usize),
            _ => IterationCap::OnePerPoint,
        }
    }

    /// Reject caps that can only ever resolve to zero iterations.
    pub fn validate(&self) -> Result<(), EstimatorError> {
        match *self {
            IterationCap::Absolute(0) | IterationCap::PerPoint(0) => {
                Err(EstimatorError::NonPositive("cap"))
            }
            _ => Ok(()),
        }
    }

    pub fn resolve(&self, count: usize) -> usize {
        match *self {
            IterationCap::Absolute(n) => n,
            IterationCap::PerPoint(m) => m.saturating_mul(count),
            IterationCap::OnePerPoint => count,
        }
    }
}

impl From<i64> for IterationCap {
    fn from(value: i64) -> Self {
        IterationCap::from_signed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EstimatorSettings {
        EstimatorSettings::new(4, ModelSize::new(3, 3), 1, 2000)
    }

    #[test]
    fn defaults_enable_partial_checks() {
        let cfg = settings();
        assert!(cfg.check_partial_subsets);
        assert_eq!(cfg.max_sampling_attempts, 300);
        assert_eq!(cfg.subset_check(), SubsetCheck::Partial);
        assert_eq!(
            cfg.with_check_partial_subsets(false).subset_check(),
            SubsetCheck::Full
        );
    }

    #[test]
    fn validate_rejects_zero_parameters() {
        assert!(settings().validate().is_ok());

        let mut cfg = settings();
        cfg.model_points = 0;
        assert_eq!(
            cfg.validate(),
            Err(EstimatorError::NonPositive("model_points"))
        );

        let cfg = EstimatorSettings::new(4, ModelSize::new(3, 0), 1, 10);
        assert_eq!(
            cfg.validate(),
            Err(EstimatorError::NonPositive("model_size.cols"))
        );

        let cfg = settings().with_max_sampling_attempts(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn iteration_cap_follows_signed_convention() {
        assert_eq!(IterationCap::from_signed(50), IterationCap::Absolute(50));
        assert_eq!(IterationCap::from_signed(-3), IterationCap::PerPoint(3));
        assert_eq!(IterationCap::from_signed(0), IterationCap::OnePerPoint);

        assert_eq!(IterationCap::from(50).resolve(10), 50);
        assert_eq!(IterationCap::from(-3).resolve(10), 30);
        assert_eq!(IterationCap::from(0).resolve(10), 10);
    }

    #[test]
    fn zero_caps_fail_validation() {
        assert!(IterationCap::from_signed(5).validate().is_ok());
        assert!(IterationCap::from_signed(-1).validate().is_ok());
        assert!(IterationCap::OnePerPoint.validate().is_ok());
        assert_eq!(
            IterationCap::Absolute(0).validate(),
            Err(EstimatorError::NonPositive("cap"))
        );
        assert_eq!(
            IterationCap::PerPoint(0).validate(),
            Err(EstimatorError::NonPositive("cap"))
        );
    }
}
