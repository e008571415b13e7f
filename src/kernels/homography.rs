//! Four-point homography kernel.

use nalgebra::{DMatrix, DVector, Matrix3};

use crate::core::ModelKernel;
use crate::settings::EstimatorSettings;
use crate::types::{DataMatrix, ModelSize, Point};
use crate::utils::gauss_elimination;

/// Fits `b ~ H a` from four correspondences by fixing `h33 = 1` and solving
/// the resulting 8x8 linear system.
///
/// The reprojection error is the squared distance between `b` and the
/// projection of `a`.
#[derive(Debug, Clone, Copy)]
pub struct HomographyKernel {
    min_det: f64,
    max_det: f64,
}

impl Default for HomographyKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl HomographyKernel {
    pub const MODEL_POINTS: usize = 4;
    pub const MODEL_SIZE: ModelSize = ModelSize::new(3, 3);

    pub fn new() -> Self {
        Self {
            min_det: 1e-4,
            max_det: 1e4,
        }
    }

    /// Settings matching this kernel's sample and model shape.
    pub fn settings(max_iters: usize) -> EstimatorSettings {
        EstimatorSettings::new(Self::MODEL_POINTS, Self::MODEL_SIZE, 1, max_iters)
    }

    fn solve(&self, a: &[Point], b: &[Point]) -> Option<DVector<f64>> {
        let mut augmented = DMatrix::<f64>::zeros(8, 9);
        for (i, (p, q)) in a.iter().zip(b).take(Self::MODEL_POINTS).enumerate() {
            let (r0, r1) = (2 * i, 2 * i + 1);

            augmented[(r0, 0)] = p.x;
            augmented[(r0, 1)] = p.y;
            augmented[(r0, 2)] = 1.0;
            augmented[(r0, 6)] = -q.x * p.x;
            augmented[(r0, 7)] = -q.x * p.y;
            augmented[(r0, 8)] = q.x;

            augmented[(r1, 3)] = p.x;
            augmented[(r1, 4)] = p.y;
            augmented[(r1, 5)] = 1.0;
            augmented[(r1, 6)] = -q.y * p.x;
            augmented[(r1, 7)] = -q.y * p.y;
            augmented[(r1, 8)] = q.y;
        }

        let mut h = DVector::<f64>::zeros(8);
        if !gauss_elimination(&mut augmented, &mut h) || h.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(h)
    }
}

impl ModelKernel for HomographyKernel {
    fn fit_models(&self, subset_a: &[Point], subset_b: &[Point], models: &mut DataMatrix) -> usize {
        if subset_a.len() < Self::MODEL_POINTS || subset_b.len() < Self::MODEL_POINTS {
            return 0;
        }
        let Some(h) = self.solve(subset_a, subset_b) else {
            return 0;
        };

        let hm = Matrix3::from_fn(|r, c| if r == 2 && c == 2 { 1.0 } else { h[3 * r + c] });
        let det = hm.determinant().abs();
        if det <= self.min_det || det >= self.max_det {
            return 0;
        }

        for r in 0..3 {
            for c in 0..3 {
                models[(r, c)] = hm[(r, c)];
            }
        }
        1
    }

    fn compute_reprojection_error(
        &self,
        points_a: &[Point],
        points_b: &[Point],
        model: &DataMatrix,
        errors: &mut [f64],
    ) {
        let h = |r: usize, c: usize| model[(r, c)];
        for ((p, q), e) in points_a.iter().zip(points_b).zip(errors.iter_mut()) {
            let w = h(2, 0) * p.x + h(2, 1) * p.y + h(2, 2);
            if w.abs() < f64::EPSILON {
                *e = f64::MAX;
                continue;
            }
            let x = (h(0, 0) * p.x + h(0, 1) * p.y + h(0, 2)) / w;
            let y = (h(1, 0) * p.x + h(1, 1) * p.y + h(1, 2)) / w;
            let (dx, dy) = (q.x - x, q.y - y);
            *e = dx * dx + dy * dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Homography;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ]
    }

    #[test]
    fn recovers_simple_translation() {
        let a = square();
        let b: Vec<Point> = a.iter().map(|p| Point::new(p.x + 1.0, p.y + 2.0)).collect();
        let kernel = HomographyKernel::new();
        let mut models = HomographyKernel::MODEL_SIZE.buffer(1);

        assert_eq!(kernel.fit_models(&a, &b, &mut models), 1);
        let expected = Matrix3::new(1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 1.0);
        for r in 0..3 {
            for c in 0..3 {
                assert_relative_eq!(models[(r, c)], expected[(r, c)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn recovers_projective_map() {
        let truth = Homography::new(Matrix3::new(1.2, 0.1, 5.0, -0.2, 0.9, 3.0, 1e-3, 2e-3, 1.0));
        let a = vec![
            Point::new(10.0, 20.0),
            Point::new(200.0, 15.0),
            Point::new(30.0, 180.0),
            Point::new(220.0, 210.0),
        ];
        let b: Vec<Point> = a.iter().map(|p| truth.transform_point(p).unwrap()).collect();
        let kernel = HomographyKernel::new();
        let mut models = HomographyKernel::MODEL_SIZE.buffer(1);

        assert_eq!(kernel.fit_models(&a, &b, &mut models), 1);
        let mut errors = vec![f64::NAN; 4];
        kernel.compute_reprojection_error(&a, &b, &models, &mut errors);
        assert!(errors.iter().all(|&e| e < 1e-12));
    }

    #[test]
    fn reprojection_error_is_squared_distance() {
        let a = vec![Point::new(1.0, 1.0)];
        let b = vec![Point::new(4.0, 5.0)];
        let identity = DataMatrix::identity(3, 3);
        let mut errors = [0.0];
        HomographyKernel::new().compute_reprojection_error(&a, &b, &identity, &mut errors);
        assert_relative_eq!(errors[0], 25.0);
    }

    #[test]
    fn degenerate_configuration_gives_no_model() {
        let a = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        let kernel = HomographyKernel::new();
        let mut models = HomographyKernel::MODEL_SIZE.buffer(1);
        assert_eq!(kernel.fit_models(&a, &a, &mut models), 0);
        assert!(!kernel.is_subset_acceptable(&a, 3, crate::types::SubsetCheck::Full));
    }
}
