//! Typed geometric models built from estimator output.

use nalgebra::{Matrix3, Vector3};

use crate::types::{DataMatrix, Point};

/// Planar projective transformation represented by a 3x3 matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    /// Read a homography from a 3x3 model buffer.
    pub fn from_data_matrix(m: &DataMatrix) -> Option<Self> {
        if m.nrows() != 3 || m.ncols() != 3 {
            return None;
        }
        Some(Self::new(Matrix3::from_fn(|r, c| m[(r, c)])))
    }

    pub fn to_data_matrix(&self) -> DataMatrix {
        DataMatrix::from_fn(3, 3, |r, c| self.h[(r, c)])
    }

    /// Map `p` through the homography; `None` when it lands at infinity.
    pub fn transform_point(&self, p: &Point) -> Option<Point> {
        let q = self.h * Vector3::new(p.x, p.y, 1.0);
        if q.z.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(q.x / q.z, q.y / q.z))
    }

    /// Scale so that `h[(2, 2)] == 1`, when possible.
    pub fn normalized(&self) -> Self {
        let s = self.h[(2, 2)];
        if s.abs() < f64::EPSILON {
            self.clone()
        } else {
            Self::new(self.h / s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trips_through_model_buffer() {
        let h = Homography::new(Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0));
        let m = h.to_data_matrix();
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(2, 0)], 7.0);
        assert_eq!(Homography::from_data_matrix(&m), Some(h));
        assert_eq!(Homography::from_data_matrix(&DataMatrix::zeros(2, 3)), None);
    }

    #[test]
    fn transforms_points_projectively() {
        let h = Homography::new(Matrix3::new(2.0, 0.0, 1.0, 0.0, 2.0, -1.0, 0.0, 0.0, 2.0));
        let p = h.transform_point(&Point::new(3.0, 4.0)).unwrap();
        assert_relative_eq!(p.x, 3.5);
        assert_relative_eq!(p.y, 3.5);

        let n = h.normalized();
        assert_relative_eq!(n.h[(2, 2)], 1.0);
        assert_relative_eq!(n.h[(0, 0)], 1.0);

        let at_infinity =
            Homography::new(Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0));
        assert_eq!(at_infinity.transform_point(&Point::new(0.0, 5.0)), None);
    }
}
