//! Collinearity test used to reject degenerate minimal subsets.

use crate::types::{Point, SubsetCheck};

/// Check that the first `count` points contain no point lying on a line
/// through two points before it.
///
/// In [`SubsetCheck::Partial`] mode only the last of the `count` points is
/// tested, which assumes the earlier ones were accepted already. In
/// [`SubsetCheck::Full`] mode every point is tested.
///
/// The tolerance is relative to the magnitude of the difference vectors, so
/// the result does not depend on the scale of the coordinates.
pub fn check_subset(points: &[Point], count: usize, mode: SubsetCheck) -> bool {
    let count = count.min(points.len());
    if count < 3 {
        return true;
    }
    let last = count - 1;
    let first = match mode {
        SubsetCheck::Partial => last,
        SubsetCheck::Full => 0,
    };

    (first..=last).all(|i| !lies_on_earlier_line(&points[..=i]))
}

/// Whether the last point of `points` is collinear with any two others.
fn lies_on_earlier_line(points: &[Point]) -> bool {
    let Some((p, earlier)) = points.split_last() else {
        return false;
    };
    let eps = f64::from(f32::EPSILON);

    for (j, pj) in earlier.iter().enumerate() {
        let d1 = pj - p;
        for pk in &earlier[..j] {
            let d2 = pk - p;
            let cross = d2.x * d1.y - d2.y * d1.x;
            let scale = d1.x.abs() + d1.y.abs() + d2.x.abs() + d2.y.abs();
            if cross.abs() <= eps * scale {
                return true;
            }
        }
    }
    false
}
