//! Miscellaneous utilities shared across the estimators.
//!
//! Holds the seedable random generator owned by every estimator instance and a
//! small dense solver used by the reference kernels.

use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::{DMatrix, DVector};
use rand::distributions::Uniform;
use rand::prelude::*;

/// Seedable uniform index generator.
///
/// The generator is owned by one estimator and is not synchronized; share an
/// estimator between threads only behind external locking.
#[derive(Debug, Clone)]
pub struct UniformRandomGenerator {
    rng: StdRng,
}

impl Default for UniformRandomGenerator {
    fn default() -> Self {
        Self::from_wall_clock()
    }
}

impl UniformRandomGenerator {
    /// Seed from the current wall-clock time in microseconds, so generators
    /// created within the same second still differ.
    pub fn from_wall_clock() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_micros() as u64);
        Self::from_seed(micros)
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Draw an index uniformly from `[0, count)`. `count` must be positive.
    pub fn index(&mut self, count: usize) -> usize {
        self.rng.sample(Uniform::new(0, count))
    }
}

/// Gaussian elimination with partial pivoting on an augmented `[A | b]` system.
///
/// `A` must be square; the solution is written into `result`. Returns `false`
/// for mismatched shapes or a (numerically) singular `A`.
pub fn gauss_elimination(augmented: &mut DMatrix<f64>, result: &mut DVector<f64>) -> bool {
    let n = augmented.nrows();
    if augmented.ncols() != n + 1 || result.len() != n {
        return false;
    }

    for i in 0..n {
        let pivot = (i..n)
            .max_by(|&r, &s| augmented[(r, i)].abs().total_cmp(&augmented[(s, i)].abs()))
            .unwrap_or(i);
        if pivot != i {
            augmented.swap_rows(i, pivot);
        }

        let diag = augmented[(i, i)];
        if diag.abs() < 1e-10 {
            return false;
        }

        for k in (i + 1)..n {
            let factor = augmented[(k, i)] / diag;
            if factor == 0.0 {
                continue;
            }
            for j in i..=n {
                augmented[(k, j)] -= factor * augmented[(i, j)];
            }
        }
    }

    for i in (0..n).rev() {
        let mut acc = augmented[(i, n)];
        for j in (i + 1)..n {
            acc -= augmented[(i, j)] * result[j];
        }
        result[i] = acc / augmented[(i, i)];
    }

    true
}
