//! Uniform random sampler drawing minimal subsets without replacement.

use log::trace;

use crate::core::ModelKernel;
use crate::samplers::MinimalSubset;
use crate::types::{Point, SubsetCheck};
use crate::utils::UniformRandomGenerator;

/// Draws distinct correspondence indices uniformly and rejects degenerate
/// subsets through the kernel's subset check.
///
/// Every rejected subset (or rejected point, in partial mode) costs one
/// attempt; the attempt budget is shared by all slots of one subset.
#[derive(Debug, Clone)]
pub struct UniformSubsetSampler {
    rng: UniformRandomGenerator,
    mode: SubsetCheck,
    max_attempts: usize,
}

impl UniformSubsetSampler {
    pub fn new(rng: UniformRandomGenerator, mode: SubsetCheck, max_attempts: usize) -> Self {
        Self {
            rng,
            mode,
            max_attempts,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    pub fn mode(&self) -> SubsetCheck {
        self.mode
    }

    /// Fill `subset` with `subset.len()` distinct correspondences.
    ///
    /// Returns `false` when the attempt budget runs out before a
    /// non-degenerate subset is found. Needs more correspondences than the
    /// subset size.
    pub fn sample<K: ModelKernel + ?Sized>(
        &mut self,
        kernel: &K,
        points_a: &[Point],
        points_b: &[Point],
        subset: &mut MinimalSubset,
    ) -> bool {
        let count = points_a.len().min(points_b.len());
        let size = subset.len();
        if size == 0 || count <= size {
            return false;
        }

        let mut attempts = 0;
        let mut filled = 0;
        while attempts < self.max_attempts {
            filled = 0;
            while filled < size && attempts < self.max_attempts {
                let index = self.rng.index(count);
                if subset.indices[..filled].contains(&index) {
                    continue;
                }
                subset.set(filled, index, points_a, points_b);

                if self.mode == SubsetCheck::Partial
                    && !acceptable(kernel, subset, filled + 1, SubsetCheck::Partial)
                {
                    attempts += 1;
                    continue;
                }
                filled += 1;
            }

            if self.mode == SubsetCheck::Full
                && filled == size
                && !acceptable(kernel, subset, size, SubsetCheck::Full)
            {
                attempts += 1;
                continue;
            }
            break;
        }

        let found = filled == size && attempts < self.max_attempts;
        if !found {
            trace!("subset sampling gave up after {attempts} attempts");
        }
        found
    }
}

fn acceptable<K: ModelKernel + ?Sized>(
    kernel: &K,
    subset: &MinimalSubset,
    count: usize,
    mode: SubsetCheck,
) -> bool {
    kernel.is_subset_acceptable(&subset.a, count, mode)
        && kernel.is_subset_acceptable(&subset.b, count, mode)
}
