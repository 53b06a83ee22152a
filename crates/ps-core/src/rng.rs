//! Deterministic simulation-level RNG.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `SimRng`, seeded from `SimConfig::seed` and passed
//! explicitly to the simulation builder.  Every random draw in the run (spawn
//! schedule sampling, spot choice) goes through it in tick order, so a given
//! seed reproduces a run end to end.  There is no ambient global generator.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

use crate::{CoreError, CoreResult};

/// Simulation-level RNG.
///
/// Used only in the single-threaded tick loop; parallel intent prediction
/// draws nothing from it.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Draw `n` samples from an exponential distribution with the given mean.
    pub fn exponential(&mut self, mean: f64, n: usize) -> CoreResult<Vec<f64>> {
        let exp = Exp::new(1.0 / mean)
            .map_err(|e| CoreError::Config(format!("invalid exponential mean {mean}: {e}")))?;
        Ok((0..n).map(|_| exp.sample(&mut self.0)).collect())
    }
}
