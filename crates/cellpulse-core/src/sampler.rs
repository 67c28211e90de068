//! Status sampling for the simulator.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// Three "up" entries and one "down": P(up) = 0.75.
const CHOICES: [bool; 4] = [true, true, true, false];

/// Source of up/down evaluations. `true` means up.
pub trait StatusSampler: Send {
    fn sample(&mut self, app: &str) -> bool;
}

/// Uniform choice over [`CHOICES`].
pub struct WeightedSampler {
    rng: StdRng,
}

impl WeightedSampler {
    /// Seeded from the OS.
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Deterministic sequence, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for WeightedSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSampler for WeightedSampler {
    fn sample(&mut self, _app: &str) -> bool {
        CHOICES.choose(&mut self.rng).copied().unwrap_or(true)
    }
}
