//! Deterministic sampling RNG.
//!
//! # Determinism strategy
//!
//! Every unit of sampling work (one zone, one province target) gets its own
//! independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (unit_offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.  Zones
//! never share RNG state, so the points drawn for a zone do not depend on
//! which worker thread sampled it or in what order districts finished.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::ZoneId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-unit deterministic RNG; each worker owns its own.
pub struct SampleRng(SmallRng);

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        SampleRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from the run's seed and an arbitrary unit offset.
    pub fn for_unit(run_seed: u64, offset: u64) -> Self {
        SampleRng::new(run_seed ^ offset.wrapping_mul(MIXING_CONSTANT))
    }

    /// Seed from the run's seed and a zone ID.
    pub fn for_zone(run_seed: u64, zone: ZoneId) -> Self {
        SampleRng::for_unit(run_seed, zone.0 as u64)
    }

    /// Draw `min(amount, len)` distinct indices from `0..len`, uniformly.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }

    /// Draw `min(amount, items.len())` distinct elements, uniformly, without
    /// replacement.
    pub fn sample_without_replacement<T: Copy>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        self.sample_indices(items.len(), amount)
            .into_iter()
            .map(|i| items[i])
            .collect()
    }
}
