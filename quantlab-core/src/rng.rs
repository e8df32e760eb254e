//! Deterministic RNG seed derivation.
//!
//! A master seed is expanded into per-(label, iteration) sub-seeds via BLAKE3
//! hashing. Because derivation is hash-based rather than order-dependent, the
//! same master seed produces identical sub-seeds no matter which order — or
//! on which thread — iterations are processed. The bootstrap leans on this to
//! stay reproducible while fanning resamples out across a thread pool.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Order-independent seed hierarchy rooted at one master seed.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for `(label, iteration)`.
    pub fn sub_seed(&self, label: &str, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// Seeded `StdRng` for `(label, iteration)`.
    pub fn rng_for(&self, label: &str, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, iteration))
    }
}
