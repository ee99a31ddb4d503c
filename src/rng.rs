//! Seedable random source for level generation.
//!
//! Uses a seeded ChaCha RNG so a seed and a configuration always produce the
//! same level.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random number generator threaded through one generation run.
#[derive(Debug, Clone)]
pub struct LevelRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl LevelRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for LevelRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
