//! Deterministic random number generation.
//!
//! RULE: Nothing in the shuffler may call any platform RNG directly.
//! All randomness for one attempt flows through a single ShuffleRng
//! seeded at attempt start. This covers:
//!   - the two marker slot draws made by the supply,
//!   - the candidate ordering of both loading passes.
//!
//! Same seed + same card table = same supply.

use rand::{seq::SliceRandom, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct ShuffleRng {
    seed:  u64,
    inner: Pcg64Mcg,
}

impl ShuffleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG. Only callers outside the core use this;
    /// the seed is kept so the attempt can be replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform 1-indexed slot in [1, n]. Returns 0 when n is 0,
    /// which never matches an admission position.
    pub fn slot(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.next_u64_below(n as u64) as usize + 1
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
