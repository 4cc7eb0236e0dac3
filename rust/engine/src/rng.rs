//! Randomness sources for shuffling.
//!
//! The engine never picks a source itself: callers hand one in, so hand replay and
//! tests can use [`SeededRandom`] while live tables use [`SecureRandom`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A uniform random source producing values in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Returns a permuted copy of `items`, leaving the input untouched.
    fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T>
    where
        Self: Sized,
    {
        fisher_yates(self, items)
    }
}

/// Fisher-Yates over a copy of `items`.
///
/// Walks from the last index down to 1 and swaps position `i` with
/// `j = floor(next_f64() * (i + 1))`. Pinning this index derivation keeps seeded
/// shuffles reproducible across versions of the engine.
pub fn fisher_yates<T: Clone>(rng: &mut dyn RandomSource, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = ((rng.next_f64() * (i + 1) as f64) as usize).min(i);
        out.swap(i, j);
    }
    out
}

/// Deterministic ChaCha20 stream: identical seeds yield identical shuffles.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// ChaCha20 keyed from the operating system's entropy source.
#[derive(Debug, Clone)]
pub struct SecureRandom {
    rng: ChaCha20Rng,
}

impl SecureRandom {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_os_rng(),
        }
    }
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SecureRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
