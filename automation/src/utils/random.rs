//! Shuffling and sampling primitives used to pick a bounded random subset of
//! active upkeeps per round.
//!
//! Two operating modes are supported through [`RandomSource`]: a seeded,
//! reproducible source for deterministic tests and a cryptographically strong
//! source for production. A keyed shuffle lets independent nodes reproduce the
//! same permutation from a shared key without sharing generator state.

use rand::rngs::{OsRng, StdRng};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::Ratio;

/// A random number generator that can be reseeded.
pub trait RandomSource: RngCore + Send {
    fn reseed(&mut self, seed: u64);
}

/// Deterministic source for tests and simulations.
#[derive(Debug, Clone)]
pub struct SeededSource(StdRng);

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngCore for SeededSource {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl RandomSource for SeededSource {
    fn reseed(&mut self, seed: u64) {
        self.0 = StdRng::seed_from_u64(seed);
    }
}

/// Operating system entropy.
///
/// Failing to read entropy panics: sampling must never continue on degraded
/// randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoSource;

impl RngCore for CryptoSource {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        OsRng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = OsRng.try_fill_bytes(dest) {
            panic!("failed to read entropy from the operating system: {}", e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl RandomSource for CryptoSource {
    fn reseed(&mut self, _seed: u64) {
        panic!("a cryptographic random source cannot be reseeded");
    }
}

/// Uniform shuffler over a caller-supplied source. Every call advances the
/// source, so repeated calls on one instance yield different permutations.
#[derive(Debug, Clone)]
pub struct Shuffler<S: RandomSource> {
    source: S,
}

impl<S: RandomSource> Shuffler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn shuffle<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        items.shuffle(&mut self.source);
        items
    }

    pub fn reseed(&mut self, seed: u64) {
        self.source.reseed(seed);
    }
}

impl Shuffler<SeededSource> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededSource::new(seed))
    }
}

impl Shuffler<CryptoSource> {
    pub fn crypto() -> Self {
        Self::new(CryptoSource)
    }
}

/// Shuffle whose permutation is fully determined by `key`.
///
/// The generator (ChaCha8, zero stream) and the Fisher-Yates walk are fixed
/// here rather than taken from `rand`'s defaults, so every build maps a key to
/// the same permutation.
pub fn shuffle_keyed<T>(mut items: Vec<T>, key: [u8; 32]) -> Vec<T> {
    let mut rng = ChaCha8Rng::from_seed(key);
    for i in (1..items.len()).rev() {
        let j = uniform_below(&mut rng, i as u64 + 1) as usize;
        items.swap(i, j);
    }
    items
}

/// Unbiased draw from `0..bound` by rejecting the tail of the `u64` range.
fn uniform_below(rng: &mut ChaCha8Rng, bound: u64) -> u64 {
    let zone = u64::MAX - u64::MAX % bound;
    loop {
        let value = rng.next_u64();
        if value < zone {
            return value % bound;
        }
    }
}

/// Number of items to sample out of `available`: the rounded ratio share,
/// never more than `available` nor `max_sampled`.
pub fn sample_size(ratio: Ratio, available: usize, max_sampled: usize) -> usize {
    ratio.of(available).min(available).min(max_sampled)
}
