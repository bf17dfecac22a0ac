//! Seeded randomness.
//!
//! Seeds are hashed with 32-bit FNV-1a and fed into mulberry32. Both are pinned bit for bit
//! so that a seed string reproduces the same board everywhere it is played.

use alloc::{format, string::String};
use rand::Rng;

use crate::*;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;
const U32_RANGE: f64 = 4_294_967_296.0;

/// FNV-1a over the UTF-16 code units of `seed`.
///
/// For ASCII seeds this is the same as hashing the bytes. For any other seed it is not: an
/// implementation that hashes the UTF-8 bytes will mine different boards for the same seed.
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Mulberry32 generator keyed by a string seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self::from_hash(hash_seed(seed))
    }

    pub const fn from_hash(hash: u32) -> Self {
        Self { state: hash }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Uniform integer in `[0, max_exclusive)`, computed as `floor(next_f64() * max_exclusive)`.
    pub fn next_int(&mut self, max_exclusive: usize) -> Result<usize> {
        if max_exclusive == 0 {
            return Err(ArgumentError::NonPositiveBound(max_exclusive).into());
        }
        Ok(self.below(max_exclusive))
    }

    /// Fisher-Yates, walking from the last element down to index 1.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    fn below(&mut self, bound: usize) -> usize {
        // truncation is floor for non-negative values
        (self.next_f64() * bound as f64) as usize
    }
}

/// Fresh 16 hex digit seed drawn from the host's entropy source.
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:08x}{:08x}", rng.random::<u32>(), rng.random::<u32>())
}

/// Murmur3-style finalizer, used for stable per-cell variation.
pub const fn hash_u32(n: u32) -> u32 {
    let mut x = n;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

pub fn u32_to_unit(x: u32) -> f64 {
    f64::from(x) / U32_RANGE
}
