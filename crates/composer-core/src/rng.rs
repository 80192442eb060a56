//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Explicit random source threaded through every synthesis request.
///
/// The handle wraps `StdRng` and remembers the seed it was created from so
/// reports can record it. Independent requests must use independent handles;
/// substreams are derived with [`derive_substream_seed`].
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
    seed: u64,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the handle for substream `index` of `master_seed`.
    pub fn substream(master_seed: u64, index: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, index))
    }

    /// Seed the handle was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Returns `true` with probability `p`; values outside `[0, 1]` are clamped.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        self.rng.gen_bool(p.min(1.0))
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
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

/// Derives the deterministic seed for a specific substream.
///
/// SipHash-1-3 with zero keys over `(master_seed, substream)`; stable across
/// platforms.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
