// Path: crates/test_utils/src/randomness/mod.rs
//! Deterministic randomness for reproducible tests

use alloy_primitives::Address;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Deterministic random number generator for tests
pub struct TestRng {
    rng: StdRng,
}

impl TestRng {
    /// Create a new test RNG with the specified seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A random validator identity
    pub fn address(&mut self) -> Address {
        let mut bytes = [0u8; 20];
        self.rng.fill_bytes(&mut bytes);
        Address::from(bytes)
    }

    /// `count` distinct random identities
    pub fn addresses(&mut self, count: usize) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::with_capacity(count);
        while out.len() < count {
            let candidate = self.address();
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }

    /// A random value in `[0, bound)`
    pub fn below(&mut self, bound: u64) -> u64 {
        self.rng.gen_range(0..bound)
    }

    /// Generate a random value
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::new(12345)
    }
}
