use xxhash_rust::xxh3::xxh3_64_with_seed;

const KEY_HASH_SEED: u64 = 0x5eed_0d07_1a7e_c0de;

/// Hash a string key down to a 32-bit seed.
///
/// Stable across runs and platforms: `xxh3` over the UTF-8 bytes, folded to 32 bits.
pub fn seed_from_key(key: &str) -> u32 {
    let h = xxh3_64_with_seed(key.as_bytes(), KEY_HASH_SEED);
    ((h >> 32) as u32) ^ (h as u32)
}

/// Small deterministic generator (Mulberry32) producing `f64` values in `[0, 1)`.
///
/// Every sampler takes one of these by `&mut`, so identical keys reproduce identical point sets.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create from a raw 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create from a string identity such as a scene id or cache key.
    pub fn from_key(key: &str) -> Self {
        Self::new(seed_from_key(key))
    }

    /// Next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Derive an independent stream for a labelled sub-task.
    pub fn fork(&mut self, label: &str) -> Self {
        let salt = seed_from_key(label);
        Self::new(self.next_u32() ^ salt)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
