//! Pinned pseudo-random stream for graph generation.
//!
//! Graphs must replay bit-for-bit in any implementation, so the generator is
//! fixed to ChaCha20 with an explicit seed layout and explicit draw rules:
//!
//! - key: the 64-bit seed little-endian in bytes `0..8`, zeros in `8..32`
//! - state: 64-bit block counter from 0, stream id 0 (original djb layout)
//! - words: keystream state words as little-endian `u32`, in order
//! - `u64` draw: next two words, `lo | hi << 32`
//! - color draw: one word `x`, redrawn while `x == u32::MAX`, then `x % 3`
//! - unit draw: one `u64` `y`, value `(y >> 11) * 2^-53`

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Identifies the stream definition above. Bump when any draw rule changes.
pub const GRAPH_RNG_VERSION: &str = "chacha20-le64/v1";

/// Largest multiple of 3 that fits in `u32` arithmetic without bias.
const COLOR_ZONE: u32 = u32::MAX - (u32::MAX % 3);

const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

pub struct GraphRng {
    inner: ChaCha20Rng,
}

impl GraphRng {
    pub fn from_seed(seed: u64) -> Self {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            inner: ChaCha20Rng::from_seed(key),
        }
    }

    pub fn next_word(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Uniform color in `{0, 1, 2}`.
    pub fn next_color(&mut self) -> u8 {
        loop {
            let x = self.inner.next_u32();
            if x < COLOR_ZONE {
                return (x % 3) as u8;
            }
        }
    }

    /// Uniform real in `[0, 1)` with 53 bits of precision.
    pub fn next_unit(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * UNIT_SCALE
    }
}
