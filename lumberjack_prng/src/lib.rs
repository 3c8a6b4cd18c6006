// Seedable pseudo-random number generator for Lumberjack.
//
// A small xoshiro256++ generator seeded through SplitMix64. The harvest
// planner itself is fully deterministic and never draws random numbers; this
// crate exists for the tooling around it: scenario generation (tree heights,
// leaf canopies) in `lumberjack_ai::tree_gen` and the randomized set-algebra
// tests over `BlockSet`.
//
// Keeping the generator in-tree means a given seed always reproduces the same
// forest, on every platform, so a failing scenario can be replayed from its
// seed alone.
//
// **Critical constraint: reproducibility.** Output depends only on the seed
// and the sequence of calls. No floating point in the core step, no OS
// entropy, no global state.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    s: [u64; 4],
}

impl GameRng {
    /// Create a generator from a `u64` seed, expanded to 256 bits of state
    /// with SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform `f64` in [0, 1) built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)`, without modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform signed integer in `[low, high)`. Used for voxel offsets.
    ///
    /// Panics if `low >= high`.
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        assert!(low < high, "range_i32: low must be less than high");
        let span = (high as i64 - low as i64) as u64;
        (low as i64 + self.range_u64(0, span) as i64) as i32
    }

    /// `true` with probability `p`. `p <= 0` never fires, `p >= 1` always does.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// SplitMix64 step, only used to expand the seed.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
