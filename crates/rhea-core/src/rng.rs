//! Seedable randomness for searches that must replay bit-for-bit.
//!
//! Not cryptographic.

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform `f32` in `[0, 1)` built from the top 24 bits of a draw.
    fn next_f32_unit(&mut self) -> f32 {
        let bits = (self.next_u64() >> 40) as u32;
        bits as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in `0..bound`. Panics on an empty range.
    fn next_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "next_below requires a non-empty range");
        let draw = self.next_u64() >> 32;
        ((draw * bound as u64) >> 32) as usize
    }

    /// `true` with probability `p`; `p` outside `[0, 1]` saturates.
    fn chance(&mut self, p: f32) -> bool {
        match p {
            p if p <= 0.0 => false,
            p if p >= 1.0 => true,
            p => self.next_f32_unit() < p,
        }
    }
}

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 generator. Copyable, so a search state can be snapshotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }
}

/// SplitMix64 finalizer.
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for one `(agent, stream)` pair under a shared run seed.
pub fn derive_seed(run_seed: u64, agent_id: u64, stream: u64) -> u64 {
    let salt = mix64(agent_id.wrapping_add(GOLDEN_GAMMA)) ^ mix64(stream.rotate_left(17));
    mix64(run_seed ^ salt)
}
