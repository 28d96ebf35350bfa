use crate::{rng, AgentId, SplitMix64};

/// Per-decision context handed down by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    pub tick: u64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, seed: u64) -> Self {
        Self { tick, seed }
    }

    /// RNG for one agent and one purpose on this tick.
    ///
    /// The same `(seed, tick, agent, stream)` always yields the same sequence.
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ rng::mix64(self.tick), agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
