use core::fmt::Debug;

/// Host-side handle for a controlled agent.
///
/// Only the numeric id matters to the planner: it salts the per-tick RNG
/// streams so controllers sharing a seed still search independently.
pub trait AgentId: Copy + Debug {
    fn stable_id(self) -> u64;
}

macro_rules! unsigned_agent_id {
    ($($ty:ty),*) => {
        $(impl AgentId for $ty {
            fn stable_id(self) -> u64 {
                self as u64
            }
        })*
    };
}

unsigned_agent_id!(u8, u16, u32, u64, usize);
