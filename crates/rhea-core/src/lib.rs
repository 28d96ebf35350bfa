//! Deterministic, engine-agnostic kernel primitives for forward-model game agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod game;
pub mod policy;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::AgentId;
pub use game::{Direction, Ghost, GhostMap, GhostMoves, NodeId, TickEvents};
pub use policy::Policy;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{BeliefState, ForwardModel, GhostPlacement};
