//! Rolling-horizon evolutionary planning for forward-model game agents.
//!
//! [`RollingHorizonSearch`] evolves fixed-length plans of macro-actions against
//! clones of a [`ForwardModel`](rhea_core::ForwardModel) within a wall-clock
//! budget. [`RollingHorizonController`] wraps it behind the per-tick
//! [`Policy`](rhea_core::Policy) interface, executes the committed plan one
//! macro-action at a time and replans only when the world invalidates it.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod belief;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod opponents;
pub mod plan;
pub mod population;
pub mod report;
pub mod search;

pub use belief::{GhostBelief, GhostSighting, LastSeenGhosts, PillBelief, PillMemory};
pub use config::{FitnessBounds, FitnessConfig, RheaConfig};
pub use controller::{
    ControllerState, ExecutionCursor, ReplanReason, RollingHorizonController, TickDecision,
};
pub use error::ConfigError;
pub use evaluator::{Evaluation, FitnessEvaluator};
pub use opponents::{OpponentModel, PursuitOpponents};
pub use plan::CandidatePlan;
pub use population::Population;
pub use report::{GenerationStats, SearchReport};
pub use search::{CancelToken, RollingHorizonSearch, SearchOutcome};
