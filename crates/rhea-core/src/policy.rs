use std::time::Duration;

use crate::{Direction, ForwardModel, TickContext};

/// Per-tick decision interface exposed to the host loop.
pub trait Policy<M>
where
    M: ForwardModel,
{
    /// Choose the agent's move for this tick, spending at most roughly `budget`.
    fn choose_action(&mut self, ctx: &TickContext, observation: &M, budget: Duration) -> Direction;
}
