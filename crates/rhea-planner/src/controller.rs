use std::marker::PhantomData;
use std::time::Duration;

use rhea_core::{
    AgentId, BeliefState, Direction, ForwardModel, Ghost, GhostMap, GhostPlacement, Policy,
    TickContext,
};
use rhea_tools::{TraceEvent, Tracer};

use crate::belief::{GhostBelief, LastSeenGhosts, PillBelief, PillMemory};
use crate::config::RheaConfig;
use crate::error::Result;
use crate::opponents::{OpponentModel, PursuitOpponents};
use crate::plan::CandidatePlan;
use crate::report::SearchReport;
use crate::search::{CancelToken, RollingHorizonSearch, SearchOutcome};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RNG stream ids for [`TickContext::rng_for_agent`].
pub const SEARCH_STREAM: u64 = 1;
pub const BELIEF_STREAM: u64 = 2;

/// Trace tags emitted by [`RollingHorizonController`].
pub mod tags {
    /// `a` = [`ReplanReason::code`](super::ReplanReason::code), `b` = generations run.
    pub const REPLAN: &str = "rhea.replan";
    /// `a` = steps skipped.
    pub const SKIP: &str = "rhea.skip";
    /// `a` = ghost index.
    pub const OPPORTUNITY_TRACK: &str = "rhea.opportunity.track";
    /// `a` = ghost index.
    pub const OPPORTUNITY_CLEAR: &str = "rhea.opportunity.clear";
    pub const SEARCH_CANCELLED: &str = "rhea.search.cancelled";
    /// `a` = maze index.
    pub const MAZE_NEW: &str = "rhea.maze.new";
}

/// Where the controller is within its committed plan.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionCursor {
    pub committed_plan: Option<CandidatePlan>,
    pub step_index: usize,
    /// Edible ghost the current plan was made for.
    pub edible_ghost: Option<Ghost>,
}

impl ExecutionCursor {
    pub fn next_action(&self) -> Option<Direction> {
        self.committed_plan.as_ref()?.action(self.step_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No plan committed yet.
    Idle,
    Executing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanReason {
    NoPlan,
    NewMaze,
    /// The cursor reached the last step of the plan.
    PlanExhausted,
    /// Replaying the rest of the plan on the latest observation gets the agent eaten.
    PlanUnsafe,
    NewOpportunity,
    OpportunityEnded,
}

impl ReplanReason {
    pub fn code(self) -> u64 {
        match self {
            ReplanReason::NoPlan => 0,
            ReplanReason::NewMaze => 1,
            ReplanReason::PlanExhausted => 2,
            ReplanReason::PlanUnsafe => 3,
            ReplanReason::NewOpportunity => 4,
            ReplanReason::OpportunityEnded => 5,
        }
    }
}

/// What the controller did on its latest tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Kept executing the committed plan.
    Continue { step_index: usize },
    /// Skipped plan steps that are blocked at the current node.
    Skipped { from: usize, to: usize },
    Replanned { reason: ReplanReason, generations: u32 },
    Cancelled,
    GameOver,
}

/// Rolling execution over [`RollingHorizonSearch`].
///
/// Commits to the searched plan and walks it one macro-action per junction,
/// replanning only when the plan runs out, turns unsafe, or an edible-ghost
/// opportunity starts or ends. Owns its belief estimators and all search state;
/// nothing is shared between controllers.
pub struct RollingHorizonController<M, O = PursuitOpponents, G = LastSeenGhosts, P = PillMemory> {
    config: RheaConfig,
    search: RollingHorizonSearch,
    opponents: O,
    ghost_belief: G,
    pill_belief: P,
    edible_times: GhostMap<Option<u32>>,
    cursor: ExecutionCursor,
    maze_index: Option<u32>,
    agent_id: u64,
    cancel: CancelToken,
    tracer: Tracer,
    last_decision: Option<TickDecision>,
    last_report: Option<SearchReport>,
    _model: PhantomData<fn(&M)>,
}

impl<M: ForwardModel> RollingHorizonController<M> {
    pub fn new(config: RheaConfig) -> Result<Self> {
        Self::with_parts(
            config,
            PursuitOpponents,
            LastSeenGhosts::default(),
            PillMemory::default(),
        )
    }
}

impl<M, O, G, P> RollingHorizonController<M, O, G, P>
where
    M: ForwardModel,
    O: OpponentModel<M>,
    G: GhostBelief,
    P: PillBelief,
{
    pub fn with_parts(config: RheaConfig, opponents: O, ghost_belief: G, pill_belief: P) -> Result<Self> {
        let cancel = CancelToken::new();
        let search = RollingHorizonSearch::new(config.clone())?.with_cancel(cancel.clone());
        Ok(Self {
            config,
            search,
            opponents,
            ghost_belief,
            pill_belief,
            edible_times: GhostMap::default(),
            cursor: ExecutionCursor::default(),
            maze_index: None,
            agent_id: 0,
            cancel,
            tracer: Tracer::new(),
            last_decision: None,
            last_report: None,
            _model: PhantomData,
        })
    }

    pub fn with_agent<A: AgentId>(mut self, agent: A) -> Self {
        self.agent_id = agent.stable_id();
        self
    }

    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn config(&self) -> &RheaConfig {
        &self.config
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Token that aborts a running search. Stays tripped until reset.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ControllerState {
        if self.cursor.committed_plan.is_some() {
            ControllerState::Executing
        } else {
            ControllerState::Idle
        }
    }

    pub fn cursor(&self) -> &ExecutionCursor {
        &self.cursor
    }

    /// Resume from a previously saved cursor.
    pub fn restore_cursor(&mut self, cursor: ExecutionCursor) {
        self.cursor = cursor;
    }

    pub fn last_decision(&self) -> Option<TickDecision> {
        self.last_decision
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    pub fn ghost_belief(&self) -> &G {
        &self.ghost_belief
    }

    pub fn pill_belief(&self) -> &P {
        &self.pill_belief
    }

    /// Tracked edible time of `ghost`; `None` if it has never been seen.
    pub fn edible_time(&self, ghost: Ghost) -> Option<u32> {
        *self.edible_times.get(ghost)
    }

    fn emit(&mut self, event: TraceEvent) {
        if self.tracer.is_enabled() {
            self.tracer.emit(event);
        }
    }

    /// Feed this tick's observation into the estimators.
    fn observe(&mut self, ctx: &TickContext, observation: &M) -> Option<ReplanReason> {
        let mut reason = None;

        let maze = observation.maze_index();
        if self.maze_index != Some(maze) {
            tracing::info!(maze, tick = ctx.tick, "new maze");
            self.maze_index = Some(maze);
            self.ghost_belief.reset();
            self.pill_belief.reset(&observation.pill_nodes());
            self.edible_times = GhostMap::default();
            self.cursor = ExecutionCursor::default();
            self.emit(TraceEvent::new(ctx.tick, tags::MAZE_NEW).with_a(maze as u64));
            reason = Some(ReplanReason::NewMaze);
        }

        if observation.last_events().agent_eaten {
            tracing::debug!(tick = ctx.tick, "agent eaten, ghost belief reset");
            self.ghost_belief.reset();
        }

        for node in observation.pill_nodes() {
            if let Some(available) = observation.is_pill_available(node) {
                self.pill_belief.observe(node, available);
            }
        }
        self.pill_belief.observe(observation.agent_node(), false);

        for ghost in Ghost::ALL {
            let timer = self.edible_times.get_mut(ghost);
            *timer = timer.map(|t| t.saturating_sub(1));

            match observation.ghost_node(ghost) {
                Some(node) => {
                    self.ghost_belief
                        .observe(ghost, node, observation.ghost_last_move(ghost));
                    self.edible_times
                        .set(ghost, Some(observation.ghost_edible_time(ghost)));
                }
                None => {
                    for candidate in self.ghost_belief.candidate_nodes(ghost) {
                        if observation.is_node_observable(candidate) {
                            self.ghost_belief.observe_not_present(ghost, candidate);
                        }
                    }
                }
            }
        }

        reason
    }

    /// Fully observable simulation from the observation and current beliefs.
    fn simulation(&mut self, ctx: &TickContext, observation: &M) -> M {
        let mut rng = ctx.rng_for_agent(self.agent_id, BELIEF_STREAM);
        let sightings = self.ghost_belief.sample(&mut rng);
        let edible_times = self.edible_times;
        let ghosts = GhostMap::from_fn(|ghost| {
            sightings.get(ghost).map(|s| GhostPlacement {
                node: s.node,
                last_move: s.last_move,
                edible_time: edible_times.get(ghost).unwrap_or(0),
            })
        });
        let belief = BeliefState {
            ghosts,
            pills: self.pill_belief.believed(),
        };
        observation.determinize(&belief)
    }

    /// Move the cursor past the macro-action boundary or any blocked steps.
    fn step_cursor(&mut self, ctx: &TickContext, observation: &M) -> Option<TickDecision> {
        let plan = self.cursor.committed_plan.as_ref()?;
        let node = observation.agent_node();

        if observation.is_junction(node) {
            self.cursor.step_index += 1;
            return Some(TickDecision::Continue {
                step_index: self.cursor.step_index,
            });
        }

        let from = self.cursor.step_index;
        let mut to = from;
        while plan
            .action(to)
            .is_some_and(|action| observation.neighbour(node, action).is_none())
        {
            to += 1;
        }
        self.cursor.step_index = to;
        if to == from {
            return Some(TickDecision::Continue { step_index: to });
        }
        self.emit(TraceEvent::new(ctx.tick, tags::SKIP).with_a((to - from) as u64));
        Some(TickDecision::Skipped { from, to })
    }

    fn remaining_plan_is_unsafe(&mut self, ctx: &TickContext, observation: &M) -> bool {
        let step = self.cursor.step_index;
        let Some(plan) = self
            .cursor
            .committed_plan
            .clone()
            .filter(|plan| step < plan.len())
        else {
            return false;
        };
        let sim = self.simulation(ctx, observation);
        self.search
            .evaluator()
            .evaluate(&plan, sim, step, &mut self.opponents)
            .agent_eaten
    }

    /// Stop tracking an ended opportunity, then pick up a new one in the same tick.
    fn track_opportunity(&mut self, ctx: &TickContext, observation: &M) -> Option<ReplanReason> {
        let mut reason = None;

        if let Some(tracked) = self.cursor.edible_ghost {
            let expired = self.edible_time(tracked).unwrap_or(0) == 0;
            if expired || observation.last_events().was_ghost_eaten(tracked) {
                self.cursor.edible_ghost = None;
                self.emit(
                    TraceEvent::new(ctx.tick, tags::OPPORTUNITY_CLEAR).with_a(tracked.index() as u64),
                );
                reason = Some(ReplanReason::OpportunityEnded);
            }
        }

        if self.cursor.edible_ghost.is_none() {
            let fresh = Ghost::ALL.into_iter().find(|&ghost| {
                observation.ghost_node(ghost).is_some() && observation.ghost_edible_time(ghost) > 0
            });
            if let Some(ghost) = fresh {
                self.cursor.edible_ghost = Some(ghost);
                self.emit(
                    TraceEvent::new(ctx.tick, tags::OPPORTUNITY_TRACK).with_a(ghost.index() as u64),
                );
                reason = reason.or(Some(ReplanReason::NewOpportunity));
            }
        }

        reason
    }

    fn replan(
        &mut self,
        ctx: &TickContext,
        observation: &M,
        budget: Duration,
        reason: ReplanReason,
    ) -> Option<u32> {
        let sim = self.simulation(ctx, observation);
        let mut rng = ctx.rng_for_agent(self.agent_id, SEARCH_STREAM);
        let budget = budget.min(self.config.time_budget());
        let outcome = self.search.run(&sim, &mut self.opponents, &mut rng, budget);

        match outcome {
            SearchOutcome::Complete { plan, report } => {
                let generations = report.generation_count();
                tracing::debug!(
                    tick = ctx.tick,
                    reason = ?reason,
                    generations,
                    fitness = plan.fitness(),
                    plan = %plan,
                    "committed new plan"
                );
                self.emit(
                    TraceEvent::new(ctx.tick, tags::REPLAN)
                        .with_a(reason.code())
                        .with_b(generations as u64),
                );
                self.cursor.committed_plan = Some(plan);
                self.cursor.step_index = 0;
                self.last_report = Some(report);
                Some(generations)
            }
            SearchOutcome::Cancelled { report } => {
                tracing::debug!(tick = ctx.tick, reason = ?reason, "search cancelled");
                self.emit(TraceEvent::new(ctx.tick, tags::SEARCH_CANCELLED));
                self.cursor.committed_plan = None;
                self.cursor.step_index = 0;
                self.last_report = Some(report);
                None
            }
        }
    }
}

impl<M, O, G, P> Policy<M> for RollingHorizonController<M, O, G, P>
where
    M: ForwardModel,
    O: OpponentModel<M>,
    G: GhostBelief,
    P: PillBelief,
{
    fn choose_action(&mut self, ctx: &TickContext, observation: &M, budget: Duration) -> Direction {
        if observation.is_game_over() {
            self.last_decision = Some(TickDecision::GameOver);
            return Direction::Neutral;
        }

        let mut reason = self.observe(ctx, observation);
        let mut decision = self.step_cursor(ctx, observation);
        if decision.is_none() {
            reason = reason.or(Some(ReplanReason::NoPlan));
        }

        let ghost_in_sight = Ghost::ALL
            .iter()
            .any(|&ghost| observation.ghost_node(ghost).is_some());
        if reason.is_none() && ghost_in_sight && self.remaining_plan_is_unsafe(ctx, observation) {
            reason = Some(ReplanReason::PlanUnsafe);
        }

        if let Some(opportunity) = self.track_opportunity(ctx, observation) {
            reason = reason.or(Some(opportunity));
        }

        let exhausted = self
            .cursor
            .committed_plan
            .as_ref()
            .is_some_and(|plan| self.cursor.step_index + 1 >= plan.len());
        if exhausted {
            reason = reason.or(Some(ReplanReason::PlanExhausted));
        }

        if let Some(reason) = reason {
            decision = Some(match self.replan(ctx, observation, budget, reason) {
                Some(generations) => TickDecision::Replanned {
                    reason,
                    generations,
                },
                None => TickDecision::Cancelled,
            });
        }

        self.ghost_belief.advance();
        self.last_decision = decision;
        tracing::debug!(
            tick = ctx.tick,
            step_index = self.cursor.step_index,
            decision = ?decision,
            "controller decision"
        );

        self.cursor.next_action().unwrap_or(Direction::Neutral)
    }
}
