use rhea_core::{ForwardModel, TickEvents};

use crate::config::{FitnessConfig, RheaConfig};
use crate::opponents::OpponentModel;
use crate::plan::CandidatePlan;

/// Result of replaying one plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f32,
    /// The agent was eaten; `fitness` is the death sentinel.
    pub agent_eaten: bool,
    /// Simulation ticks consumed.
    pub ticks: u32,
}

/// Replays plans against private simulation snapshots and scores them.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    fitness: FitnessConfig,
    max_macro_ticks: u32,
}

impl FitnessEvaluator {
    pub fn new(config: &RheaConfig) -> Self {
        Self {
            fitness: config.fitness.clone(),
            max_macro_ticks: config.max_macro_ticks.max(1),
        }
    }

    pub fn fitness_config(&self) -> &FitnessConfig {
        &self.fitness
    }

    /// Replay `plan[offset..]` on `sim`, which the evaluation consumes.
    ///
    /// Each action is applied tick after tick until the agent reaches a junction,
    /// is blocked in that direction, the game ends, or `max_macro_ticks` is hit.
    /// Being eaten at any tick abandons the rest of the plan.
    pub fn evaluate<M, O>(
        &self,
        plan: &CandidatePlan,
        mut sim: M,
        offset: usize,
        opponents: &mut O,
    ) -> Evaluation
    where
        M: ForwardModel,
        O: OpponentModel<M> + ?Sized,
    {
        let mut raw = 0.0f32;
        let mut ticks = 0u32;

        'plan: for (step, &action) in plan.actions().iter().enumerate().skip(offset) {
            let discount = if self.fitness.discount_by_step {
                1.0 / (step + 1) as f32
            } else {
                1.0
            };

            for _ in 0..self.max_macro_ticks {
                if sim.is_game_over() {
                    break 'plan;
                }
                let ghost_moves = opponents.ghost_moves(&sim);
                let events = sim.advance(action, &ghost_moves);
                ticks += 1;

                if events.agent_eaten {
                    return Evaluation {
                        fitness: self.fitness.death_sentinel,
                        agent_eaten: true,
                        ticks,
                    };
                }
                raw += self.reward(&events, discount);

                let node = sim.agent_node();
                if sim.is_junction(node) || sim.neighbour(node, action).is_none() {
                    break;
                }
            }
        }

        Evaluation {
            fitness: self.fitness.finish(raw),
            agent_eaten: false,
            ticks,
        }
    }

    fn reward(&self, events: &TickEvents, discount: f32) -> f32 {
        let pills = events.pills_eaten as f32 * self.fitness.pill_reward
            + events.power_pills_eaten as f32 * self.fitness.power_pill_reward;
        let ghosts = events.ghost_points() as f32 * self.fitness.ghost_reward_scale;
        pills * discount + ghosts
    }
}
