use rhea_core::{
    BeliefState, Direction, ForwardModel, Ghost, GhostMap, GhostMoves, NodeId, TickEvents,
};
use rhea_planner::{CandidatePlan, FitnessBounds, FitnessConfig, FitnessEvaluator, RheaConfig};

use Direction::{Left, Right, Up};

/// A straight track of nodes `0..len`. With `ladder`, `Up`/`Down` loop back to
/// the same node, which makes every node a junction and every macro-action a
/// single tick.
#[derive(Debug, Clone)]
struct Track {
    len: u32,
    ladder: bool,
    agent: NodeId,
    last_move: Direction,
    trap: Option<NodeId>,
    // Edible ghost parked on a node, worth the given points.
    prey: Option<(NodeId, u32)>,
    pills: Vec<bool>,
    score: i64,
    time: u32,
    over: bool,
    events: TickEvents,
}

impl Track {
    fn new(len: u32, pills: &[NodeId], trap: Option<NodeId>) -> Self {
        let mut slots = vec![false; len as usize];
        for &p in pills {
            slots[p as usize] = true;
        }
        Self {
            len,
            ladder: true,
            agent: 0,
            last_move: Direction::Neutral,
            trap,
            prey: None,
            pills: slots,
            score: 0,
            time: 0,
            over: false,
            events: TickEvents::default(),
        }
    }
}

impl ForwardModel for Track {
    fn neighbour(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => node.checked_sub(1),
            Direction::Right => (node + 1 < self.len).then_some(node + 1),
            Direction::Up | Direction::Down => self.ladder.then_some(node),
            Direction::Neutral => None,
        }
    }

    fn shortest_path_distance(&self, from: NodeId, to: NodeId) -> Option<u32> {
        Some(from.abs_diff(to))
    }

    fn agent_node(&self) -> NodeId {
        self.agent
    }

    fn agent_last_move(&self) -> Direction {
        self.last_move
    }

    fn ghost_node(&self, _ghost: Ghost) -> Option<NodeId> {
        None
    }

    fn ghost_last_move(&self, _ghost: Ghost) -> Direction {
        Direction::Neutral
    }

    fn ghost_edible_time(&self, _ghost: Ghost) -> u32 {
        0
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn current_time(&self) -> u32 {
        self.time
    }

    fn is_game_over(&self) -> bool {
        self.over
    }

    fn maze_index(&self) -> u32 {
        0
    }

    fn pill_nodes(&self) -> Vec<NodeId> {
        (0..self.len).collect()
    }

    fn is_pill_available(&self, node: NodeId) -> Option<bool> {
        self.pills.get(node as usize).copied()
    }

    fn last_events(&self) -> TickEvents {
        self.events
    }

    fn advance(&mut self, agent_move: Direction, _ghost_moves: &GhostMoves) -> TickEvents {
        let mut events = TickEvents::default();
        self.time += 1;
        if let Some(next) = self.neighbour(self.agent, agent_move) {
            self.agent = next;
            self.last_move = agent_move;
        }
        if self.trap == Some(self.agent) {
            events.agent_eaten = true;
            self.over = true;
        } else if self.pills[self.agent as usize] {
            self.pills[self.agent as usize] = false;
            self.score += 10;
            events.pills_eaten = 1;
        }
        if let Some((_, value)) = self.prey.filter(|&(node, _)| node == self.agent) {
            self.prey = None;
            self.score += value as i64;
            events.ghosts_eaten.set(Ghost::Pinky, Some(value));
        }
        self.events = events;
        events
    }

    fn determinize(&self, _belief: &BeliefState) -> Self {
        self.clone()
    }
}

fn plan(actions: &[Direction]) -> CandidatePlan {
    CandidatePlan::from_actions(actions.to_vec()).unwrap()
}

fn idle_ghosts(_: &Track) -> GhostMoves {
    GhostMap::default()
}

fn evaluator(fitness: FitnessConfig) -> FitnessEvaluator {
    FitnessEvaluator::new(&RheaConfig {
        fitness,
        ..RheaConfig::default()
    })
}

#[test]
fn death_short_circuits_below_every_surviving_plan() {
    let track = Track::new(8, &[1, 2], Some(3));
    let eval = evaluator(FitnessConfig::default());

    let doomed = plan(&[Right, Right, Right, Up, Up, Up, Up, Up, Up, Up]);
    let idle = plan(&[Up; 10]);
    let greedy = plan(&[Right, Right, Left, Left, Up, Up, Up, Up, Up, Up]);

    let death = eval.evaluate(&doomed, track.clone(), 0, &mut idle_ghosts);
    let stay = eval.evaluate(&idle, track.clone(), 0, &mut idle_ghosts);
    let eat = eval.evaluate(&greedy, track, 0, &mut idle_ghosts);

    assert!(death.agent_eaten);
    assert_eq!(death.fitness, -50_000.0);
    assert_eq!(death.ticks, 3, "the rest of the plan is abandoned");
    assert!(!stay.agent_eaten);
    assert!(death.fitness < stay.fitness);
    assert!(death.fitness < eat.fitness);
    assert!(stay.fitness < eat.fitness);
}

#[test]
fn pill_rewards_are_discounted_by_step() {
    let track = Track::new(4, &[1], None);
    let eval = evaluator(FitnessConfig::default());

    let early = eval.evaluate(&plan(&[Right, Up, Up]), track.clone(), 0, &mut idle_ghosts);
    let late = eval.evaluate(&plan(&[Up, Right, Up]), track.clone(), 0, &mut idle_ghosts);

    assert_eq!(early.fitness, 10.0);
    assert_eq!(late.fitness, 5.0);

    let flat = evaluator(FitnessConfig {
        discount_by_step: false,
        ..FitnessConfig::default()
    });
    assert_eq!(
        flat.evaluate(&plan(&[Up, Right, Up]), track, 0, &mut idle_ghosts)
            .fitness,
        10.0
    );
}

#[test]
fn eaten_ghost_bonus_is_scaled_but_not_discounted() {
    let mut track = Track::new(4, &[], None);
    track.prey = Some((2, 400));
    let eval = evaluator(FitnessConfig {
        ghost_reward_scale: 1.5,
        ..FitnessConfig::default()
    });

    // The ghost is reached on the third macro-action, where pills would count a third.
    let result = eval.evaluate(&plan(&[Up, Right, Right, Up]), track.clone(), 0, &mut idle_ghosts);

    assert!(!result.agent_eaten);
    assert_eq!(result.fitness, 600.0);

    let unscaled = evaluator(FitnessConfig::default());
    let result = unscaled.evaluate(&plan(&[Up, Right, Right, Up]), track, 0, &mut idle_ghosts);
    assert_eq!(result.fitness, 400.0);
}

#[test]
fn infeasible_first_action_is_still_evaluated() {
    let track = Track::new(4, &[1], None);
    let eval = evaluator(FitnessConfig::default());

    let result = eval.evaluate(&plan(&[Left, Right, Up]), track, 0, &mut idle_ghosts);

    assert!(!result.agent_eaten);
    assert_eq!(result.ticks, 3);
    assert_eq!(result.fitness, 5.0);
}

#[test]
fn offset_resumes_mid_plan() {
    let track = Track::new(8, &[], Some(3));
    let eval = evaluator(FitnessConfig::default());
    let doomed = plan(&[Right, Right, Right, Up, Up, Up]);

    let resumed = eval.evaluate(&doomed, track, 3, &mut idle_ghosts);

    assert!(!resumed.agent_eaten);
    assert_eq!(resumed.ticks, 3);
}

#[test]
fn macro_action_runs_until_blocked() {
    let mut track = Track::new(6, &[], None);
    track.ladder = false;
    let eval = evaluator(FitnessConfig::default());

    let result = eval.evaluate(&plan(&[Right]), track, 0, &mut idle_ghosts);

    assert_eq!(result.ticks, 5);
}

#[test]
fn macro_action_is_capped() {
    let mut track = Track::new(1000, &[], None);
    track.ladder = false;
    let eval = FitnessEvaluator::new(&RheaConfig {
        max_macro_ticks: 7,
        ..RheaConfig::default()
    });

    let result = eval.evaluate(&plan(&[Right, Right]), track, 0, &mut idle_ghosts);

    assert_eq!(result.ticks, 14);
}

#[test]
fn finished_game_stops_the_rollout() {
    let mut track = Track::new(4, &[], None);
    track.over = true;
    let eval = evaluator(FitnessConfig::default());

    let result = eval.evaluate(&plan(&[Right, Right]), track, 0, &mut idle_ghosts);

    assert_eq!(result.ticks, 0);
    assert_eq!(result.fitness, 0.0);
}

#[test]
fn raw_score_is_clamped_and_normalized() {
    let track = Track::new(4, &[1, 2, 3], None);
    let eval = evaluator(FitnessConfig {
        discount_by_step: false,
        clamp: Some(FitnessBounds {
            min: 0.0,
            max: 19.0,
        }),
        normalize_max: Some(19.0),
        ..FitnessConfig::default()
    });

    let result = eval.evaluate(&plan(&[Right, Right, Right]), track, 0, &mut idle_ghosts);

    assert_eq!(result.fitness, 1.0);
}
