use std::sync::Arc;

use rhea_core::{
    BeliefState, Direction, ForwardModel, Ghost, GhostMap, GhostMoves, NodeId, TickEvents,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::MazeLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MazeRules {
    pub pill_score: u32,
    pub power_pill_score: u32,
    /// Score for the first ghost eaten after a power pill; doubles for each further ghost.
    pub ghost_eat_score: u32,
    pub edible_time: u32,
    pub lair_time: u32,
    pub lives: u32,
    pub tick_limit: Option<u32>,
    /// Observations only reveal ghosts and pills in a straight unobstructed line.
    pub line_of_sight: bool,
}

impl Default for MazeRules {
    fn default() -> Self {
        Self {
            pill_score: 10,
            power_pill_score: 50,
            ghost_eat_score: 200,
            edible_time: 40,
            lair_time: 20,
            lives: 3,
            tick_limit: None,
            line_of_sight: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GhostState {
    node: NodeId,
    last_move: Direction,
    edible_time: u32,
    lair_time: u32,
}

/// A running game on a [`MazeLayout`].
///
/// The same type serves as the true game, as a partial observation of it
/// (see [`MazeGame::observation`]) and as a rollout snapshot.
#[derive(Debug, Clone)]
pub struct MazeGame {
    layout: Arc<MazeLayout>,
    rules: MazeRules,
    maze_index: u32,
    partial: bool,
    agent: NodeId,
    agent_last_move: Direction,
    ghosts: GhostMap<Option<GhostState>>,
    pills: Vec<bool>,
    power_pills: Vec<bool>,
    pills_left: u32,
    ghost_multiplier: u32,
    score: i64,
    time: u32,
    lives: u32,
    game_over: bool,
    last_events: TickEvents,
}

impl MazeGame {
    pub fn new(layout: Arc<MazeLayout>, rules: MazeRules) -> Self {
        let n = layout.node_count();
        let mut pills = vec![false; n];
        let mut power_pills = vec![false; n];
        for &p in layout.pills() {
            pills[p as usize] = true;
        }
        for &p in layout.power_pills() {
            power_pills[p as usize] = true;
        }
        let pills_left = (layout.pills().len() + layout.power_pills().len()) as u32;
        let ghosts = GhostMap::from_fn(|g| {
            layout.ghost_start(g).map(|node| GhostState {
                node,
                last_move: Direction::Neutral,
                edible_time: 0,
                lair_time: 0,
            })
        });

        Self {
            agent: layout.agent_start(),
            layout,
            rules,
            maze_index: 0,
            partial: false,
            agent_last_move: Direction::Neutral,
            ghosts,
            pills,
            power_pills,
            pills_left,
            ghost_multiplier: 1,
            score: 0,
            time: 0,
            lives: rules.lives.max(1),
            game_over: pills_left == 0,
            last_events: TickEvents::default(),
        }
    }

    pub fn parse(text: &str, rules: MazeRules) -> Result<Self> {
        Ok(Self::new(Arc::new(MazeLayout::parse(text)?), rules))
    }

    pub fn with_maze_index(mut self, index: u32) -> Self {
        self.maze_index = index;
        self
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    pub fn rules(&self) -> &MazeRules {
        &self.rules
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn pills_left(&self) -> u32 {
        self.pills_left
    }

    /// What the agent gets to see this tick.
    pub fn observation(&self) -> Self {
        let mut view = self.clone();
        view.partial = self.rules.line_of_sight;
        view
    }

    /// Test and scripting hook: move the agent without advancing time.
    pub fn place_agent(&mut self, node: NodeId, last_move: Direction) {
        self.agent = node;
        self.agent_last_move = last_move;
    }

    /// Test and scripting hook: put a ghost in play at `node`.
    pub fn place_ghost(&mut self, ghost: Ghost, node: NodeId, last_move: Direction, edible_time: u32) {
        self.ghosts.set(
            ghost,
            Some(GhostState {
                node,
                last_move,
                edible_time,
                lair_time: 0,
            }),
        );
    }

    pub fn remove_ghost(&mut self, ghost: Ghost) {
        self.ghosts.set(ghost, None);
    }

    fn visible(&self, node: NodeId) -> bool {
        !self.partial || self.layout.line_of_sight(self.agent, node)
    }

    fn move_agent(&mut self, requested: Direction) {
        let current = self.agent;
        let chosen = [requested, self.agent_last_move]
            .into_iter()
            .find(|&d| d.is_move() && self.layout.neighbour(current, d).is_some());
        if let Some(direction) = chosen {
            if let Some(next) = self.layout.neighbour(current, direction) {
                self.agent = next;
                self.agent_last_move = direction;
            }
        }
    }

    fn ghost_step(layout: &MazeLayout, state: &GhostState, requested: Option<Direction>) -> Option<Direction> {
        let legal = |d: Direction| d.is_move() && layout.neighbour(state.node, d).is_some();
        let reverse = state.last_move.opposite();

        if let Some(d) = requested.filter(|&d| legal(d) && d != reverse) {
            return Some(d);
        }
        if legal(state.last_move) {
            return Some(state.last_move);
        }
        Direction::MOVES
            .into_iter()
            .find(|&d| legal(d) && d != reverse)
            .or_else(|| Some(reverse).filter(|&d| legal(d)))
    }

    fn move_ghosts(&mut self, ghost_moves: &GhostMoves) {
        for ghost in Ghost::ALL {
            let Some(mut state) = *self.ghosts.get(ghost) else {
                continue;
            };
            if state.lair_time > 0 {
                state.lair_time -= 1;
                self.ghosts.set(ghost, Some(state));
                continue;
            }
            if state.edible_time > 0 {
                state.edible_time -= 1;
                // Edible ghosts move at half speed.
                if self.time % 2 == 1 {
                    self.ghosts.set(ghost, Some(state));
                    continue;
                }
            }
            if let Some(direction) = Self::ghost_step(&self.layout, &state, *ghost_moves.get(ghost)) {
                if let Some(next) = self.layout.neighbour(state.node, direction) {
                    state.node = next;
                    state.last_move = direction;
                }
            }
            self.ghosts.set(ghost, Some(state));
        }
    }

    fn eat_pills(&mut self, events: &mut TickEvents) {
        let node = self.agent as usize;
        if self.pills[node] {
            self.pills[node] = false;
            self.pills_left -= 1;
            self.score += self.rules.pill_score as i64;
            events.pills_eaten += 1;
        }
        if self.power_pills[node] {
            self.power_pills[node] = false;
            self.pills_left -= 1;
            self.score += self.rules.power_pill_score as i64;
            events.power_pills_eaten += 1;
            self.ghost_multiplier = 1;
            for ghost in Ghost::ALL {
                if let Some(state) = self.ghosts.get_mut(ghost).as_mut() {
                    if state.lair_time == 0 {
                        state.edible_time = self.rules.edible_time;
                        state.last_move = state.last_move.opposite();
                    }
                }
            }
        }
    }

    fn resolve_collisions(&mut self, events: &mut TickEvents) {
        for ghost in Ghost::ALL {
            let Some(mut state) = *self.ghosts.get(ghost) else {
                continue;
            };
            if state.lair_time > 0 || state.node != self.agent {
                continue;
            }
            if state.edible_time > 0 {
                let value = self.rules.ghost_eat_score * self.ghost_multiplier;
                self.ghost_multiplier = self.ghost_multiplier.saturating_mul(2);
                self.score += value as i64;
                events.ghosts_eaten.set(ghost, Some(value));
                state.node = self.layout.lair();
                state.last_move = Direction::Neutral;
                state.edible_time = 0;
                state.lair_time = self.rules.lair_time;
                self.ghosts.set(ghost, Some(state));
            } else {
                events.agent_eaten = true;
            }
        }
    }

    fn reset_positions(&mut self) {
        self.agent = self.layout.agent_start();
        self.agent_last_move = Direction::Neutral;
        for ghost in Ghost::ALL {
            if let Some(state) = self.ghosts.get_mut(ghost).as_mut() {
                state.node = self.layout.ghost_start(ghost).unwrap_or(self.layout.lair());
                state.last_move = Direction::Neutral;
                state.edible_time = 0;
                state.lair_time = 0;
            }
        }
    }
}

impl ForwardModel for MazeGame {
    fn neighbour(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        self.layout.neighbour(node, direction)
    }

    fn shortest_path_distance(&self, from: NodeId, to: NodeId) -> Option<u32> {
        self.layout.distance(from, to)
    }

    fn is_node_observable(&self, node: NodeId) -> bool {
        self.visible(node)
    }

    fn agent_node(&self) -> NodeId {
        self.agent
    }

    fn agent_last_move(&self) -> Direction {
        self.agent_last_move
    }

    fn ghost_node(&self, ghost: Ghost) -> Option<NodeId> {
        let state = (*self.ghosts.get(ghost))?;
        self.visible(state.node).then_some(state.node)
    }

    fn ghost_last_move(&self, ghost: Ghost) -> Direction {
        match *self.ghosts.get(ghost) {
            Some(state) if self.visible(state.node) => state.last_move,
            _ => Direction::Neutral,
        }
    }

    fn ghost_edible_time(&self, ghost: Ghost) -> u32 {
        match *self.ghosts.get(ghost) {
            Some(state) if self.visible(state.node) => state.edible_time,
            _ => 0,
        }
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn current_time(&self) -> u32 {
        self.time
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn maze_index(&self) -> u32 {
        self.maze_index
    }

    fn pill_nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.layout.pills().len() + self.layout.power_pills().len());
        nodes.extend_from_slice(self.layout.pills());
        nodes.extend_from_slice(self.layout.power_pills());
        nodes
    }

    fn is_pill_available(&self, node: NodeId) -> Option<bool> {
        let idx = node as usize;
        if idx >= self.pills.len() || !self.visible(node) {
            return None;
        }
        Some(self.pills[idx] || self.power_pills[idx])
    }

    fn last_events(&self) -> TickEvents {
        self.last_events
    }

    fn advance(&mut self, agent_move: Direction, ghost_moves: &GhostMoves) -> TickEvents {
        let mut events = TickEvents::default();
        if self.game_over {
            self.last_events = events;
            return events;
        }
        self.time += 1;

        self.move_agent(agent_move);
        self.eat_pills(&mut events);
        self.resolve_collisions(&mut events);
        if !events.agent_eaten {
            self.move_ghosts(ghost_moves);
            self.resolve_collisions(&mut events);
        }

        if events.agent_eaten {
            self.lives -= 1;
            if self.lives == 0 {
                self.game_over = true;
            } else {
                self.reset_positions();
            }
        }
        if self.pills_left == 0 {
            events.level_cleared = true;
            self.game_over = true;
        }
        if self.rules.tick_limit.is_some_and(|limit| self.time >= limit) {
            self.game_over = true;
        }

        self.last_events = events;
        events
    }

    fn determinize(&self, belief: &BeliefState) -> Self {
        let mut sim = self.clone();
        sim.partial = false;
        let lair = sim.layout.lair();

        for ghost in Ghost::ALL {
            let Some(state) = sim.ghosts.get_mut(ghost).as_mut() else {
                continue;
            };
            *state = match belief.ghosts.get(ghost) {
                Some(placement) => GhostState {
                    node: placement.node,
                    last_move: placement.last_move,
                    edible_time: placement.edible_time,
                    lair_time: 0,
                },
                None => GhostState {
                    node: lair,
                    last_move: Direction::Neutral,
                    edible_time: 0,
                    lair_time: 0,
                },
            };
        }

        for &(node, available) in &belief.pills {
            let idx = node as usize;
            if idx >= sim.pills.len() {
                continue;
            }
            sim.pills[idx] = available && sim.layout.is_pill_slot(node);
            sim.power_pills[idx] = available && sim.layout.is_power_pill_slot(node);
        }
        sim.pills_left = sim
            .pills
            .iter()
            .zip(&sim.power_pills)
            .filter(|(p, pp)| **p || **pp)
            .count() as u32;

        sim
    }
}
