use crate::{Direction, Ghost, GhostMap, GhostMoves, NodeId, TickEvents};

/// Where a belief estimator thinks a ghost is, for determinization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostPlacement {
    pub node: NodeId,
    pub last_move: Direction,
    pub edible_time: u32,
}

/// Everything needed to turn a partial observation into a steppable simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeliefState {
    pub ghosts: GhostMap<Option<GhostPlacement>>,
    /// Believed availability per pill node. Nodes not listed keep the observed value.
    pub pills: Vec<(NodeId, bool)>,
}

/// The forward model consumed by planners.
///
/// The core crate does not prescribe how a world is simulated; it only fixes the
/// queries and the single mutation (`advance`) a rollout needs. `Clone` is the
/// snapshot operation: every rollout owns its own clone.
pub trait ForwardModel: Clone {
    // Topology.

    fn neighbour(&self, node: NodeId, direction: Direction) -> Option<NodeId>;

    fn shortest_path_distance(&self, from: NodeId, to: NodeId) -> Option<u32>;

    fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        Direction::MOVES
            .iter()
            .filter_map(|&d| self.neighbour(node, d))
            .collect()
    }

    /// A decision point: three or more reachable neighbours.
    fn is_junction(&self, node: NodeId) -> bool {
        Direction::MOVES
            .iter()
            .filter(|&&d| self.neighbour(node, d).is_some())
            .count()
            >= 3
    }

    fn legal_moves(&self, node: NodeId) -> Vec<Direction> {
        Direction::MOVES
            .iter()
            .copied()
            .filter(|&d| self.neighbour(node, d).is_some())
            .collect()
    }

    fn is_node_observable(&self, _node: NodeId) -> bool {
        true
    }

    // State.

    fn agent_node(&self) -> NodeId;

    fn agent_last_move(&self) -> Direction;

    /// `None` when the ghost is not observed (or not in play).
    fn ghost_node(&self, ghost: Ghost) -> Option<NodeId>;

    fn ghost_last_move(&self, ghost: Ghost) -> Direction;

    fn ghost_edible_time(&self, ghost: Ghost) -> u32;

    fn score(&self) -> i64;

    fn current_time(&self) -> u32;

    fn is_game_over(&self) -> bool;

    /// Changes whenever a new maze is loaded.
    fn maze_index(&self) -> u32;

    /// Every node that holds a pill or power pill at the start of the maze.
    fn pill_nodes(&self) -> Vec<NodeId>;

    /// `None` when the node is not observable.
    fn is_pill_available(&self, node: NodeId) -> Option<bool>;

    /// Events produced by the most recent `advance`.
    fn last_events(&self) -> TickEvents;

    // Mutation.

    fn advance(&mut self, agent_move: Direction, ghost_moves: &GhostMoves) -> TickEvents;

    /// Fully observable simulation built from this observation and a belief sample.
    fn determinize(&self, belief: &BeliefState) -> Self;
}
