use rhea_core::{Direction, ForwardModel, Ghost, GhostMap, GhostMoves};

/// Ghost moves used inside rollouts.
pub trait OpponentModel<M: ForwardModel> {
    fn ghost_moves(&mut self, sim: &M) -> GhostMoves;
}

impl<M, F> OpponentModel<M> for F
where
    M: ForwardModel,
    F: FnMut(&M) -> GhostMoves,
{
    fn ghost_moves(&mut self, sim: &M) -> GhostMoves {
        self(sim)
    }
}

/// Ghosts chase the agent along shortest paths, or flee while edible.
///
/// A ghost only picks a new move at a junction. Elsewhere, or when no
/// distance to the agent is known, it holds its heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct PursuitOpponents;

impl PursuitOpponents {
    pub fn ghost_move<M: ForwardModel>(sim: &M, ghost: Ghost) -> Option<Direction> {
        let node = sim.ghost_node(ghost)?;
        if !sim.is_junction(node) {
            return None;
        }
        let target = sim.agent_node();
        let reverse = sim.ghost_last_move(ghost).opposite();
        let fleeing = sim.ghost_edible_time(ghost) > 0;

        let mut best: Option<(Direction, u32)> = None;
        for direction in Direction::MOVES {
            if direction == reverse {
                continue;
            }
            let Some(next) = sim.neighbour(node, direction) else {
                continue;
            };
            let Some(distance) = sim.shortest_path_distance(next, target) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, current)) if fleeing => distance > current,
                Some((_, current)) => distance < current,
            };
            if better {
                best = Some((direction, distance));
            }
        }
        best.map(|(direction, _)| direction)
    }
}

impl<M: ForwardModel> OpponentModel<M> for PursuitOpponents {
    fn ghost_moves(&mut self, sim: &M) -> GhostMoves {
        GhostMap::from_fn(|ghost| Self::ghost_move(sim, ghost))
    }
}
