use std::fmt;

use rhea_core::{DeterministicRng, Direction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fixed-length sequence of macro-actions and the fitness of its last evaluation.
///
/// Actions are always drawn from [`Direction::MOVES`]; `Neutral` never appears in a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidatePlan {
    actions: Vec<Direction>,
    fitness: f32,
}

impl CandidatePlan {
    /// Uniformly random plan of `len` actions.
    pub fn random<R: DeterministicRng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut plan = Self {
            actions: vec![Direction::Up; len],
            fitness: 0.0,
        };
        plan.randomize(rng);
        plan
    }

    /// Build a plan from explicit actions. Returns `None` if `actions` is empty
    /// or contains `Direction::Neutral`.
    pub fn from_actions(actions: Vec<Direction>) -> Option<Self> {
        if actions.is_empty() || actions.iter().any(|d| !d.is_move()) {
            return None;
        }
        Some(Self {
            actions,
            fitness: 0.0,
        })
    }

    /// Redraw every action i.i.d. from the legal action set.
    pub fn randomize<R: DeterministicRng + ?Sized>(&mut self, rng: &mut R) {
        for action in &mut self.actions {
            *action = random_move(rng);
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Direction] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> Option<Direction> {
        self.actions.get(index).copied()
    }

    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Single-point crossover at a uniformly drawn cut point in `0..len`.
    pub fn crossover<R: DeterministicRng + ?Sized>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let point = rng.next_below(self.len().max(1));
        self.crossover_at(other, point)
    }

    /// The first child takes `self[..point]` and `other[point..]`; the second the complement.
    ///
    /// Children start with zero fitness.
    ///
    /// # Panics
    ///
    /// If the parents differ in length.
    pub fn crossover_at(&self, other: &Self, point: usize) -> (Self, Self) {
        assert_eq!(
            self.len(),
            other.len(),
            "crossover requires parents of equal length"
        );
        let point = point.min(self.len());
        let splice = |head: &[Direction], tail: &[Direction]| Self {
            actions: head[..point].iter().chain(&tail[point..]).copied().collect(),
            fitness: 0.0,
        };
        (
            splice(&self.actions, &other.actions),
            splice(&other.actions, &self.actions),
        )
    }

    /// Replace each action with probability `rate` by a different, uniformly drawn one.
    pub fn mutate<R: DeterministicRng + ?Sized>(&mut self, rate: f32, rng: &mut R) {
        for action in &mut self.actions {
            if !rng.chance(rate) {
                continue;
            }
            let current = *action;
            let mut next = random_move(rng);
            while next == current {
                next = random_move(rng);
            }
            *action = next;
        }
    }
}

fn random_move<R: DeterministicRng + ?Sized>(rng: &mut R) -> Direction {
    Direction::MOVES[rng.next_below(Direction::MOVES.len())]
}

/// Phenotype letters, e.g. `LLURD`.
impl fmt::Display for CandidatePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            write!(f, "{}", action.letter())?;
        }
        Ok(())
    }
}
