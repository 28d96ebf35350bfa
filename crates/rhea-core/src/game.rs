//! Shared game vocabulary: moves, ghosts and per-tick events.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a node in the maze graph.
pub type NodeId = u32;

/// One discrete move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    #[default]
    Neutral,
}

impl Direction {
    /// The action set plans are drawn from. Fixed order: U, R, D, L.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Neutral => Direction::Neutral,
        }
    }

    pub fn is_move(self) -> bool {
        self != Direction::Neutral
    }

    /// Single-letter phenotype code.
    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Neutral => '-',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Ghost {
    Blinky,
    Pinky,
    Inky,
    Sue,
}

impl Ghost {
    pub const COUNT: usize = 4;
    pub const ALL: [Ghost; Ghost::COUNT] = [Ghost::Blinky, Ghost::Pinky, Ghost::Inky, Ghost::Sue];

    pub fn index(self) -> usize {
        match self {
            Ghost::Blinky => 0,
            Ghost::Pinky => 1,
            Ghost::Inky => 2,
            Ghost::Sue => 3,
        }
    }
}

/// Fixed-size map keyed by [`Ghost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GhostMap<T> {
    slots: [T; Ghost::COUNT],
}

impl<T> GhostMap<T> {
    pub fn from_fn(mut f: impl FnMut(Ghost) -> T) -> Self {
        Self {
            slots: Ghost::ALL.map(&mut f),
        }
    }

    pub fn get(&self, ghost: Ghost) -> &T {
        &self.slots[ghost.index()]
    }

    pub fn get_mut(&mut self, ghost: Ghost) -> &mut T {
        &mut self.slots[ghost.index()]
    }

    pub fn set(&mut self, ghost: Ghost, value: T) {
        self.slots[ghost.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ghost, &T)> {
        Ghost::ALL.into_iter().zip(self.slots.iter())
    }
}

impl<T: Clone> GhostMap<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

/// Requested ghost moves for one tick. `None` means "hold previous heading".
pub type GhostMoves = GhostMap<Option<Direction>>;

/// What happened during one call to `ForwardModel::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickEvents {
    pub pills_eaten: u32,
    pub power_pills_eaten: u32,
    /// Score awarded for each ghost eaten this tick.
    pub ghosts_eaten: GhostMap<Option<u32>>,
    pub agent_eaten: bool,
    pub level_cleared: bool,
}

impl TickEvents {
    pub fn was_ghost_eaten(&self, ghost: Ghost) -> bool {
        self.ghosts_eaten.get(ghost).is_some()
    }

    pub fn ghost_points(&self) -> u32 {
        self.ghosts_eaten.iter().filter_map(|(_, v)| *v).sum()
    }

    pub fn any_pill_eaten(&self) -> bool {
        self.pills_eaten > 0 || self.power_pills_eaten > 0
    }
}
