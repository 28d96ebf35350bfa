//! Belief estimators for partially observable games.
//!
//! The controller owns one ghost estimator and one pill estimator, feeds them
//! each tick's observations, and samples them to determinize the forward model
//! before planning.

use std::collections::BTreeMap;

use rhea_core::{DeterministicRng, Direction, Ghost, GhostMap, NodeId};

/// A believed ghost position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostSighting {
    pub node: NodeId,
    pub last_move: Direction,
    /// Ticks since the ghost was last seen.
    pub age: u32,
}

pub trait GhostBelief {
    fn reset(&mut self);

    fn observe(&mut self, ghost: Ghost, node: NodeId, last_move: Direction);

    /// `node` is in sight and `ghost` is not on it.
    fn observe_not_present(&mut self, ghost: Ghost, node: NodeId);

    /// Nodes the ghost may currently occupy.
    fn candidate_nodes(&self, ghost: Ghost) -> Vec<NodeId>;

    /// One believed position per ghost, `None` when nothing is known.
    fn sample(&mut self, rng: &mut dyn DeterministicRng) -> GhostMap<Option<GhostSighting>>;

    /// Age the belief by one tick.
    fn advance(&mut self);
}

pub const DEFAULT_MEMORY_TICKS: u32 = 40;

/// Remembers where each ghost was last seen until the sighting is refuted or too old.
#[derive(Debug, Clone)]
pub struct LastSeenGhosts {
    memory_ticks: u32,
    sightings: GhostMap<Option<GhostSighting>>,
}

impl Default for LastSeenGhosts {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_TICKS)
    }
}

impl LastSeenGhosts {
    pub fn new(memory_ticks: u32) -> Self {
        Self {
            memory_ticks,
            sightings: GhostMap::default(),
        }
    }

    pub fn sighting(&self, ghost: Ghost) -> Option<GhostSighting> {
        *self.sightings.get(ghost)
    }
}

impl GhostBelief for LastSeenGhosts {
    fn reset(&mut self) {
        self.sightings = GhostMap::default();
    }

    fn observe(&mut self, ghost: Ghost, node: NodeId, last_move: Direction) {
        self.sightings.set(
            ghost,
            Some(GhostSighting {
                node,
                last_move,
                age: 0,
            }),
        );
    }

    fn observe_not_present(&mut self, ghost: Ghost, node: NodeId) {
        if self.sighting(ghost).is_some_and(|s| s.node == node) {
            self.sightings.set(ghost, None);
        }
    }

    fn candidate_nodes(&self, ghost: Ghost) -> Vec<NodeId> {
        self.sighting(ghost).map(|s| s.node).into_iter().collect()
    }

    fn sample(&mut self, _rng: &mut dyn DeterministicRng) -> GhostMap<Option<GhostSighting>> {
        self.sightings
    }

    fn advance(&mut self) {
        let limit = self.memory_ticks;
        for ghost in Ghost::ALL {
            let slot = self.sightings.get_mut(ghost);
            *slot = slot
                .map(|s| GhostSighting { age: s.age + 1, ..s })
                .filter(|s| s.age <= limit);
        }
    }
}

pub trait PillBelief {
    /// Start a new maze with every listed pill present.
    fn reset(&mut self, pills: &[NodeId]);

    fn observe(&mut self, node: NodeId, available: bool);

    /// Believed availability of every tracked pill.
    fn believed(&self) -> Vec<(NodeId, bool)>;
}

/// Assumes a pill is present until it is seen eaten.
#[derive(Debug, Clone, Default)]
pub struct PillMemory {
    pills: BTreeMap<NodeId, bool>,
}

impl PillMemory {
    pub fn is_available(&self, node: NodeId) -> Option<bool> {
        self.pills.get(&node).copied()
    }

    pub fn remaining(&self) -> usize {
        self.pills.values().filter(|&&available| available).count()
    }
}

impl PillBelief for PillMemory {
    fn reset(&mut self, pills: &[NodeId]) {
        self.pills = pills.iter().map(|&node| (node, true)).collect();
    }

    fn observe(&mut self, node: NodeId, available: bool) {
        if let Some(slot) = self.pills.get_mut(&node) {
            *slot = available;
        }
    }

    fn believed(&self) -> Vec<(NodeId, bool)> {
        self.pills.iter().map(|(&node, &available)| (node, available)).collect()
    }
}
