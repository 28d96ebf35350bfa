use std::collections::VecDeque;

use rhea_core::{Direction, Ghost, GhostMap, NodeId};

use crate::error::{MazeError, Result};

const UNREACHABLE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Floor,
    Pill,
    PowerPill,
}

/// Static maze topology: nodes, adjacency, pill positions and all-pairs distances.
///
/// Immutable once parsed; games share it behind an `Arc` so snapshots stay cheap.
#[derive(Debug, Clone)]
pub struct MazeLayout {
    width: usize,
    height: usize,
    cells: Vec<Option<NodeId>>,
    coords: Vec<(usize, usize)>,
    // Neighbour per node, in `Direction::MOVES` order.
    adjacency: Vec<[Option<NodeId>; 4]>,
    distances: Vec<u32>,
    pills: Vec<NodeId>,
    power_pills: Vec<NodeId>,
    // Indexed by node.
    pill_slots: Vec<bool>,
    power_pill_slots: Vec<bool>,
    agent_start: NodeId,
    lair: NodeId,
    ghost_starts: GhostMap<Option<NodeId>>,
}

impl MazeLayout {
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        let mut tiles = vec![Tile::Wall; width * height];
        let mut agent_start = None;
        let mut lair = None;
        let mut ghost_starts: GhostMap<Option<(usize, usize)>> = GhostMap::default();

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Pill,
                    'o' => Tile::PowerPill,
                    ' ' => Tile::Floor,
                    'P' => {
                        if agent_start.replace((x, y)).is_some() {
                            return Err(MazeError::Duplicate { tile: ch });
                        }
                        Tile::Floor
                    }
                    'G' => {
                        if lair.replace((x, y)).is_some() {
                            return Err(MazeError::Duplicate { tile: ch });
                        }
                        Tile::Floor
                    }
                    '1'..='4' => {
                        let ghost = Ghost::ALL[(ch as u8 - b'1') as usize];
                        if ghost_starts.get_mut(ghost).replace((x, y)).is_some() {
                            return Err(MazeError::Duplicate { tile: ch });
                        }
                        Tile::Floor
                    }
                    other => {
                        return Err(MazeError::UnknownTile {
                            tile: other,
                            row: y,
                            col: x,
                        })
                    }
                };
                tiles[y * width + x] = tile;
            }
        }

        let mut cells = vec![None; width * height];
        let mut coords = Vec::new();
        let mut pills = Vec::new();
        let mut power_pills = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let tile = tiles[y * width + x];
                if tile == Tile::Wall {
                    continue;
                }
                let id = coords.len() as NodeId;
                cells[y * width + x] = Some(id);
                coords.push((x, y));
                match tile {
                    Tile::Pill => pills.push(id),
                    Tile::PowerPill => power_pills.push(id),
                    _ => {}
                }
            }
        }
        if coords.is_empty() {
            return Err(MazeError::Empty);
        }

        let node_at = |(x, y): (usize, usize)| cells[y * width + x];
        let agent_start = agent_start
            .and_then(node_at)
            .ok_or(MazeError::MissingAgent)?;
        let ghost_starts = GhostMap::from_fn(|g| ghost_starts.get(g).and_then(node_at));
        let lair = lair
            .and_then(node_at)
            .or_else(|| Ghost::ALL.iter().find_map(|&g| *ghost_starts.get(g)))
            .unwrap_or(agent_start);

        let adjacency = coords
            .iter()
            .map(|&(x, y)| {
                Direction::MOVES.map(|d| {
                    let (nx, ny) = match d {
                        Direction::Up => (x as isize, y as isize - 1),
                        Direction::Right => (x as isize + 1, y as isize),
                        Direction::Down => (x as isize, y as isize + 1),
                        Direction::Left => (x as isize - 1, y as isize),
                        Direction::Neutral => return None,
                    };
                    if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                        return None;
                    }
                    cells[ny as usize * width + nx as usize]
                })
            })
            .collect::<Vec<_>>();

        let distances = all_pairs_distances(&adjacency);
        let mut pill_slots = vec![false; coords.len()];
        let mut power_pill_slots = vec![false; coords.len()];
        for &p in &pills {
            pill_slots[p as usize] = true;
        }
        for &p in &power_pills {
            power_pill_slots[p as usize] = true;
        }

        Ok(Self {
            width,
            height,
            cells,
            coords,
            adjacency,
            distances,
            pills,
            power_pills,
            pill_slots,
            power_pill_slots,
            agent_start,
            lair,
            ghost_starts,
        })
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn node_at(&self, x: usize, y: usize) -> Option<NodeId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn coords(&self, node: NodeId) -> Option<(usize, usize)> {
        self.coords.get(node as usize).copied()
    }

    pub fn neighbour(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        let slot = Direction::MOVES.iter().position(|&d| d == direction)?;
        self.adjacency.get(node as usize)?[slot]
    }

    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<u32> {
        let n = self.node_count();
        let (from, to) = (from as usize, to as usize);
        if from >= n || to >= n {
            return None;
        }
        match self.distances[from * n + to] {
            UNREACHABLE => None,
            d => Some(d),
        }
    }

    pub fn pills(&self) -> &[NodeId] {
        &self.pills
    }

    pub fn power_pills(&self) -> &[NodeId] {
        &self.power_pills
    }

    /// Whether the layout places a regular pill on `node`.
    pub fn is_pill_slot(&self, node: NodeId) -> bool {
        self.pill_slots.get(node as usize).copied().unwrap_or(false)
    }

    pub fn is_power_pill_slot(&self, node: NodeId) -> bool {
        self.power_pill_slots.get(node as usize).copied().unwrap_or(false)
    }

    pub fn agent_start(&self) -> NodeId {
        self.agent_start
    }

    pub fn lair(&self) -> NodeId {
        self.lair
    }

    pub fn ghost_start(&self, ghost: Ghost) -> Option<NodeId> {
        *self.ghost_starts.get(ghost)
    }

    /// Straight, unobstructed row or column between two nodes.
    pub fn line_of_sight(&self, from: NodeId, to: NodeId) -> bool {
        let (Some((fx, fy)), Some((tx, ty))) = (self.coords(from), self.coords(to)) else {
            return false;
        };
        if fx == tx {
            let (lo, hi) = (fy.min(ty), fy.max(ty));
            (lo..=hi).all(|y| self.node_at(fx, y).is_some())
        } else if fy == ty {
            let (lo, hi) = (fx.min(tx), fx.max(tx));
            (lo..=hi).all(|x| self.node_at(x, fy).is_some())
        } else {
            false
        }
    }
}

fn all_pairs_distances(adjacency: &[[Option<NodeId>; 4]]) -> Vec<u32> {
    let n = adjacency.len();
    let mut distances = vec![UNREACHABLE; n * n];
    let mut queue = VecDeque::with_capacity(n);
    for source in 0..n {
        let row = &mut distances[source * n..(source + 1) * n];
        row[source] = 0;
        queue.clear();
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            let next_distance = row[node] + 1;
            for next in adjacency[node].iter().flatten() {
                let next = *next as usize;
                if row[next] == UNREACHABLE {
                    row[next] = next_distance;
                    queue.push_back(next);
                }
            }
        }
    }
    distances
}
