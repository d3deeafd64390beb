// packages/engine/src/world/neighborhood.rs
//! Toroidal geometry and four-neighbor snapshots
//!
//! ```text
//!            N (r-1)
//!   W (c-1)  [r, c]  E (c+1)
//!            S (r+1)
//! ```
//!
//! All offsets wrap modulo the grid dimension on both axes.

use crate::world::agent::{Agent, Species};
use serde::{Deserialize, Serialize};

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbor one step in `direction` on a `dim` x `dim` torus
    pub fn step(self, direction: Direction, dim: usize) -> Self {
        debug_assert!(self.row < dim && self.col < dim);
        match direction {
            Direction::North => Self::new((self.row + dim - 1) % dim, self.col),
            Direction::East => Self::new(self.row, (self.col + 1) % dim),
            Direction::South => Self::new((self.row + 1) % dim, self.col),
            Direction::West => Self::new(self.row, (self.col + dim - 1) % dim),
        }
    }
}

/// Orthogonal directions in enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// What a cell holds, as seen by a neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    Empty,
    Prey,
    Predator,
}

impl Occupant {
    pub fn of(cell: Option<&Agent>) -> Self {
        match cell.map(Agent::species) {
            None => Occupant::Empty,
            Some(Species::Prey) => Occupant::Prey,
            Some(Species::Predator) => Occupant::Predator,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }
}

/// One classified neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub position: Position,
    pub occupant: Occupant,
}

/// Classification of the four orthogonal neighbors, ordered N, E, S, W
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    pub neighbors: [Neighbor; 4],
}

impl Neighborhood {
    /// Build a snapshot by classifying each neighbor of `center`
    pub fn observe(
        center: Position,
        dim: usize,
        mut classify: impl FnMut(Position) -> Occupant,
    ) -> Self {
        let neighbors = Direction::ALL.map(|direction| {
            let position = center.step(direction, dim);
            Neighbor {
                position,
                occupant: classify(position),
            }
        });
        Self { neighbors }
    }

    /// Neighbor positions holding `occupant`, in N, E, S, W order
    pub fn matching(&self, occupant: Occupant) -> Vec<Position> {
        self.neighbors
            .iter()
            .filter(|n| n.occupant == occupant)
            .map(|n| n.position)
            .collect()
    }

    pub fn count(&self, occupant: Occupant) -> usize {
        self.neighbors
            .iter()
            .filter(|n| n.occupant == occupant)
            .count()
    }
}
