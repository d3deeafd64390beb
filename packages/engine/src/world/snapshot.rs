// packages/engine/src/world/snapshot.rs
//! Immutable post-chronon view of the grid for renderers and reports

use crate::world::grid::Grid;
use crate::world::neighborhood::{Occupant, Position};
use serde::{Deserialize, Serialize};

/// Agent counts per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub prey: usize,
    pub predators: usize,
}

impl Population {
    pub fn total(&self) -> usize {
        self.prey + self.predators
    }
}

/// Occupancy of every cell at the end of a chronon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Chronons completed when the snapshot was taken
    pub chronon: u64,

    /// Side length
    pub dim: usize,

    /// Row-major cell classification
    pub cells: Vec<Occupant>,
}

impl WorldSnapshot {
    /// Capture the grid; callers take snapshots only between chronons
    pub fn capture(grid: &Grid, chronon: u64) -> Self {
        let dim = grid.dim();
        let mut cells = Vec::with_capacity(dim * dim);
        grid.for_each_row(|_, row| {
            cells.extend(row.iter().map(|cell| Occupant::of(cell.as_ref())));
        });

        Self { chronon, dim, cells }
    }

    pub fn get(&self, pos: Position) -> Occupant {
        self.cells[pos.row * self.dim + pos.col]
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Occupant]> {
        self.cells.chunks(self.dim)
    }

    pub fn population(&self) -> Population {
        self.cells.iter().fold(Population::default(), |mut acc, cell| {
            match cell {
                Occupant::Prey => acc.prey += 1,
                Occupant::Predator => acc.predators += 1,
                Occupant::Empty => {}
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::agent::Species;

    #[test]
    fn test_capture() {
        let grid = Grid::new(3);
        grid.spawn(Position::new(0, 2), Species::Prey, 1).unwrap();
        grid.spawn(Position::new(2, 0), Species::Predator, 1).unwrap();

        let snapshot = WorldSnapshot::capture(&grid, 7);
        assert_eq!(snapshot.chronon, 7);
        assert_eq!(snapshot.cells.len(), 9);
        assert_eq!(snapshot.get(Position::new(0, 2)), Occupant::Prey);
        assert_eq!(snapshot.get(Position::new(2, 0)), Occupant::Predator);
        assert_eq!(snapshot.get(Position::new(1, 1)), Occupant::Empty);
        assert_eq!(snapshot.population(), Population { prey: 1, predators: 1 });
        assert_eq!(snapshot.rows().count(), 3);
    }

    #[test]
    fn test_serializes_to_json() {
        let grid = Grid::new(2);
        grid.spawn(Position::new(1, 1), Species::Prey, 1).unwrap();

        let json = serde_json::to_value(WorldSnapshot::capture(&grid, 0)).unwrap();
        assert_eq!(json["dim"], 2);
        assert_eq!(json["cells"][3], "prey");
    }
}
