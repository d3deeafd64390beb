// packages/engine/src/world/grid.rs
//! Grid store: the toroidal cell array with one lock per row
//!
//! ```text
//! rows[0]  Mutex ─► [cell, cell, cell, ...]
//! rows[1]  Mutex ─► [cell, cell, cell, ...]
//!  ...
//! rows[N-1] Mutex ─► [cell, cell, cell, ...]
//! ```
//!
//! Single-cell reads take the owning row's lock for the duration of the
//! read only. Writes happen exclusively inside [`Grid::with_rows_locked`],
//! which acquires row locks in ascending index order. No other code path
//! holds two row locks at once, which is what keeps cross-partition moves
//! deadlock free.

use crate::world::agent::{Agent, AgentId, Species};
use crate::world::neighborhood::{Neighborhood, Occupant, Position};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

/// A cell is empty or holds exactly one agent
pub type Cell = Option<Agent>;

/// The shared world grid
pub struct Grid {
    /// Side length
    dim: usize,

    /// One mutual-exclusion lock per row, guarding that row's cells
    rows: Vec<Mutex<Vec<Cell>>>,

    /// Next agent identity to hand out
    next_id: AtomicU64,
}

impl Grid {
    /// Create an empty `dim` x `dim` grid
    pub fn new(dim: usize) -> Self {
        assert!(dim >= 2, "grid dimension must be at least 2");
        let rows = (0..dim).map(|_| Mutex::new(vec![None; dim])).collect();

        Self {
            dim,
            rows,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Allocate a fresh agent identity
    pub fn allocate_id(&self) -> AgentId {
        AgentId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Read one cell, holding its row lock only for the copy
    pub fn get(&self, pos: Position) -> Cell {
        self.check_bounds(pos);
        self.rows[pos.row].lock()[pos.col]
    }

    /// Classify one cell
    pub fn occupant(&self, pos: Position) -> Occupant {
        Occupant::of(self.get(pos).as_ref())
    }

    /// Classify the four orthogonal neighbors of `center`
    pub fn neighborhood(&self, center: Position) -> Neighborhood {
        Neighborhood::observe(center, self.dim, |p| self.occupant(p))
    }

    /// Lock a set of rows in ascending order and run `f` with write access
    ///
    /// Duplicate indices are collapsed so a row is never locked twice.
    /// Guards drop on every exit path, unwinding included.
    pub fn with_rows_locked<R>(&self, rows: &[usize], f: impl FnOnce(&mut LockedRows<'_>) -> R) -> R {
        let mut indices = rows.to_vec();
        indices.sort_unstable();
        indices.dedup();

        let mut guards = Vec::with_capacity(indices.len());
        for row in indices {
            assert!(row < self.dim, "row {} out of bounds for grid of {}", row, self.dim);
            guards.push((row, self.rows[row].lock()));
        }

        let mut locked = LockedRows { guards };
        f(&mut locked)
    }

    /// Place a freshly created agent on an empty cell
    ///
    /// Returns `None` without writing if the cell is occupied.
    pub fn spawn(&self, pos: Position, species: Species, starvation: u32) -> Option<AgentId> {
        self.check_bounds(pos);
        self.with_rows_locked(&[pos.row], |rows| {
            if rows.get(pos).is_some() {
                return None;
            }
            let agent = Agent::newborn(self.allocate_id(), species, starvation);
            rows.set(pos, Some(agent));
            Some(agent.id)
        })
    }

    /// Visit every cell row by row, one row lock at a time
    pub fn for_each_row(&self, mut f: impl FnMut(usize, &[Cell])) {
        for (index, row) in self.rows.iter().enumerate() {
            let guard = row.lock();
            f(index, &guard);
        }
    }

    /// Count agents per species
    pub fn population(&self) -> (usize, usize) {
        let mut prey = 0;
        let mut predators = 0;
        self.for_each_row(|_, cells| {
            for agent in cells.iter().flatten() {
                match agent.species() {
                    Species::Prey => prey += 1,
                    Species::Predator => predators += 1,
                }
            }
        });
        (prey, predators)
    }

    fn check_bounds(&self, pos: Position) {
        assert!(
            pos.row < self.dim && pos.col < self.dim,
            "({}, {}) out of bounds for grid of {}",
            pos.row,
            pos.col,
            self.dim
        );
    }
}

/// Write access to a set of rows whose locks are currently held
pub struct LockedRows<'a> {
    guards: Vec<(usize, MutexGuard<'a, Vec<Cell>>)>,
}

impl<'a> LockedRows<'a> {
    /// Whether `row` is among the held locks
    pub fn holds(&self, row: usize) -> bool {
        self.guards.iter().any(|(index, _)| *index == row)
    }

    /// Read a cell in a held row
    pub fn get(&self, pos: Position) -> Cell {
        let cells = self
            .guards
            .iter()
            .find(|(index, _)| *index == pos.row)
            .map(|(_, guard)| guard)
            .unwrap_or_else(|| panic!("row {} read without holding its lock", pos.row));
        cells[pos.col]
    }

    /// Write a cell in a held row
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let cells = self
            .guards
            .iter_mut()
            .find(|(index, _)| *index == pos.row)
            .map(|(_, guard)| guard)
            .unwrap_or_else(|| panic!("row {} written without holding its lock", pos.row));
        cells[pos.col] = cell;
    }

    /// Remove and return the agent in a cell
    pub fn take(&mut self, pos: Position) -> Cell {
        let cell = self.get(pos);
        self.set(pos, None);
        cell
    }

    /// Held row indices in acquisition order
    pub fn rows(&self) -> Vec<usize> {
        self.guards.iter().map(|(index, _)| *index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4);
        assert_eq!(grid.dim(), 4);
        assert_eq!(grid.population(), (0, 0));
        assert!(grid.get(Position::new(3, 3)).is_none());
    }

    #[test]
    fn test_spawn_rejects_occupied() {
        let grid = Grid::new(3);
        let pos = Position::new(1, 2);

        let first = grid.spawn(pos, Species::Prey, 3);
        assert!(first.is_some());

        let second = grid.spawn(pos, Species::Predator, 3);
        assert!(second.is_none());
        assert_eq!(grid.occupant(pos), Occupant::Prey);
        assert_eq!(grid.population(), (1, 0));
    }

    #[test]
    fn test_rows_locked_in_ascending_order() {
        let grid = Grid::new(6);
        let held = grid.with_rows_locked(&[5, 1, 5, 3], |rows| rows.rows());
        assert_eq!(held, vec![1, 3, 5]);
    }

    #[test]
    fn test_set_and_take() {
        let grid = Grid::new(3);
        let from = Position::new(0, 0);
        let to = Position::new(2, 0);
        grid.spawn(from, Species::Prey, 0).unwrap();

        grid.with_rows_locked(&[from.row, to.row], |rows| {
            let agent = rows.take(from);
            rows.set(to, agent);
        });

        assert!(grid.get(from).is_none());
        assert_eq!(grid.occupant(to), Occupant::Prey);
    }

    #[test]
    #[should_panic(expected = "without holding its lock")]
    fn test_write_outside_held_rows_panics() {
        let grid = Grid::new(3);
        grid.with_rows_locked(&[0], |rows| {
            rows.set(Position::new(1, 1), None);
        });
    }

    #[test]
    fn test_locks_released_after_panic() {
        let grid = Arc::new(Grid::new(3));
        let g = Arc::clone(&grid);

        let result = thread::spawn(move || {
            g.with_rows_locked(&[0, 1], |_| {
                panic!("boom");
            });
        })
        .join();
        assert!(result.is_err());

        // both rows are lockable again
        let held = grid.with_rows_locked(&[1, 0], |rows| rows.rows());
        assert_eq!(held, vec![0, 1]);
    }

    #[test]
    fn test_concurrent_cross_row_writes() {
        let grid = Arc::new(Grid::new(4));
        let mut handles = vec![];

        // opposing lock orders requested from many threads
        for i in 0..8 {
            let g = Arc::clone(&grid);
            handles.push(thread::spawn(move || {
                let (a, b) = if i % 2 == 0 { (0, 3) } else { (3, 0) };
                for _ in 0..1000 {
                    g.with_rows_locked(&[a, b], |rows| {
                        let cell = rows.take(Position::new(a, 0));
                        rows.set(Position::new(a, 0), cell);
                    });
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
