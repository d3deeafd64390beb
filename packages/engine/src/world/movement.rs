// packages/engine/src/world/movement.rs
//! Move executor: applies a [`Decision`] to the grid
//!
//! # Locking protocol
//!
//! ```text
//! low  = min(origin.row, dest.row)   ─► lock first
//! high = max(origin.row, dest.row)   ─► lock second (skipped when equal)
//!          write destination, write or clear origin
//!          release both
//! ```
//!
//! The whole update is one critical section over both rows, acquired through
//! [`Grid::with_rows_locked`]. Before writing, the executor re-checks what it
//! is about to overwrite: the origin must still hold the acting agent and the
//! destination must still be empty (move) or prey (eat). Another partition
//! may have changed either cell since the neighborhood was observed; a stale
//! decision is downgraded to staying in place.

use crate::world::agent::{Agent, AgentId};
use crate::world::grid::{Grid, LockedRows};
use crate::world::neighborhood::{Occupant, Position};
use crate::world::rules::{Action, Decision};
use tracing::trace;

/// What actually happened when a decision was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stayed in place by choice
    Stayed,

    /// Moved to an empty cell
    Moved { bred: bool },

    /// Moved onto prey and consumed it
    Ate { bred: bool },

    /// Starved and was removed
    Starved,

    /// The destination changed since it was observed; stayed in place instead
    Blocked,

    /// The acting agent was no longer at its origin (eaten by a neighbor)
    Vanished,
}

/// Applies decisions under the row-locking protocol
pub struct MoveExecutor<'g> {
    grid: &'g Grid,
    starvation: u32,
}

impl<'g> MoveExecutor<'g> {
    pub fn new(grid: &'g Grid, starvation: u32) -> Self {
        Self { grid, starvation }
    }

    /// Apply `decision` for the agent `id` scanned at `origin` during `chronon`
    pub fn apply(&self, origin: Position, id: AgentId, decision: Decision, chronon: u64) -> Outcome {
        match decision.action {
            Action::Stay => self.stay(origin, id, decision.agent, chronon),
            Action::Die => self.die(origin, id),
            Action::Move { to, breed } => {
                self.relocate(origin, to, id, decision, chronon, Occupant::Empty, breed)
            }
            Action::Eat { to, breed } => {
                self.relocate(origin, to, id, decision, chronon, Occupant::Prey, breed)
            }
        }
    }

    fn stay(&self, origin: Position, id: AgentId, mut agent: Agent, chronon: u64) -> Outcome {
        agent.mark_acted(chronon);
        self.grid.with_rows_locked(&[origin.row], |rows| {
            if !holds_agent(rows, origin, id) {
                return Outcome::Vanished;
            }
            rows.set(origin, Some(agent));
            Outcome::Stayed
        })
    }

    fn die(&self, origin: Position, id: AgentId) -> Outcome {
        self.grid.with_rows_locked(&[origin.row], |rows| {
            if !holds_agent(rows, origin, id) {
                return Outcome::Vanished;
            }
            rows.set(origin, None);
            Outcome::Starved
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn relocate(
        &self,
        origin: Position,
        dest: Position,
        id: AgentId,
        decision: Decision,
        chronon: u64,
        expected: Occupant,
        breed: bool,
    ) -> Outcome {
        let low = origin.row.min(dest.row);
        let high = origin.row.max(dest.row);

        self.grid.with_rows_locked(&[low, high], |rows| {
            if !holds_agent(rows, origin, id) {
                trace!(%id, ?origin, "agent left its cell before acting");
                return Outcome::Vanished;
            }

            let found = Occupant::of(rows.get(dest).as_ref());
            if dest == origin || found != expected {
                trace!(%id, ?dest, ?expected, ?found, "destination changed, staying");
                let mut resting = decision.resting;
                resting.mark_acted(chronon);
                rows.set(origin, Some(resting));
                return Outcome::Blocked;
            }

            let mut agent = decision.agent;
            agent.mark_acted(chronon);
            rows.set(dest, Some(agent));

            if breed {
                let mut child = Agent::newborn(self.grid.allocate_id(), agent.species(), self.starvation);
                child.mark_acted(chronon);
                rows.set(origin, Some(child));
            } else {
                rows.set(origin, None);
            }

            assert!(
                rows.get(dest).map(|a| a.id) == Some(id),
                "move of {} to {:?} was not recorded",
                id,
                dest
            );

            match expected {
                Occupant::Prey => Outcome::Ate { bred: breed },
                _ => Outcome::Moved { bred: breed },
            }
        })
    }
}

fn holds_agent(rows: &LockedRows<'_>, pos: Position, id: AgentId) -> bool {
    rows.get(pos).map(|a| a.id) == Some(id)
}
