// packages/engine/src/recording/stats.rs
//! Per-worker tallies and per-chronon statistics
//!
//! Workers count outcomes locally and hand their tally back at the join,
//! so nothing is shared while a chronon is in flight.

use crate::world::movement::Outcome;
use crate::world::snapshot::Population;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome counts from one partition scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTally {
    /// Agents that stayed by choice
    pub stayed: u64,

    /// Moves onto empty cells
    pub moved: u64,

    /// Offspring left behind
    pub births: u64,

    /// Predators that starved
    pub starvations: u64,

    /// Prey consumed by predators
    pub prey_eaten: u64,

    /// Decisions downgraded because the destination changed
    pub blocked: u64,

    /// Agents gone from their cell before they could act
    pub vanished: u64,
}

impl StepTally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Stayed => self.stayed += 1,
            Outcome::Moved { bred } => {
                self.moved += 1;
                self.births += u64::from(bred);
            }
            Outcome::Ate { bred } => {
                self.prey_eaten += 1;
                self.births += u64::from(bred);
            }
            Outcome::Starved => self.starvations += 1,
            Outcome::Blocked => self.blocked += 1,
            Outcome::Vanished => self.vanished += 1,
        }
    }

    pub fn merge(&mut self, other: &StepTally) {
        self.stayed += other.stayed;
        self.moved += other.moved;
        self.births += other.births;
        self.starvations += other.starvations;
        self.prey_eaten += other.prey_eaten;
        self.blocked += other.blocked;
        self.vanished += other.vanished;
    }

    /// Agents that performed their action this chronon
    pub fn acted(&self) -> u64 {
        self.stayed + self.moved + self.prey_eaten + self.starvations + self.blocked
    }

    /// Agents removed from the world
    pub fn deaths(&self) -> u64 {
        self.starvations + self.prey_eaten
    }
}

impl<'a> std::iter::Sum<&'a StepTally> for StepTally {
    fn sum<I: Iterator<Item = &'a StepTally>>(iter: I) -> Self {
        iter.fold(StepTally::default(), |mut acc, t| {
            acc.merge(t);
            acc
        })
    }
}

/// Statistics for one completed chronon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChrononStats {
    /// Chronon number (1-based)
    pub chronon: u64,

    /// Population before the chronon started
    pub before: Population,

    /// Population after the join
    pub after: Population,

    /// Merged worker tallies
    pub tally: StepTally,

    /// Wall time of the fork-join step
    pub elapsed: Duration,
}

impl ChrononStats {
    /// Whether `after = before + births - deaths` holds
    pub fn is_balanced(&self) -> bool {
        let expected = self.before.total() as i128 + self.tally.births as i128
            - self.tally.deaths() as i128;
        expected == self.after.total() as i128
    }
}

/// Cumulative totals over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub chronons: u64,
    pub tally: StepTally,

    /// Summed step time, excluding pacing
    pub step_time: Duration,
}

impl RunTotals {
    pub fn add(&mut self, stats: &ChrononStats) {
        self.chronons += 1;
        self.tally.merge(&stats.tally);
        self.step_time += stats.elapsed;
    }

    pub fn avg_step_time(&self) -> Duration {
        if self.chronons == 0 {
            Duration::ZERO
        } else {
            let nanos = self.step_time.as_nanos() / u128::from(self.chronons);
            Duration::from_nanos(nanos as u64)
        }
    }
}
