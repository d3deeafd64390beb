// packages/engine/src/runtime/worker.rs
//! Partition worker: the row-major scan run by each forked thread
//!
//! For every cell in its rows, left to right and top to bottom, the worker
//! skips empty cells and agents already tagged with the current chronon,
//! then observes the neighborhood, asks the rule engine for a decision and
//! hands it to the move executor. The worker never holds a row lock across
//! those calls.

use crate::recording::stats::StepTally;
use crate::runtime::partition::RowPartition;
use crate::world::grid::Grid;
use crate::world::movement::MoveExecutor;
use crate::world::neighborhood::Position;
use crate::world::rules::{decide, RuleParams};
use rand::Rng;
use tracing::trace;

/// One worker's view of a chronon
pub struct PartitionWorker<'g, R> {
    grid: &'g Grid,
    params: RuleParams,
    chronon: u64,
    rng: R,
}

impl<'g, R: Rng> PartitionWorker<'g, R> {
    pub fn new(grid: &'g Grid, params: RuleParams, chronon: u64, rng: R) -> Self {
        Self {
            grid,
            params,
            chronon,
            rng,
        }
    }
    
    /// Scan every cell of `partition` once
    pub fn run(mut self, partition: &RowPartition) -> StepTally {
        let executor = MoveExecutor::new(self.grid, self.params.starvation);
        let dim = self.grid.dim();
        let mut tally = StepTally::default();
        
        for row in partition.rows.clone() {
            for col in 0..dim {
                let origin = Position::new(row, col);
                let agent = match self.grid.get(origin) {
                    Some(agent) if !agent.has_acted(self.chronon) => agent,
                    _ => continue,
                };
                
                let neighborhood = self.grid.neighborhood(origin);
                let decision = decide(agent, &neighborhood, &self.params, &mut self.rng);
                let outcome = executor.apply(origin, agent.id, decision, self.chronon);
                tally.record(outcome);
            }
        }
        
        trace!(
            worker = partition.index,
            rows = ?partition.rows,
            acted = tally.acted(),
            "partition scan complete"
        );
        tally
    }
}
