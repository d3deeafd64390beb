// packages/engine/src/runtime/scheduler.rs
//! Fork-join scheduler driving the simulation one chronon at a time
//!
//! # Chronon lifecycle
//!
//! ```text
//! Idle ─► ResettingFlags ─► Forked ─────────────► Joined ─┬─► (next chronon)
//!         (advance tag)     worker 0: rows 0..k           └─► Done
//!                           worker 1: rows k..2k
//!                           ...
//!                           worker W-1: rows ..N
//! ```
//!
//! Workers are scoped threads spawned fresh for every chronon and joined
//! before the next one starts, so two chronons never overlap. Snapshots for
//! subscribers are captured only after the join.

use crate::recording::report::RunReport;
use crate::recording::stats::{ChrononStats, RunTotals, StepTally};
use crate::runtime::partition::{partition_rows, RowPartition};
use crate::runtime::worker::PartitionWorker;
use crate::utils::config::SimulationConfig;
use crate::utils::errors::{EngineError, Result};
use crate::world::agent::{Agent, AgentId, Species};
use crate::world::grid::Grid;
use crate::world::neighborhood::Position;
use crate::world::populate::populate;
use crate::world::rules::RuleParams;
use crate::world::snapshot::{Population, WorldSnapshot};
use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};
use ulid::Ulid;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Between chronons
    Idle,

    /// Clearing every agent's acted flag
    ResettingFlags,

    /// Workers are scanning their partitions
    Forked,

    /// All workers finished the last chronon
    Joined,

    /// The run loop has ended
    Done,
}

/// Requests termination of an unbounded (or long) run between chronons
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// A Wa-Tor world plus the fork-join scheduler that advances it
pub struct Simulation {
    /// Validated configuration
    config: SimulationConfig,

    /// Rule parameters derived from the configuration
    params: RuleParams,

    /// Shared grid
    grid: Grid,

    /// Row partitions, one per worker
    partitions: Vec<RowPartition>,

    /// Completed chronons
    chronon: u64,

    /// Current scheduler state
    phase: SchedulerPhase,

    /// External stop request
    stop: StopHandle,

    /// Snapshot subscribers (renderers)
    subscribers: Vec<Sender<Arc<WorldSnapshot>>>,
}

impl Simulation {
    /// Create a world populated with the configured prey and predators
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let sim = Self::build(config)?;

        let mut rng = match sim.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        populate(&sim.grid, &sim.config, &mut rng)?;

        info!(
            grid_size = sim.config.grid_size,
            workers = sim.config.workers,
            prey = sim.config.prey,
            predators = sim.config.predators,
            "world created"
        );
        Ok(sim)
    }

    /// Create an empty world; agents are added with [`Simulation::place`]
    ///
    /// The configured population counts are ignored.
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        Self::build(SimulationConfig {
            prey: 0,
            predators: 0,
            ..config
        })
    }

    fn build(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let grid = Grid::new(config.grid_size);
        let partitions = partition_rows(config.grid_size, config.workers);

        Ok(Self {
            params: RuleParams::from(&config),
            config,
            grid,
            partitions,
            chronon: 0,
            phase: SchedulerPhase::Idle,
            stop: StopHandle::default(),
            subscribers: Vec::new(),
        })
    }

    /// Place a newborn agent on an empty cell
    pub fn place(&mut self, pos: Position, species: Species) -> Result<AgentId> {
        let dim = self.grid.dim();
        if pos.row >= dim || pos.col >= dim {
            return Err(EngineError::InvalidPlacement {
                row: pos.row,
                col: pos.col,
                reason: format!("outside the {}x{} grid", dim, dim),
            });
        }

        self.grid
            .spawn(pos, species, self.config.starvation)
            .ok_or_else(|| EngineError::InvalidPlacement {
                row: pos.row,
                col: pos.col,
                reason: "cell already occupied".to_string(),
            })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn partitions(&self) -> &[RowPartition] {
        &self.partitions
    }

    /// Chronons completed so far
    pub fn chronon(&self) -> u64 {
        self.chronon
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// The agent currently at `pos`
    pub fn agent_at(&self, pos: Position) -> Option<Agent> {
        self.grid.get(pos)
    }

    pub fn population(&self) -> Population {
        let (prey, predators) = self.grid.population();
        Population { prey, predators }
    }

    /// Read-only view of the grid as of the last completed chronon
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.grid, self.chronon)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Subscribe to post-chronon snapshots
    ///
    /// Frames are dropped rather than queued once `capacity` snapshots are
    /// pending, so a slow subscriber never stalls the scheduler.
    pub fn subscribe(&mut self, capacity: usize) -> Receiver<Arc<WorldSnapshot>> {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        self.subscribers.push(tx);
        rx
    }

    /// Advance the world by one chronon
    pub fn step(&mut self) -> ChrononStats {
        let before = self.population();

        // Advancing the chronon index clears every agent's acted flag at once
        self.phase = SchedulerPhase::ResettingFlags;
        let current = self.chronon + 1;

        self.phase = SchedulerPhase::Forked;
        let start = Instant::now();
        let tally = self.fork_join(current);
        let elapsed = start.elapsed();

        self.phase = SchedulerPhase::Joined;
        self.chronon = current;

        let stats = ChrononStats {
            chronon: current,
            before,
            after: self.population(),
            tally,
            elapsed,
        };
        debug_assert!(stats.is_balanced(), "population bookkeeping drifted: {:?}", stats);

        record_metrics(&stats);
        debug!(
            chronon = current,
            prey = stats.after.prey,
            predators = stats.after.predators,
            births = tally.births,
            deaths = tally.deaths(),
            blocked = tally.blocked,
            elapsed_us = elapsed.as_micros() as u64,
            "chronon complete"
        );

        self.publish();
        stats
    }

    /// Run until the configured chronon limit or an external stop
    pub fn run(&mut self) -> RunReport {
        let run_id = Ulid::new();
        let started_at = Utc::now();
        let initial = self.population();
        let limit = self.config.chronons;
        let tick = Duration::from_millis(self.config.tick_interval_ms);

        info!(%run_id, limit, workers = self.config.workers, "run started");
        self.publish();

        let start = Instant::now();
        let mut totals = RunTotals::default();
        let mut stopped = false;

        while limit == 0 || totals.chronons < limit {
            if self.stop.is_stopped() {
                stopped = true;
                break;
            }

            let stats = self.step();
            totals.add(&stats);

            if !tick.is_zero() {
                self.phase = SchedulerPhase::Idle;
                std::thread::sleep(tick);
            }
        }

        let elapsed = start.elapsed();
        self.phase = SchedulerPhase::Done;

        let final_population = self.population();
        info!(
            %run_id,
            chronons = totals.chronons,
            elapsed_ms = elapsed.as_millis() as u64,
            prey = final_population.prey,
            predators = final_population.predators,
            stopped,
            "run finished"
        );

        RunReport {
            run_id,
            started_at,
            workers: self.config.workers,
            grid_size: self.config.grid_size,
            elapsed,
            initial,
            final_population,
            totals,
            stopped,
        }
    }

    /// Fork one scoped thread per partition and join them all
    fn fork_join(&self, chronon: u64) -> StepTally {
        let grid = &self.grid;
        let params = self.params;
        let rngs: Vec<StdRng> = self
            .partitions
            .iter()
            .map(|p| self.worker_rng(chronon, p.index))
            .collect();

        let joined = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = self
                .partitions
                .iter()
                .zip(rngs)
                .map(|(partition, rng)| {
                    scope.spawn(move |_| PartitionWorker::new(grid, params, chronon, rng).run(partition))
                })
                .collect();

            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });

        // A worker panic means a grid invariant broke; surface it here
        let results = joined.unwrap_or_else(|payload| panic::resume_unwind(payload));
        let mut tally = StepTally::default();
        for result in results {
            match result {
                Ok(partial) => tally.merge(&partial),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        tally
    }

    fn worker_rng(&self, chronon: u64, worker: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(
                seed ^ chronon.wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    ^ (worker as u64 + 1).wrapping_mul(0xC2B2_AE3D_27D4_EB4F),
            ),
            None => StdRng::from_entropy(),
        }
    }

    /// Offer a snapshot to every subscriber without blocking
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }

        let snapshot = Arc::new(self.snapshot());
        self.subscribers.retain(|tx| match tx.try_send(Arc::clone(&snapshot)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!(chronon = snapshot.chronon, "subscriber lagging, frame dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("snapshot subscriber disconnected");
                false
            }
        });
    }
}

fn record_metrics(stats: &ChrononStats) {
    metrics::counter!("wator_chronons_total").increment(1);
    metrics::counter!("wator_births_total").increment(stats.tally.births);
    metrics::counter!("wator_starvations_total").increment(stats.tally.starvations);
    metrics::counter!("wator_prey_eaten_total").increment(stats.tally.prey_eaten);
    metrics::counter!("wator_blocked_moves_total").increment(stats.tally.blocked);
    metrics::gauge!("wator_prey").set(stats.after.prey as f64);
    metrics::gauge!("wator_predators").set(stats.after.predators as f64);
    metrics::histogram!("wator_chronon_seconds").record(stats.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::neighborhood::Occupant;

    fn small_config(workers: usize) -> SimulationConfig {
        SimulationConfig {
            grid_size: 10,
            workers,
            prey: 30,
            predators: 10,
            chronons: 5,
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(small_config(2)).unwrap();
        assert_eq!(sim.chronon(), 0);
        assert_eq!(sim.phase(), SchedulerPhase::Idle);
        assert_eq!(sim.population(), Population { prey: 30, predators: 10 });
        assert_eq!(sim.partitions().len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            grid_size: 4,
            workers: 5,
            ..small_config(1)
        };
        assert!(matches!(Simulation::new(config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_step_advances_and_joins() {
        let mut sim = Simulation::new(small_config(3)).unwrap();
        let stats = sim.step();

        assert_eq!(stats.chronon, 1);
        assert_eq!(sim.chronon(), 1);
        assert_eq!(sim.phase(), SchedulerPhase::Joined);
        assert!(stats.is_balanced());
    }

    #[test]
    fn test_run_respects_limit() {
        let mut sim = Simulation::new(small_config(2)).unwrap();
        let report = sim.run();

        assert_eq!(report.totals.chronons, 5);
        assert_eq!(report.workers, 2);
        assert!(!report.stopped);
        assert_eq!(sim.phase(), SchedulerPhase::Done);
        assert_eq!(report.final_population, sim.population());
    }

    #[test]
    fn test_stop_handle_ends_unbounded_run() {
        let config = SimulationConfig {
            chronons: 0,
            ..small_config(2)
        };
        let mut sim = Simulation::new(config).unwrap();
        let stop = sim.stop_handle();
        stop.stop();

        let report = sim.run();
        assert!(report.stopped);
        assert_eq!(report.totals.chronons, 0);
    }

    #[test]
    fn test_seeded_single_worker_is_reproducible() {
        let mut a = Simulation::new(small_config(1)).unwrap();
        let mut b = Simulation::new(small_config(1)).unwrap();
        for _ in 0..20 {
            a.step();
            b.step();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_place() {
        let mut sim = Simulation::empty(SimulationConfig {
            grid_size: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sim.population().total(), 0);

        sim.place(Position::new(0, 0), Species::Prey).unwrap();
        assert!(sim.place(Position::new(0, 0), Species::Predator).is_err());
        assert!(sim.place(Position::new(3, 0), Species::Predator).is_err());
        assert_eq!(sim.snapshot().get(Position::new(0, 0)), Occupant::Prey);
    }

    #[test]
    fn test_subscribers_receive_post_join_snapshots() {
        let mut sim = Simulation::new(small_config(2)).unwrap();
        let rx = sim.subscribe(8);

        sim.step();
        sim.step();

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.chronon, 1);
        assert_eq!(second.chronon, 2);
        assert_eq!(second.population(), sim.population());
    }

    #[test]
    fn test_lagging_subscriber_never_blocks() {
        let mut sim = Simulation::new(small_config(2)).unwrap();
        let rx = sim.subscribe(1);

        for _ in 0..10 {
            sim.step();
        }

        // only the first frame was buffered; the rest were dropped
        assert_eq!(rx.try_recv().unwrap().chronon, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscriber_is_removed() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        drop(sim.subscribe(1));
        sim.step();
        assert!(sim.subscribers.is_empty());
    }
}
