// packages/engine/src/recording/report.rs
//! End-of-run report handed to the benchmark/report collaborator

use crate::recording::stats::RunTotals;
use crate::world::snapshot::Population;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ulid::Ulid;

/// Summary of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: Ulid,
    
    /// When the first chronon started
    pub started_at: DateTime<Utc>,
    
    /// Worker count used for every chronon
    pub workers: usize,
    
    /// Grid side length
    pub grid_size: usize,
    
    /// Wall-clock time from the first fork to the last join
    pub elapsed: Duration,
    
    /// Population when the run started
    pub initial: Population,
    
    /// Population after the last completed chronon
    pub final_population: Population,
    
    /// Cumulative outcome counts
    pub totals: RunTotals,
    
    /// Whether an external stop ended the run before its chronon limit
    pub stopped: bool,
}

impl RunReport {
    /// Completed chronons per second of wall time
    pub fn chronons_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.totals.chronons as f64 / secs
        }
    }
}
