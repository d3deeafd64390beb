// packages/engine/src/lib.rs
//! Wa-Tor Simulation Engine Library
//!
//! A predator-prey cellular automaton on a toroidal grid, stepped in
//! parallel by a fork-join scheduler over row partitions.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **world**: grid store, agent rules, move executor, snapshots
//! - **runtime**: row partitioning, partition workers, fork-join scheduler
//! - **recording**: per-chronon statistics and run reports
//! - **render**: ANSI terminal renderer subscribed to snapshots
//! - **observability**: tracing and metrics setup
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! use wator_engine::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     workers: 4,
//!     chronons: 500,
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config)?;
//! let report = sim.run();
//! println!("{} chronons in {:?}", report.totals.chronons, report.elapsed);
//! # Ok::<(), wator_engine::EngineError>(())
//! ```

// Public module exports
pub mod observability;
pub mod recording;
pub mod render;
pub mod runtime;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use recording::{ChrononStats, Exporter, RunReport};
pub use runtime::{SchedulerPhase, Simulation, StopHandle};
pub use utils::config::{EngineConfig, SimulationConfig};
pub use utils::errors::{EngineError, Result};
pub use world::{Occupant, Position, Species, WorldSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Engine build information
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_info() {
        let info = BuildInfo::current();
        assert!(!info.version.is_empty());
        assert!(!info.git_hash.is_empty());
    }
}
