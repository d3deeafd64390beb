// packages/engine/src/utils/config.rs
//! Layered engine configuration
//!
//! Sources, lowest precedence first:
//!
//! ```text
//! serde defaults  →  wator.{toml,yaml,json} or $WATOR_CONFIG  →  WATOR__SECTION__KEY env vars
//! ```
//!
//! Example: `WATOR__SIMULATION__WORKERS=4 WATOR__SIMULATION__GRID_SIZE=200`.

use crate::utils::errors::{EngineError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "WATOR_CONFIG";

/// Base name of the optional configuration file in the working directory
const DEFAULT_CONFIG_BASENAME: &str = "wator";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World and scheduler parameters
    pub simulation: SimulationConfig,

    /// Terminal renderer
    pub render: RenderConfig,

    /// End-of-run report
    pub report: ReportConfig,
}

/// The configuration record consumed by the simulation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial prey population
    pub prey: usize,

    /// Initial predator population
    pub predators: usize,

    /// Chronons a prey must age before it breeds
    pub prey_breed_age: u32,

    /// Chronons a predator must age before it breeds
    pub predator_breed_age: u32,

    /// Predator energy on birth and after feeding; also the starvation bound
    pub starvation: u32,

    /// Side length of the square toroidal grid
    pub grid_size: usize,

    /// Number of row partitions stepped in parallel
    pub workers: usize,

    /// Chronons to run (0 = until stopped)
    pub chronons: u64,

    /// Seed for reproducible runs (entropy when unset)
    pub seed: Option<u64>,

    /// Pause between chronons in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            prey: 200,
            predators: 100,
            prey_breed_age: 3,
            predator_breed_age: 10,
            starvation: 3,
            grid_size: 50,
            workers: 1,
            chronons: 1000,
            seed: None,
            tick_interval_ms: 0,
        }
    }
}

impl SimulationConfig {
    /// Validate the record; failures are fatal and reported before any chronon runs
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }

        if self.workers == 0 {
            return Err(EngineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }

        if self.workers > self.grid_size {
            return Err(EngineError::InvalidConfig(format!(
                "workers ({}) cannot exceed grid_size ({})",
                self.workers, self.grid_size
            )));
        }

        if self.prey_breed_age == 0 || self.predator_breed_age == 0 {
            return Err(EngineError::InvalidConfig(
                "breeding ages must be positive".to_string(),
            ));
        }

        let capacity = self.grid_size.saturating_mul(self.grid_size);
        let population = self.prey.saturating_add(self.predators);
        if population > capacity {
            return Err(EngineError::InvalidConfig(format!(
                "initial population {} exceeds grid capacity {}",
                population, capacity
            )));
        }

        Ok(())
    }

    /// Total number of cells
    pub fn capacity(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

/// Terminal renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw frames to stdout while running
    pub enabled: bool,

    /// Minimum time between drawn frames
    pub frame_delay_ms: u64,

    /// Snapshots buffered before the scheduler starts dropping frames
    pub channel_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frame_delay_ms: 100,
            channel_capacity: 2,
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// End-of-run report settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format for the run report
    pub format: ReportFormat,

    /// Print the Prometheus exposition after the run
    pub prometheus: bool,
}

impl EngineConfig {
    /// Load from defaults, the optional config file and `WATOR__*` environment variables
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let mut builder = Config::builder();

        builder = match explicit.as_deref() {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("WATOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        debug!(path = ?explicit, "configuration sources merged");

        config.simulation.validate()?;
        Ok(config)
    }

    /// Load from a single file on top of the defaults, ignoring the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: EngineConfig = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.simulation.validate()?;
        Ok(config)
    }
}
