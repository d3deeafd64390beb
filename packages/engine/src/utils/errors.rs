// packages/engine/src/utils/errors.rs
//! Engine error types
//!
//! Only configuration-time failures are recoverable. Once a world is
//! running, every agent action has a defined outcome; broken grid
//! invariants are assertion panics rather than error values.

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration values rejected before any chronon runs
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    
    /// Configuration could not be read from file or environment
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),
    
    /// Explicit placement while seeding a world
    #[error("cannot place agent at ({row}, {col}): {reason}")]
    InvalidPlacement {
        row: usize,
        col: usize,
        reason: String,
    },
    
    /// Tracing or metrics could not be installed
    #[error("observability setup failed: {0}")]
    Observability(String),
    
    /// Run report could not be serialized
    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl EngineError {
    /// Whether the error was raised while validating or loading configuration
    pub fn is_config(&self) -> bool {
        matches!(self, EngineError::InvalidConfig(_) | EngineError::ConfigLoad(_))
    }
}
