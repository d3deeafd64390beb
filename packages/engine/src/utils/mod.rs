// packages/engine/src/utils/mod.rs
//! Common utilities shared by the engine
//!
//! - **Config**: layered configuration loading and validation
//! - **Errors**: the engine error taxonomy and `Result` alias

pub mod config;
pub mod errors;

pub use config::{EngineConfig, RenderConfig, ReportConfig, ReportFormat, SimulationConfig};
pub use errors::{EngineError, Result};
