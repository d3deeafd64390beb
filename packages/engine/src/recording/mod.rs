// packages/engine/src/recording/mod.rs
//! Run statistics and reporting
//!
//! - **Stats**: per-worker outcome tallies merged at each join
//! - **Report**: end-of-run summary (timing, worker count, populations)
//! - **Exporter**: text and JSON rendering of reports
//!
//! # Flow
//!
//! ```text
//! worker 0 ─► StepTally ─┐
//! worker 1 ─► StepTally ─┼─► join ─► ChrononStats ─► RunTotals ─► RunReport ─► Exporter
//! worker W ─► StepTally ─┘
//! ```

pub mod exporter;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use exporter::Exporter;
pub use report::RunReport;
pub use stats::{ChrononStats, RunTotals, StepTally};
