// packages/engine/src/runtime/mod.rs
//! Parallel stepping runtime
//!
//! This module drives the world forward one chronon at a time:
//!
//! - **Partition**: splits grid rows into contiguous per-worker ranges
//! - **Worker**: row-major scan of one partition
//! - **Scheduler**: fork-join loop, stop handling and snapshot publishing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Simulation                         │
//! │                                                         │
//! │   advance chronon tag (all agents become unacted)       │
//! │                      │                                  │
//! │        ┌─────────────┼─────────────┐   fork             │
//! │        ▼             ▼             ▼                    │
//! │   ┌─────────┐   ┌─────────┐   ┌─────────┐               │
//! │   │ rows    │   │ rows    │   │ rows    │               │
//! │   │ 0..k    │   │ k..2k   │   │ 2k..N   │  ...          │
//! │   └─────────┘   └─────────┘   └─────────┘               │
//! │        │             │             │      join          │
//! │        └─────────────┼─────────────┘                    │
//! │                      ▼                                  │
//! │          merge tallies, publish snapshot                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Cross-partition moves are safe because every multi-row write locks its
//! rows in ascending index order, whichever worker issues it.

pub mod partition;
pub mod scheduler;
pub mod worker;

// Re-export commonly used types
pub use partition::{partition_rows, RowPartition};
pub use scheduler::{SchedulerPhase, Simulation, StopHandle};
pub use worker::PartitionWorker;
