// packages/engine/src/render/mod.rs
//! Terminal rendering
//!
//! Renderers are passive subscribers: they receive immutable snapshots over
//! a bounded channel and never touch the grid or its locks.

pub mod ansi;

pub use ansi::{render_frame, AnsiRenderer};
