// packages/engine/src/world/mod.rs
//! The Wa-Tor world
//!
//! - **Grid**: toroidal cell array with one lock per row
//! - **Agent**: prey and predator records stored by value in cells
//! - **Neighborhood**: toroidal geometry and four-neighbor snapshots
//! - **Rules**: pure per-agent decision logic
//! - **Movement**: applies decisions under the row-locking protocol
//! - **Snapshot**: immutable post-chronon view for renderers
//! - **Populate**: initial random placement
//!
//! # Data flow for one agent
//!
//! ```text
//! Grid::get ─► Grid::neighborhood ─► rules::decide ─► MoveExecutor::apply
//!  (1 lock)      (1 lock per read)      (no locks)      (low row, then high row)
//! ```

pub mod agent;
pub mod grid;
pub mod movement;
pub mod neighborhood;
pub mod populate;
pub mod rules;
pub mod snapshot;

// Re-export commonly used types
pub use agent::{Agent, AgentId, AgentKind, Species};
pub use grid::{Cell, Grid, LockedRows};
pub use movement::{MoveExecutor, Outcome};
pub use neighborhood::{Direction, Neighbor, Neighborhood, Occupant, Position};
pub use rules::{decide, Action, Decision, RuleParams};
pub use snapshot::{Population, WorldSnapshot};
