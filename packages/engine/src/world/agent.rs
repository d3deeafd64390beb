// packages/engine/src/world/agent.rs
//! Agent records stored by value in grid cells

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identity of an agent for the lifetime of a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// The two agent types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Prey,
    Predator,
}

/// Type-specific agent state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Prey,
    /// `energy` counts chronons left before starvation
    Predator { energy: i64 },
}

/// A prey or predator occupying one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,

    /// Chronons since birth or the last breed
    pub age: u32,

    /// Chronon in which this agent last acted
    pub acted_in: Option<u64>,
}

impl Agent {
    /// A newborn prey
    pub fn prey(id: AgentId) -> Self {
        Self {
            id,
            kind: AgentKind::Prey,
            age: 0,
            acted_in: None,
        }
    }

    /// A newborn predator with full energy
    pub fn predator(id: AgentId, energy: u32) -> Self {
        Self {
            id,
            kind: AgentKind::Predator {
                energy: i64::from(energy),
            },
            age: 0,
            acted_in: None,
        }
    }

    /// A newborn of the given species
    pub fn newborn(id: AgentId, species: Species, starvation: u32) -> Self {
        match species {
            Species::Prey => Self::prey(id),
            Species::Predator => Self::predator(id, starvation),
        }
    }

    pub fn species(&self) -> Species {
        match self.kind {
            AgentKind::Prey => Species::Prey,
            AgentKind::Predator { .. } => Species::Predator,
        }
    }

    /// Remaining energy, `None` for prey
    pub fn energy(&self) -> Option<i64> {
        match self.kind {
            AgentKind::Prey => None,
            AgentKind::Predator { energy } => Some(energy),
        }
    }

    /// Whether the agent has already acted in `chronon`
    pub fn has_acted(&self, chronon: u64) -> bool {
        self.acted_in == Some(chronon)
    }

    /// Tag the agent as having acted in `chronon`
    pub fn mark_acted(&mut self, chronon: u64) {
        self.acted_in = Some(chronon);
    }

    pub fn is_prey(&self) -> bool {
        matches!(self.kind, AgentKind::Prey)
    }

    pub fn is_predator(&self) -> bool {
        matches!(self.kind, AgentKind::Predator { .. })
    }
}
