// packages/engine/src/world/rules.rs
//! Agent rule engine
//!
//! Decides what one agent intends to do this chronon from its own state and
//! a snapshot of its four neighbors. Nothing here touches the grid; the
//! returned [`Decision`] is applied by the move executor.
//!
//! - **Prey**: age, then move to a random empty neighbor, leaving an
//!   offspring behind once old enough to breed.
//! - **Predator**: age and burn one unit of energy; starve below zero,
//!   otherwise eat a random prey neighbor (refilling energy), else move
//!   like prey, else stay.

use crate::utils::config::SimulationConfig;
use crate::world::agent::{Agent, AgentKind};
use crate::world::neighborhood::{Neighborhood, Occupant, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// Rule parameters taken from the simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleParams {
    pub prey_breed_age: u32,
    pub predator_breed_age: u32,

    /// Energy a predator is born with and restored to when it feeds
    pub starvation: u32,
}

impl From<&SimulationConfig> for RuleParams {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            prey_breed_age: config.prey_breed_age,
            predator_breed_age: config.predator_breed_age,
            starvation: config.starvation,
        }
    }
}

/// The intended action of one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Remain in place
    Stay,

    /// Move to an empty neighbor, optionally leaving an offspring behind
    Move { to: Position, breed: bool },

    /// Move onto a prey neighbor, consuming it
    Eat { to: Position, breed: bool },

    /// Starve and vacate the cell
    Die,
}

impl Action {
    pub fn destination(&self) -> Option<Position> {
        match *self {
            Action::Move { to, .. } | Action::Eat { to, .. } => Some(to),
            Action::Stay | Action::Die => None,
        }
    }

    pub fn breeds(&self) -> bool {
        matches!(
            self,
            Action::Move { breed: true, .. } | Action::Eat { breed: true, .. }
        )
    }
}

/// Outcome of evaluating the rules for one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,

    /// Agent state once the action has been carried out
    pub agent: Agent,

    /// Agent state if the action cannot be carried out and it stays put
    pub resting: Agent,
}

impl Decision {
    fn stay(agent: Agent) -> Self {
        Self {
            action: Action::Stay,
            agent,
            resting: agent,
        }
    }
}

/// Evaluate the rules for `agent` against its neighborhood
pub fn decide<R: Rng + ?Sized>(
    agent: Agent,
    neighborhood: &Neighborhood,
    params: &RuleParams,
    rng: &mut R,
) -> Decision {
    match agent.kind {
        AgentKind::Prey => decide_prey(agent, neighborhood, params, rng),
        AgentKind::Predator { .. } => decide_predator(agent, neighborhood, params, rng),
    }
}

fn decide_prey<R: Rng + ?Sized>(
    mut agent: Agent,
    neighborhood: &Neighborhood,
    params: &RuleParams,
    rng: &mut R,
) -> Decision {
    agent.age = agent.age.saturating_add(1);

    let empty = neighborhood.matching(Occupant::Empty);
    match empty.choose(rng) {
        Some(&to) => relocate(agent, to, params.prey_breed_age, |to, breed| Action::Move {
            to,
            breed,
        }),
        None => Decision::stay(agent),
    }
}

fn decide_predator<R: Rng + ?Sized>(
    mut agent: Agent,
    neighborhood: &Neighborhood,
    params: &RuleParams,
    rng: &mut R,
) -> Decision {
    agent.age = agent.age.saturating_add(1);
    let energy = match &mut agent.kind {
        AgentKind::Predator { energy } => {
            *energy -= 1;
            *energy
        }
        AgentKind::Prey => unreachable!("predator rules applied to prey"),
    };

    if energy < 0 {
        return Decision {
            action: Action::Die,
            agent,
            resting: agent,
        };
    }

    let prey = neighborhood.matching(Occupant::Prey);
    if let Some(&to) = prey.choose(rng) {
        let resting = agent;
        let mut fed = agent;
        fed.kind = AgentKind::Predator {
            energy: i64::from(params.starvation),
        };
        let mut decision = relocate(fed, to, params.predator_breed_age, |to, breed| {
            Action::Eat { to, breed }
        });
        decision.resting = resting;
        return decision;
    }

    let empty = neighborhood.matching(Occupant::Empty);
    match empty.choose(rng) {
        Some(&to) => relocate(agent, to, params.predator_breed_age, |to, breed| {
            Action::Move { to, breed }
        }),
        None => Decision::stay(agent),
    }
}

/// Shared move / move-and-breed choice
fn relocate(
    agent: Agent,
    to: Position,
    breed_age: u32,
    action: impl FnOnce(Position, bool) -> Action,
) -> Decision {
    let resting = agent;
    let mut moved = agent;
    let breed = moved.age >= breed_age;
    if breed {
        moved.age = 0;
    }

    Decision {
        action: action(to, breed),
        agent: moved,
        resting,
    }
}
