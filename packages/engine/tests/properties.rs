// packages/engine/tests/properties.rs
//! Property tests for geometry, partitioning and the rule engine

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wator_engine::runtime::partition_rows;
use wator_engine::world::{
    decide, Action, Agent, AgentId, Direction, Neighborhood, Occupant, Position, RuleParams,
};

fn occupant() -> impl Strategy<Value = Occupant> {
    prop_oneof![
        Just(Occupant::Empty),
        Just(Occupant::Prey),
        Just(Occupant::Predator),
    ]
}

proptest! {
    #[test]
    fn prop_steps_wrap_and_invert(dim in 2usize..64, row in 0usize..64, col in 0usize..64) {
        let p = Position::new(row % dim, col % dim);

        let north = p.step(Direction::North, dim);
        let east = p.step(Direction::East, dim);
        prop_assert!(north.row < dim && east.col < dim);
        prop_assert_eq!(north.step(Direction::South, dim), p);
        prop_assert_eq!(east.step(Direction::West, dim), p);

        if p.row == 0 {
            prop_assert_eq!(north, Position::new(dim - 1, p.col));
        }
        if p.col == dim - 1 {
            prop_assert_eq!(east, Position::new(p.row, 0));
        }
    }

    #[test]
    fn prop_partitions_cover_rows_exactly(rows in 1usize..200, workers in 1usize..200) {
        prop_assume!(workers <= rows);
        let parts = partition_rows(rows, workers);

        prop_assert_eq!(parts.len(), workers);
        prop_assert_eq!(parts[0].rows.start, 0);
        prop_assert_eq!(parts[workers - 1].rows.end, rows);
        for pair in parts.windows(2) {
            prop_assert_eq!(pair[0].rows.end, pair[1].rows.start);
        }
        for part in &parts[..workers - 1] {
            prop_assert_eq!(part.len(), rows / workers);
        }
        prop_assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn prop_decisions_respect_neighborhood(
        occupants in prop::array::uniform4(occupant()),
        predator in any::<bool>(),
        age in 0u32..20,
        energy in 0u32..6,
        seed in any::<u64>(),
    ) {
        let params = RuleParams { prey_breed_age: 4, predator_breed_age: 7, starvation: 5 };
        let center = Position::new(3, 3);
        let mut i = 0;
        let hood = Neighborhood::observe(center, 8, |_| {
            let o = occupants[i];
            i += 1;
            o
        });

        let mut agent = if predator {
            Agent::predator(AgentId(0), energy)
        } else {
            Agent::prey(AgentId(0))
        };
        agent.age = age;

        let decision = decide(agent, &hood, &params, &mut StdRng::seed_from_u64(seed));
        let empty = hood.matching(Occupant::Empty);
        let prey = hood.matching(Occupant::Prey);

        match decision.action {
            Action::Die => prop_assert!(predator && energy == 0),
            Action::Eat { to, .. } => {
                prop_assert!(predator);
                prop_assert!(prey.contains(&to));
                prop_assert_eq!(decision.agent.energy(), Some(5));
            }
            Action::Move { to, .. } => {
                prop_assert!(empty.contains(&to));
                if predator {
                    prop_assert!(prey.is_empty());
                }
            }
            Action::Stay => {
                prop_assert!(empty.is_empty());
                if predator {
                    prop_assert!(prey.is_empty());
                }
            }
        }

        let breed_age = if predator { params.predator_breed_age } else { params.prey_breed_age };
        if decision.action.breeds() {
            prop_assert!(age + 1 >= breed_age);
            prop_assert_eq!(decision.agent.age, 0);
        }
        prop_assert_eq!(decision.resting.age, age + 1);
    }
}
