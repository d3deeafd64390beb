// packages/engine/src/world/populate.rs
//! Initial population placement

use crate::utils::config::SimulationConfig;
use crate::utils::errors::{EngineError, Result};
use crate::world::agent::Species;
use crate::world::grid::Grid;
use crate::world::neighborhood::Position;
use rand::seq::index;
use rand::Rng;
use tracing::debug;

/// Scatter the configured prey and predators over distinct random cells
///
/// Every requested agent is placed; validation already guarantees the
/// population fits the grid.
pub fn populate<R: Rng + ?Sized>(grid: &Grid, config: &SimulationConfig, rng: &mut R) -> Result<()> {
    let dim = grid.dim();
    let capacity = dim * dim;
    let wanted = config.prey + config.predators;
    if wanted > capacity {
        return Err(EngineError::InvalidConfig(format!(
            "initial population {} exceeds grid capacity {}",
            wanted, capacity
        )));
    }

    let cells = index::sample(rng, capacity, wanted);
    for (n, cell) in cells.iter().enumerate() {
        let species = if n < config.prey {
            Species::Prey
        } else {
            Species::Predator
        };
        let pos = Position::new(cell / dim, cell % dim);
        if grid.spawn(pos, species, config.starvation).is_none() {
            return Err(EngineError::InvalidPlacement {
                row: pos.row,
                col: pos.col,
                reason: "cell already occupied".to_string(),
            });
        }
    }

    debug!(
        prey = config.prey,
        predators = config.predators,
        "initial population placed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_exact_counts() {
        let config = SimulationConfig {
            grid_size: 10,
            prey: 40,
            predators: 25,
            ..Default::default()
        };
        let grid = Grid::new(config.grid_size);
        populate(&grid, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(grid.population(), (40, 25));
    }

    #[test]
    fn test_full_grid() {
        let config = SimulationConfig {
            grid_size: 3,
            prey: 5,
            predators: 4,
            ..Default::default()
        };
        let grid = Grid::new(config.grid_size);
        populate(&grid, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(grid.population(), (5, 4));
    }

    #[test]
    fn test_overfull_rejected() {
        let config = SimulationConfig {
            grid_size: 2,
            prey: 3,
            predators: 2,
            ..Default::default()
        };
        let grid = Grid::new(config.grid_size);
        let result = populate(&grid, &config, &mut StdRng::seed_from_u64(5));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_predators_start_with_full_energy() {
        let config = SimulationConfig {
            grid_size: 4,
            prey: 0,
            predators: 3,
            starvation: 6,
            ..Default::default()
        };
        let grid = Grid::new(config.grid_size);
        populate(&grid, &config, &mut StdRng::seed_from_u64(1)).unwrap();

        grid.for_each_row(|_, cells| {
            for agent in cells.iter().flatten() {
                assert_eq!(agent.energy(), Some(6));
            }
        });
    }
}
