//! Initial population placement.

use crate::population::Population;
use crate::random::RandomSource;
use predprey_core::{Location, PopulationStats, Result, SeedingConfig, Species};
use tracing::info;

/// Fill the grid cell by cell: a predator with `predator_probability`, otherwise a
/// prey with `prey_probability`. Seeded organisms get random ages and food levels
/// and are born at the population's current tick.
pub fn populate<R: RandomSource>(
    population: &mut Population<R>,
    seeding: &SeedingConfig,
    stats: &mut PopulationStats,
) -> Result<()> {
    let tick = population.tick();
    let (depth, width) = (population.grid().depth, population.grid().width);

    for row in 0..depth {
        for col in 0..width {
            let location = Location::new(row, col);
            if population.grid().occupant_at(location).is_some() {
                continue;
            }
            let species = if population.rng_mut().chance(seeding.predator_probability) {
                Some(Species::Predator)
            } else if population.rng_mut().chance(seeding.prey_probability) {
                Some(Species::Prey)
            } else {
                None
            };
            if let Some(species) = species {
                population.spawn(species, location, tick, true)?;
                stats.record_initial(species);
            }
        }
    }

    info!(
        event = "population_seeded",
        predators = population.count(Species::Predator),
        prey = population.count(Species::Prey),
        depth = depth,
        width = width,
        "Initial population placed"
    );
    Ok(())
}
