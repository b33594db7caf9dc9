//! Diagnostic tallies of spawns, births and deaths.

use crate::{DeathCause, Species};
use serde::{Deserialize, Serialize};

/// Counters for a single species
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTally {
    /// Organisms placed by the initial seeding
    pub initial: u64,
    /// Every organism ever created, seeded or born
    pub spawned: u64,
    /// Newborns produced by breeding
    pub births: u64,
    pub deaths_age: u64,
    pub deaths_hunger: u64,
    pub deaths_overcrowd: u64,
    pub deaths_eaten: u64,
}

impl SpeciesTally {
    pub fn total_deaths(&self) -> u64 {
        self.deaths_age + self.deaths_hunger + self.deaths_overcrowd + self.deaths_eaten
    }
}

/// Accumulator handed to every step, replacing process-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub predator: SpeciesTally,
    pub prey: SpeciesTally,
}

impl PopulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, species: Species) -> &SpeciesTally {
        match species {
            Species::Predator => &self.predator,
            Species::Prey => &self.prey,
        }
    }

    fn tally_mut(&mut self, species: Species) -> &mut SpeciesTally {
        match species {
            Species::Predator => &mut self.predator,
            Species::Prey => &mut self.prey,
        }
    }

    pub fn record_initial(&mut self, species: Species) {
        let tally = self.tally_mut(species);
        tally.initial += 1;
        tally.spawned += 1;
    }

    pub fn record_birth(&mut self, species: Species) {
        let tally = self.tally_mut(species);
        tally.births += 1;
        tally.spawned += 1;
    }

    pub fn record_death(&mut self, species: Species, cause: DeathCause) {
        let tally = self.tally_mut(species);
        match cause {
            DeathCause::Age => tally.deaths_age += 1,
            DeathCause::Hunger => tally.deaths_hunger += 1,
            DeathCause::Overcrowd => tally.deaths_overcrowd += 1,
            DeathCause::Eaten => tally.deaths_eaten += 1,
            DeathCause::None => {}
        }
    }

    /// Organisms created but not yet dead
    pub fn living(&self, species: Species) -> u64 {
        let tally = self.tally(species);
        tally.spawned.saturating_sub(tally.total_deaths())
    }
}
