//! Configuration types for the simulation.

use crate::{Error, Result, Species};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of rows
    pub depth: i32,
    /// Number of columns
    pub width: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            depth: 200,
            width: 200,
        }
    }
}

/// How a species refills its food level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Foraging {
    /// Eat the first live prey found within `radius` cells
    Hunt { food_value: i32, radius: i32 },
    /// Ambient foraging with no spatial consumption
    Graze { probability: f64, food_value: i32 },
}

impl Foraging {
    /// Food level of a newborn, and the level restored by a successful meal
    pub fn food_value(&self) -> i32 {
        match self {
            Foraging::Hunt { food_value, .. } | Foraging::Graze { food_value, .. } => *food_value,
        }
    }
}

/// The ticks of a cycle during which a breedable organism may reproduce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreedingWindow {
    /// Fixed season: `tick % period` within `[start, end]`
    Seasonal { period: u64, start: u64, end: u64 },
    /// Several short windows per cycle, shifted by a per-individual offset drawn
    /// from `[0, offset_range)` at birth and at every year rollover
    Staggered {
        breeds_per_cycle: u64,
        window_length: u64,
        offset_range: u32,
    },
}

impl BreedingWindow {
    pub fn is_open(&self, tick: u64, offset: u64, cycle_length: u64) -> bool {
        match *self {
            BreedingWindow::Seasonal { period, start, end } => {
                let day = tick % period;
                day >= start && day <= end
            }
            BreedingWindow::Staggered {
                breeds_per_cycle,
                window_length,
                ..
            } => {
                let spacing = (cycle_length + breeds_per_cycle - 1) / breeds_per_cycle;
                (tick + offset) % spacing < window_length
            }
        }
    }

    pub fn offset_range(&self) -> u32 {
        match self {
            BreedingWindow::Seasonal { .. } => 0,
            BreedingWindow::Staggered { offset_range, .. } => *offset_range,
        }
    }
}

/// Per-species life-cycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Age at which an organism becomes able to breed
    pub breeding_age: u32,
    /// Organisms older than this always die
    pub max_age: u32,
    /// From this age on an organism may die early
    pub min_die_age: u32,
    /// Per-tick chance of dying once `min_die_age` is reached
    pub early_death_probability: f64,
    /// Chance that a breeding attempt produces a litter
    pub breeding_probability: f64,
    /// Upper bound on the litter size
    pub max_litter_size: u32,
    pub foraging: Foraging,
    pub breeding_window: BreedingWindow,
    /// Limit breeding to one litter per cycle
    pub breed_once_per_cycle: bool,
    /// Radius searched for a free cell to move into
    pub move_radius: i32,
    /// Radius searched for free cells to place newborns in
    pub birth_radius: i32,
}

impl SpeciesParams {
    pub fn predator() -> Self {
        Self {
            breeding_age: 1,
            max_age: 11,
            min_die_age: 9,
            early_death_probability: 0.05,
            breeding_probability: 0.012,
            max_litter_size: 3,
            foraging: Foraging::Hunt {
                food_value: 11,
                radius: 2,
            },
            breeding_window: BreedingWindow::Seasonal {
                period: 365,
                start: 90,
                end: 140,
            },
            breed_once_per_cycle: true,
            move_radius: 1,
            birth_radius: 1,
        }
    }

    pub fn prey() -> Self {
        Self {
            breeding_age: 1,
            max_age: 3,
            min_die_age: 2,
            early_death_probability: 0.01,
            breeding_probability: 0.13,
            max_litter_size: 5,
            foraging: Foraging::Graze {
                probability: 0.8,
                food_value: 5,
            },
            breeding_window: BreedingWindow::Staggered {
                breeds_per_cycle: 2,
                window_length: 7,
                offset_range: 100,
            },
            breed_once_per_cycle: false,
            move_radius: 1,
            birth_radius: 1,
        }
    }

    fn validate(&self, species: Species) -> Result<()> {
        let fail = |msg: &str| Err(Error::InvalidConfig(format!("{}: {}", species, msg)));

        for (name, p) in [
            ("early_death_probability", self.early_death_probability),
            ("breeding_probability", self.breeding_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return fail(&format!("{} must be within [0, 1], got {}", name, p));
            }
        }
        if self.min_die_age > self.max_age {
            return fail("min_die_age must not exceed max_age");
        }
        if self.max_litter_size == 0 {
            return fail("max_litter_size must be at least 1");
        }
        if self.move_radius < 1 || self.birth_radius < 1 {
            return fail("move_radius and birth_radius must be at least 1");
        }
        match self.foraging {
            Foraging::Hunt { food_value, radius } => {
                if food_value <= 0 || radius < 1 {
                    return fail("hunting needs a positive food_value and radius");
                }
            }
            Foraging::Graze {
                probability,
                food_value,
            } => {
                if !(0.0..=1.0).contains(&probability) || food_value <= 0 {
                    return fail("grazing needs a probability in [0, 1] and a positive food_value");
                }
            }
        }
        match self.breeding_window {
            BreedingWindow::Seasonal { period, start, end } => {
                if period == 0 || start > end {
                    return fail("seasonal window needs a positive period and start <= end");
                }
            }
            BreedingWindow::Staggered {
                breeds_per_cycle, ..
            } => {
                if breeds_per_cycle == 0 {
                    return fail("breeds_per_cycle must be positive");
                }
            }
        }
        Ok(())
    }
}

/// Parameters for both species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesTable {
    pub predator: SpeciesParams,
    pub prey: SpeciesParams,
}

impl SpeciesTable {
    pub fn get(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Predator => &self.predator,
            Species::Prey => &self.prey,
        }
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            predator: SpeciesParams::predator(),
            prey: SpeciesParams::prey(),
        }
    }
}

/// Initial population policy, applied once per cell at setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Probability that a cell starts with a predator
    pub predator_probability: f64,
    /// Probability that a cell without a predator starts with a prey
    pub prey_probability: f64,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            predator_probability: 0.0015,
            prey_probability: 0.35,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of ticks to run for
    pub max_ticks: u64,
    /// Ticks per simulated year
    pub cycle_length: u64,
    /// Ticks between population log lines
    pub log_interval: u64,
    pub world: WorldConfig,
    pub species: SpeciesTable,
    pub seeding: SeedingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_ticks: 4000,
            cycle_length: 365,
            log_interval: 100,
            world: WorldConfig::default(),
            species: SpeciesTable::default(),
            seeding: SeedingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Read a JSON configuration file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded simulation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.depth <= 0 || self.world.width <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be greater than zero, got {}x{}",
                self.world.depth, self.world.width
            )));
        }
        if self.world.depth as i64 * self.world.width as i64 > i32::MAX as i64 {
            return Err(Error::InvalidConfig(format!(
                "grid of {}x{} cells is too large",
                self.world.depth, self.world.width
            )));
        }
        if self.cycle_length == 0 {
            return Err(Error::InvalidConfig("cycle_length must be positive".to_string()));
        }
        for p in [
            self.seeding.predator_probability,
            self.seeding.prey_probability,
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!(
                    "seeding probabilities must be within [0, 1], got {}",
                    p
                )));
            }
        }
        for species in Species::all() {
            self.species.get(species).validate(species)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.depth, 200);
        assert_eq!(config.world.width, 200);
        assert_eq!(config.cycle_length, 365);
        assert!(config.validate().is_ok());

        let predator = SpeciesParams::predator();
        assert_eq!(predator.max_age, 11);
        assert_eq!(predator.foraging.food_value(), 11);

        let prey = SpeciesParams::prey();
        assert_eq!(prey.max_litter_size, 5);
        assert_eq!(prey.foraging.food_value(), 5);
    }

    #[test]
    fn test_seasonal_window() {
        let window = SpeciesParams::predator().breeding_window;
        assert!(!window.is_open(89, 0, 365));
        assert!(window.is_open(90, 0, 365));
        assert!(window.is_open(140, 0, 365));
        assert!(!window.is_open(141, 0, 365));
        // Next year
        assert!(window.is_open(365 + 100, 0, 365));
    }

    #[test]
    fn test_staggered_window() {
        let window = SpeciesParams::prey().breeding_window;
        // ceil(365 / 2) = 183 ticks between windows, each 7 ticks long
        assert!(window.is_open(0, 0, 365));
        assert!(window.is_open(6, 0, 365));
        assert!(!window.is_open(7, 0, 365));
        assert!(window.is_open(183, 0, 365));
        assert!(!window.is_open(0, 10, 365));
        assert!(window.is_open(173, 10, 365));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.species.prey.breeding_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.species.predator.min_die_age = 20;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.cycle_length = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.species.prey.max_litter_size = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.world.depth = 50_000;
        config.world.width = 50_000;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.species.predator.foraging, config.species.predator.foraging);
        assert_eq!(deserialized.seeding.prey_probability, 0.35);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"seed": 7, "world": {"depth": 10, "width": 20}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.width, 20);
        assert_eq!(config.max_ticks, 4000);
        assert!(config.validate().is_ok());
    }
}
