//! Organism state and the species hooks of its life cycle.

use crate::random::RandomSource;
use predprey_core::{DeathCause, Foraging, Location, OrganismId, Species, SpeciesParams};
use serde::Serialize;

/// A single predator or prey. Species-specific behaviour is selected from the
/// species' parameters rather than from separate types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organism {
    pub(crate) id: OrganismId,
    pub(crate) species: Species,
    pub(crate) alive: bool,
    pub(crate) location: Option<Location>,
    pub(crate) age: u32,
    /// Birth tick folded into the cycle; the birthday tick of every year
    pub(crate) tick_born: u64,
    pub(crate) current_tick: u64,
    pub(crate) food_level: i32,
    pub(crate) can_breed: bool,
    pub(crate) breed_count: u32,
    pub(crate) breed_offset: u64,
    pub(crate) death_cause: DeathCause,
}

impl Organism {
    /// Create an organism. With `random_age` it gets a random age and food level,
    /// as used for the initial population; otherwise it is a newborn with full food.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new<R: RandomSource + ?Sized>(
        id: OrganismId,
        species: Species,
        params: &SpeciesParams,
        location: Location,
        tick_born: u64,
        cycle_length: u64,
        random_age: bool,
        rng: &mut R,
    ) -> Self {
        let (age, food_level) = if random_age {
            let age = rng.uniform_int(params.max_age);
            let food = match params.foraging {
                Foraging::Hunt { food_value, .. } => rng.uniform_int(food_value as u32) as i32,
                Foraging::Graze { food_value, .. } => rng.uniform_int(food_value as u32) as i32 + 1,
            };
            (age, food)
        } else {
            (0, params.foraging.food_value())
        };

        let mut organism = Self {
            id,
            species,
            alive: true,
            location: Some(location),
            age,
            tick_born: tick_born % cycle_length,
            current_tick: tick_born,
            food_level,
            can_breed: false,
            breed_count: 0,
            breed_offset: 0,
            death_cause: DeathCause::None,
        };
        organism.draw_breed_offset(params, rng);
        organism
    }

    pub fn id(&self) -> OrganismId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn tick_born(&self) -> u64 {
        self.tick_born
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn food_level(&self) -> i32 {
        self.food_level
    }

    pub fn can_breed(&self) -> bool {
        self.can_breed
    }

    pub fn breed_count(&self) -> u32 {
        self.breed_count
    }

    pub fn breed_offset(&self) -> u64 {
        self.breed_offset
    }

    pub fn death_cause(&self) -> DeathCause {
        self.death_cause
    }

    pub(crate) fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub(crate) fn set_food_level(&mut self, food_level: i32) {
        self.food_level = food_level;
    }

    /// Breedability only ever switches on
    pub(crate) fn set_can_breed(&mut self) {
        self.can_breed = true;
    }

    pub(crate) fn set_breed_count(&mut self, breed_count: u32) {
        self.breed_count = breed_count;
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.current_tick = tick;
    }

    /// Mark the organism dead and detach it from its cell. Returns the cell it
    /// occupied so the caller can clear it on the grid.
    pub(crate) fn die(&mut self, cause: DeathCause) -> Option<Location> {
        self.alive = false;
        self.death_cause = cause;
        self.location.take()
    }

    pub(crate) fn have_birthday(&mut self, cycle_length: u64) {
        if self.current_tick % cycle_length == self.tick_born {
            self.age += 1;
        }
    }

    /// Burn one unit of food. Returns false once the organism is starving.
    pub(crate) fn burn_food(&mut self) -> bool {
        self.food_level -= 1;
        self.food_level > 0
    }

    /// Whether old age kills the organism this tick
    pub(crate) fn dies_of_age<R: RandomSource + ?Sized>(&self, params: &SpeciesParams, rng: &mut R) -> bool {
        if self.age > params.max_age {
            true
        } else if self.age >= params.min_die_age {
            rng.chance(params.early_death_probability)
        } else {
            false
        }
    }

    pub(crate) fn eat(&mut self, food_value: i32) {
        self.food_level = food_value;
    }

    pub(crate) fn in_breeding_window(&self, params: &SpeciesParams, cycle_length: u64) -> bool {
        params
            .breeding_window
            .is_open(self.current_tick, self.breed_offset, cycle_length)
    }

    /// Whether a breeding attempt happens this tick
    pub(crate) fn ready_to_breed(&self, params: &SpeciesParams, cycle_length: u64) -> bool {
        self.can_breed
            && self.in_breeding_window(params, cycle_length)
            && !(params.breed_once_per_cycle && self.breed_count > 0)
    }

    pub(crate) fn check_breeding_age(&mut self, params: &SpeciesParams) {
        if self.age >= params.breeding_age {
            self.can_breed = true;
        }
    }

    pub(crate) fn record_birth(&mut self) {
        self.breed_count += 1;
    }

    /// Cycle boundary: forget this year's litters and, for staggered breeders,
    /// move the breeding windows.
    pub(crate) fn new_year<R: RandomSource + ?Sized>(&mut self, params: &SpeciesParams, rng: &mut R) {
        self.breed_count = 0;
        self.draw_breed_offset(params, rng);
    }

    fn draw_breed_offset<R: RandomSource + ?Sized>(&mut self, params: &SpeciesParams, rng: &mut R) {
        let range = params.breeding_window.offset_range();
        if range > 0 {
            self.breed_offset = rng.uniform_int(range) as u64;
        }
    }
}

/// Number of young produced by one breeding attempt, in `[0, max_litter_size]`.
///
/// A draw of zero from the litter range is re-rolled as a coin flip, which skews
/// small litters towards one young.
pub fn litter_size<R: RandomSource + ?Sized>(params: &SpeciesParams, rng: &mut R) -> u32 {
    if params.max_litter_size == 0 {
        return 0;
    }
    if rng.uniform01() > params.breeding_probability {
        return 0;
    }
    let n = rng.uniform_int(params.max_litter_size);
    if n == 0 {
        rng.uniform01().round() as u32
    } else {
        n + 1
    }
}
