//! The per-tick state machine every living organism runs through.
//!
//! Order within one tick: birthday, hunger, old age, foraging, breeding, movement.
//! A death at any step ends the organism's tick.

use crate::grid::{Grid, Slot};
use crate::organism::{litter_size, Organism};
use crate::random::RandomSource;
use predprey_core::{
    DeathCause, Foraging, Location, OrganismId, PopulationStats, Result, Species, SpeciesParams,
    SpeciesTable,
};
use tracing::trace;

/// Mutable world state shared by all organisms during one tick.
///
/// Slots below `organisms.len()` refer to organisms alive at tick start; higher slots
/// refer to this tick's newborns.
pub(crate) struct TickContext<'a, R: RandomSource + ?Sized> {
    pub grid: &'a mut Grid,
    pub organisms: &'a mut [Organism],
    pub newborns: &'a mut Vec<Organism>,
    pub species: &'a SpeciesTable,
    pub cycle_length: u64,
    pub rng: &'a mut R,
    pub next_id: &'a mut u64,
    pub stats: &'a mut PopulationStats,
}

impl<'a, R: RandomSource + ?Sized> TickContext<'a, R> {
    fn organism(&self, slot: Slot) -> &Organism {
        let settled = self.organisms.len();
        if slot < settled {
            &self.organisms[slot]
        } else {
            &self.newborns[slot - settled]
        }
    }

    fn organism_mut(&mut self, slot: Slot) -> &mut Organism {
        let settled = self.organisms.len();
        if slot < settled {
            &mut self.organisms[slot]
        } else {
            &mut self.newborns[slot - settled]
        }
    }

    fn kill(&mut self, slot: Slot, cause: DeathCause) {
        if let Some(location) = self.organism_mut(slot).die(cause) {
            self.grid.clear(location);
        }
    }

    fn relocate(&mut self, slot: Slot, to: Location) -> Result<()> {
        let previous = self.organism(slot).location;
        self.grid.place(slot, previous, to)?;
        self.organism_mut(slot).location = Some(to);
        Ok(())
    }

    fn give_birth(&mut self, parent: Slot, species: Species, params: &SpeciesParams, at: Location) -> Result<()> {
        let slot = self.organisms.len() + self.newborns.len();
        let id = OrganismId(*self.next_id);
        *self.next_id += 1;

        let tick = self.organisms[parent].current_tick;
        let young = Organism::new(id, species, params, at, tick, self.cycle_length, false, &mut *self.rng);
        self.grid.place(slot, None, at)?;
        self.newborns.push(young);
        self.organisms[parent].record_birth();
        self.stats.record_birth(species);

        trace!(
            event = "organism_birth",
            parent_id = %self.organisms[parent].id,
            organism_id = %id,
            species = %species,
            row = at.row,
            col = at.col,
            tick = tick,
            "Organism born"
        );
        Ok(())
    }
}

/// Run one tick of the life cycle for the organism in `slot`, which must be alive
/// and settled (not a newborn of this tick).
pub(crate) fn act<R: RandomSource + ?Sized>(ctx: &mut TickContext<'_, R>, slot: Slot) -> Result<()> {
    let table = ctx.species;
    let species = ctx.organisms[slot].species;
    let params = table.get(species);
    let cycle_length = ctx.cycle_length;

    ctx.organisms[slot].have_birthday(cycle_length);

    if !ctx.organisms[slot].burn_food() {
        ctx.kill(slot, DeathCause::Hunger);
        return Ok(());
    }

    if ctx.organisms[slot].dies_of_age(params, &mut *ctx.rng) {
        ctx.kill(slot, DeathCause::Age);
        return Ok(());
    }

    let target = forage(ctx, slot, params);
    breed(ctx, slot, species, params, target)?;
    move_or_die(ctx, slot, params, target)
}

/// Refill food according to the species' foraging rule. Returns the cell of eaten
/// prey, which becomes the hunter's move target.
fn forage<R: RandomSource + ?Sized>(ctx: &mut TickContext<'_, R>, slot: Slot, params: &SpeciesParams) -> Option<Location> {
    let here = ctx.organisms[slot].location?;
    match params.foraging {
        Foraging::Hunt { food_value, radius } => {
            let found = ctx
                .grid
                .adjacent_locations(here, radius)
                .into_iter()
                .find_map(|loc| {
                    let occupant = ctx.grid.occupant_at(loc)?;
                    let candidate = ctx.organism(occupant);
                    (candidate.species == Species::Prey && candidate.alive).then_some((occupant, loc))
                });

            let (prey_slot, loc) = found?;
            ctx.kill(prey_slot, DeathCause::Eaten);
            ctx.organisms[slot].eat(food_value);
            trace!(
                event = "prey_eaten",
                hunter_id = %ctx.organisms[slot].id,
                prey_id = %ctx.organism(prey_slot).id,
                row = loc.row,
                col = loc.col,
                "Predator ate prey"
            );
            Some(loc)
        }
        Foraging::Graze {
            probability,
            food_value,
        } => {
            if ctx.rng.chance(probability) {
                ctx.organisms[slot].eat(food_value);
            }
            None
        }
    }
}

/// Attempt to breed, or check whether the organism has come of breeding age.
/// Newborns fill free cells in scan order, never the hunter's `reserved` target.
fn breed<R: RandomSource + ?Sized>(
    ctx: &mut TickContext<'_, R>,
    slot: Slot,
    species: Species,
    params: &SpeciesParams,
    reserved: Option<Location>,
) -> Result<()> {
    if !ctx.organisms[slot].can_breed {
        ctx.organisms[slot].check_breeding_age(params);
        return Ok(());
    }
    if !ctx.organisms[slot].ready_to_breed(params, ctx.cycle_length) {
        return Ok(());
    }
    let Some(here) = ctx.organisms[slot].location else {
        return Ok(());
    };

    let free: Vec<Location> = ctx
        .grid
        .free_adjacent_locations(here, params.birth_radius)
        .into_iter()
        .filter(|loc| Some(*loc) != reserved)
        .collect();
    let births = litter_size(params, &mut *ctx.rng) as usize;

    for at in free.into_iter().take(births) {
        ctx.give_birth(slot, species, params, at)?;
    }
    Ok(())
}

fn move_or_die<R: RandomSource + ?Sized>(
    ctx: &mut TickContext<'_, R>,
    slot: Slot,
    params: &SpeciesParams,
    target: Option<Location>,
) -> Result<()> {
    let Some(here) = ctx.organisms[slot].location else {
        return Ok(());
    };
    let destination = target.or_else(|| ctx.grid.first_free_adjacent_location(here, params.move_radius));
    match destination {
        Some(to) => ctx.relocate(slot, to),
        None => {
            ctx.kill(slot, DeathCause::Overcrowd);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::tests::ScriptedRandom;

    struct Fixture {
        grid: Grid,
        organisms: Vec<Organism>,
        newborns: Vec<Organism>,
        species: SpeciesTable,
        rng: ScriptedRandom,
        next_id: u64,
        stats: PopulationStats,
    }

    impl Fixture {
        fn new(depth: i32, width: i32) -> Self {
            Self {
                grid: Grid::new(depth, width),
                organisms: Vec::new(),
                newborns: Vec::new(),
                species: SpeciesTable::default(),
                rng: ScriptedRandom::default(),
                next_id: 0,
                stats: PopulationStats::new(),
            }
        }

        fn add(&mut self, species: Species, at: Location, tick: u64) -> Slot {
            let slot = self.organisms.len();
            let params = self.species.get(species).clone();
            let mut organism = Organism::new(
                OrganismId(self.next_id),
                species,
                &params,
                at,
                0,
                365,
                false,
                &mut ScriptedRandom::default(),
            );
            organism.set_tick(tick);
            self.next_id += 1;
            self.grid.place(slot, None, at).unwrap();
            self.organisms.push(organism);
            slot
        }

        fn act(&mut self, slot: Slot) {
            let mut ctx = TickContext {
                grid: &mut self.grid,
                organisms: &mut self.organisms,
                newborns: &mut self.newborns,
                species: &self.species,
                cycle_length: 365,
                rng: &mut self.rng,
                next_id: &mut self.next_id,
                stats: &mut self.stats,
            };
            act(&mut ctx, slot).unwrap();
        }
    }

    #[test]
    fn test_starving_organism_stops_before_moving() {
        let mut fx = Fixture::new(3, 3);
        let slot = fx.add(Species::Predator, Location::new(1, 1), 100);
        fx.organisms[slot].set_food_level(1);
        fx.organisms[slot].set_age(1);
        fx.organisms[slot].set_can_breed();
        fx.rng = ScriptedRandom::new(&[0.0, 0.0], &[2]);

        fx.act(slot);

        let organism = &fx.organisms[slot];
        assert!(!organism.is_alive());
        assert_eq!(organism.death_cause(), DeathCause::Hunger);
        assert_eq!(organism.location(), None);
        assert_eq!(fx.grid.occupied_count(), 0);
        assert!(fx.newborns.is_empty());
        // No draws were consumed after death
        assert_eq!(fx.rng.floats.len(), 2);
    }

    #[test]
    fn test_hunter_takes_first_prey_in_scan_order() {
        let mut fx = Fixture::new(5, 5);
        let hunter = fx.add(Species::Predator, Location::new(2, 2), 1);
        let far = fx.add(Species::Prey, Location::new(0, 0), 1);
        let near = fx.add(Species::Prey, Location::new(2, 3), 1);
        fx.organisms[hunter].set_food_level(3);

        fx.act(hunter);

        // (0, 0) comes first in row-major order even though (2, 3) is closer
        assert_eq!(fx.organisms[far].death_cause(), DeathCause::Eaten);
        assert!(fx.organisms[near].is_alive());
        assert_eq!(fx.organisms[hunter].location(), Some(Location::new(0, 0)));
        assert_eq!(fx.organisms[hunter].food_level(), 11);
        assert_eq!(fx.grid.occupant_at(Location::new(0, 0)), Some(hunter));
        assert_eq!(fx.grid.occupant_at(Location::new(2, 2)), None);
    }

    #[test]
    fn test_hunter_ignores_other_predators() {
        let mut fx = Fixture::new(1, 3);
        let hunter = fx.add(Species::Predator, Location::new(0, 0), 1);
        let rival = fx.add(Species::Predator, Location::new(0, 1), 1);

        fx.act(hunter);

        assert!(fx.organisms[rival].is_alive());
        assert_eq!(fx.organisms[hunter].food_level(), 10);
        // Its only neighbour within the move radius is taken by the rival
        assert_eq!(fx.organisms[hunter].death_cause(), DeathCause::Overcrowd);
    }

    #[test]
    fn test_grazing_refills_food() {
        let mut fx = Fixture::new(3, 3);
        let prey = fx.add(Species::Prey, Location::new(1, 1), 1);
        fx.organisms[prey].set_food_level(3);
        fx.rng = ScriptedRandom::new(&[0.5], &[]);

        fx.act(prey);

        assert_eq!(fx.organisms[prey].food_level(), 5);
        assert_eq!(fx.organisms[prey].location(), Some(Location::new(0, 0)));
    }

    #[test]
    fn test_failed_grazing_keeps_food() {
        let mut fx = Fixture::new(3, 3);
        let prey = fx.add(Species::Prey, Location::new(1, 1), 1);
        fx.organisms[prey].set_food_level(3);
        fx.rng = ScriptedRandom::new(&[0.9], &[]);

        fx.act(prey);

        assert_eq!(fx.organisms[prey].food_level(), 2);
    }

    #[test]
    fn test_breeding_fills_free_cells_in_order() {
        let mut fx = Fixture::new(3, 3);
        let prey = fx.add(Species::Prey, Location::new(1, 1), 0);
        fx.organisms[prey].set_can_breed();
        fx.organisms[prey].breed_offset = 0;
        // Grazing, breeding roll; litter draw n = 2 -> three young
        fx.rng = ScriptedRandom::new(&[0.9, 0.05], &[2]);

        fx.act(prey);

        let born: Vec<Location> = fx.newborns.iter().filter_map(|o| o.location()).collect();
        assert_eq!(born, vec![Location::new(0, 0), Location::new(0, 1), Location::new(0, 2)]);
        assert!(fx.newborns.iter().all(|o| o.age() == 0 && o.food_level() == 5));
        assert_eq!(fx.organisms[prey].breed_count(), 3);
        assert_eq!(fx.stats.prey.births, 3);
        // Newborns occupy slots after the settled organisms
        assert_eq!(fx.grid.occupant_at(Location::new(0, 0)), Some(1));
        // Parent then moves to the first cell left free
        assert_eq!(fx.organisms[prey].location(), Some(Location::new(1, 0)));
        assert_eq!(fx.grid.occupied_count(), 4);
    }

    #[test]
    fn test_litter_limited_by_free_cells() {
        let mut fx = Fixture::new(1, 2);
        let prey = fx.add(Species::Prey, Location::new(0, 0), 0);
        fx.organisms[prey].set_can_breed();
        fx.organisms[prey].breed_offset = 0;
        fx.rng = ScriptedRandom::new(&[0.9, 0.05], &[4]);

        fx.act(prey);

        assert_eq!(fx.newborns.len(), 1);
        // The only neighbour is now taken by its own young
        assert_eq!(fx.organisms[prey].death_cause(), DeathCause::Overcrowd);
    }

    #[test]
    fn test_not_yet_breedable_comes_of_age() {
        let mut fx = Fixture::new(3, 3);
        let prey = fx.add(Species::Prey, Location::new(1, 1), 1);
        fx.organisms[prey].set_age(1);
        fx.rng = ScriptedRandom::new(&[0.9], &[]);

        fx.act(prey);

        assert!(fx.organisms[prey].can_breed());
        assert!(fx.newborns.is_empty());
    }

    #[test]
    fn test_hunter_young_never_take_the_kill_cell() {
        let mut fx = Fixture::new(3, 3);
        let hunter = fx.add(Species::Predator, Location::new(1, 1), 100);
        let prey = fx.add(Species::Prey, Location::new(0, 0), 100);
        fx.organisms[hunter].set_can_breed();
        // Breeding roll succeeds; n = 2 -> three young
        fx.rng = ScriptedRandom::new(&[0.0], &[2]);

        fx.act(hunter);

        assert_eq!(fx.organisms[prey].death_cause(), DeathCause::Eaten);
        assert_eq!(fx.organisms[hunter].location(), Some(Location::new(0, 0)));
        assert!(fx
            .newborns
            .iter()
            .all(|young| young.location() != Some(Location::new(0, 0))));
        assert_eq!(fx.newborns.len(), 3);
        assert_eq!(fx.grid.occupied_count(), 4);
    }
}
