//! The population of organisms and the tick loop that drives it.

use crate::events::{GridSnapshot, LifeEvent, LifeEventSink, Viewer};
use crate::grid::{Grid, Slot};
use crate::lifecycle::{self, TickContext};
use crate::organism::Organism;
use crate::random::{RandomSource, SimRng};
use predprey_core::{
    Error, Location, OrganismId, PopulationStats, Result, SimulationConfig, Species,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Owns every organism and the grid they live on
pub struct Population<R: RandomSource = SimRng> {
    grid: Grid,
    organisms: Vec<Organism>,
    config: SimulationConfig,
    rng: R,
    tick: u64,
    next_id: u64,
}

impl Population<SimRng> {
    /// Create an empty population whose random source is seeded from the config
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let rng = SimRng::seed_from(config.seed);
        Self::new(config, rng)
    }
}

impl<R: RandomSource> Population<R> {
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.world.depth, config.world.width);
        Ok(Self {
            grid,
            organisms: Vec::new(),
            config,
            rng,
            tick: 0,
            next_id: 0,
        })
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Move the clock, e.g. to start a scenario part-way through a cycle
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn organism(&self, slot: Slot) -> Option<&Organism> {
        self.organisms.get(slot)
    }

    /// Mutable access for adjusting an organism's state between ticks
    pub fn organism_mut(&mut self, slot: Slot) -> Option<&mut Organism> {
        self.organisms.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn count(&self, species: Species) -> usize {
        self.organisms
            .iter()
            .filter(|o| o.alive && o.species == species)
            .count()
    }

    /// Add an organism at an empty cell. With `random_age` it starts with a random
    /// age and food level, otherwise as a newborn.
    pub fn spawn(&mut self, species: Species, location: Location, tick_born: u64, random_age: bool) -> Result<Slot> {
        if !self.grid.contains(location) {
            return Err(Error::OutOfBounds {
                row: location.row,
                col: location.col,
                depth: self.grid.depth,
                width: self.grid.width,
            });
        }
        if self.grid.occupant_at(location).is_some() {
            return Err(Error::CellOccupied {
                row: location.row,
                col: location.col,
            });
        }
        let slot = self.organisms.len();
        let params = self.config.species.get(species);
        let organism = Organism::new(
            OrganismId(self.next_id),
            species,
            params,
            location,
            tick_born,
            self.config.cycle_length,
            random_age,
            &mut self.rng,
        );
        self.grid.place(slot, None, location)?;
        self.organisms.push(organism);
        self.next_id += 1;
        Ok(slot)
    }

    /// Draw from the population's random source, e.g. for seeding decisions
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Species in every cell of the grid
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            depth: self.grid.depth,
            width: self.grid.width,
            cells: self
                .grid
                .iter()
                .map(|(_, slot)| slot.and_then(|s| self.organisms.get(s)).map(|o| o.species))
                .collect(),
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Only organisms alive at the start of the tick act, in list order. Each death
    /// is reported to `sink` once; newborns join the list after the pass.
    pub fn step<S: LifeEventSink + ?Sized>(&mut self, sink: &mut S, stats: &mut PopulationStats) -> Result<TickReport> {
        self.tick += 1;
        let tick = self.tick;
        let cycle_length = self.config.cycle_length;
        let settled = self.organisms.len();

        let mut newborns = Vec::new();
        let mut reported = vec![false; settled];
        let mut population_size = settled;
        let mut deaths = 0;

        {
            let mut ctx = TickContext {
                grid: &mut self.grid,
                organisms: &mut self.organisms,
                newborns: &mut newborns,
                species: &self.config.species,
                cycle_length,
                rng: &mut self.rng,
                next_id: &mut self.next_id,
                stats: &mut *stats,
            };

            for slot in 0..settled {
                if ctx.organisms[slot].alive {
                    let params = ctx.species.get(ctx.organisms[slot].species);
                    ctx.organisms[slot].set_tick(tick);
                    if tick % cycle_length == 0 {
                        ctx.organisms[slot].new_year(params, &mut *ctx.rng);
                    }
                    lifecycle::act(&mut ctx, slot)?;
                }

                if !ctx.organisms[slot].alive {
                    report_death(&ctx.organisms[slot], tick, population_size, sink, &mut *ctx.stats);
                    population_size -= 1;
                    reported[slot] = true;
                    deaths += 1;
                }
            }
        }

        // Organisms eaten after their own turn, and newborns eaten before they
        // ever acted, are reported once the pass is over.
        let births = newborns.len();
        self.organisms.extend(newborns);
        population_size += births;
        for (slot, organism) in self.organisms.iter().enumerate() {
            if !organism.alive && !reported.get(slot).copied().unwrap_or(false) {
                report_death(organism, tick, population_size, sink, stats);
                population_size -= 1;
                deaths += 1;
            }
        }

        self.organisms.retain(|o| o.alive);
        self.grid.reindex(
            self.organisms
                .iter()
                .enumerate()
                .filter_map(|(slot, o)| o.location.map(|loc| (slot, loc))),
        )?;

        let report = TickReport {
            tick,
            births,
            deaths,
            predators: self.count(Species::Predator),
            prey: self.count(Species::Prey),
        };

        if self.config.log_interval > 0 && tick % self.config.log_interval == 0 {
            debug!(
                event = "population_metrics",
                tick = tick,
                predators = report.predators,
                prey = report.prey,
                births = births,
                deaths = deaths,
                "Population metrics snapshot"
            );
        }

        Ok(report)
    }

    /// Ask the viewer whether the run should continue
    pub fn is_viable<V: Viewer + ?Sized>(&self, viewer: &V) -> bool {
        viewer.is_viable(&self.snapshot())
    }

    /// Step until `max_ticks` ticks have run or the viewer declares the run no
    /// longer viable. The viewer sees the grid after every tick.
    #[instrument(skip(self, sink, viewer, stats))]
    pub fn run<S, V>(
        &mut self,
        max_ticks: u64,
        sink: &mut S,
        viewer: &mut V,
        stats: &mut PopulationStats,
    ) -> Result<RunSummary>
    where
        S: LifeEventSink + ?Sized,
        V: Viewer + ?Sized,
    {
        info!("Starting simulation for {} ticks", max_ticks);

        let mut ticks_run = 0;
        let mut snapshot = self.snapshot();
        while ticks_run < max_ticks && viewer.is_viable(&snapshot) {
            self.step(sink, stats)?;
            ticks_run += 1;
            snapshot = self.snapshot();
            viewer.show_status(self.tick, &snapshot);
        }

        let summary = RunSummary {
            ticks_run,
            final_tick: self.tick,
            viable: viewer.is_viable(&snapshot),
            predators: snapshot.count(Species::Predator),
            prey: snapshot.count(Species::Prey),
        };

        info!(
            event = "run_complete",
            ticks_run = summary.ticks_run,
            final_tick = summary.final_tick,
            viable = summary.viable,
            predators = summary.predators,
            prey = summary.prey,
            "Simulation finished"
        );

        Ok(summary)
    }
}

fn report_death<S: LifeEventSink + ?Sized>(
    organism: &Organism,
    tick: u64,
    population_size: usize,
    sink: &mut S,
    stats: &mut PopulationStats,
) {
    let event = LifeEvent {
        species: organism.species,
        age: organism.age,
        death_tick: tick,
        death_cause: organism.death_cause,
        population_size,
    };
    debug!(
        event = "organism_death",
        organism_id = %organism.id,
        species = %event.species,
        age = event.age,
        cause = %event.death_cause,
        tick = tick,
        population = population_size,
        "Organism died"
    );
    stats.record_death(event.species, event.death_cause);
    sink.record(&event);
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub births: usize,
    pub deaths: usize,
    pub predators: usize,
    pub prey: usize,
}

/// Outcome of [`Population::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub final_tick: u64,
    /// Whether the viewer still considered the run viable at the end
    pub viable: bool,
    pub predators: usize,
    pub prey: usize,
}
