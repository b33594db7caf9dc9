//! Command-line runner for the predator/prey simulation.

mod csv_log;
mod status;
mod telemetry;

use anyhow::{Context, Result};
use predprey_core::{PopulationStats, SimulationConfig, Species};
use predprey_world::{populate, Population};
use std::path::Path;
use tracing::{debug, info};

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => SimulationConfig::default(),
    };

    info!(
        seed = config.seed,
        depth = config.world.depth,
        width = config.world.width,
        max_ticks = config.max_ticks,
        "Starting predator/prey simulation"
    );

    let mut stats = PopulationStats::new();
    let mut population = Population::from_config(config.clone())?;
    populate(&mut population, &config.seeding, &mut stats)?;

    let log_path = csv_log::timestamped_path(Path::new("."));
    let mut log = csv_log::CsvLifeLog::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;
    let mut viewer = status::StatusViewer::new(config.log_interval);

    let summary = population.run(config.max_ticks, &mut log, &mut viewer, &mut stats)?;
    debug!(
        tick = viewer.last_tick(),
        predators = viewer.count(Species::Predator),
        prey = viewer.count(Species::Prey),
        "Last status shown"
    );
    let rows = log.rows();
    log.finish()
        .with_context(|| format!("failed to write {}", log_path.display()))?;

    info!(
        ticks = summary.ticks_run,
        viable = summary.viable,
        predators = summary.predators,
        prey = summary.prey,
        log = %log_path.display(),
        rows = rows,
        "Run complete"
    );

    for species in Species::all() {
        let tally = stats.tally(species);
        info!(
            species = %species,
            initial = tally.initial,
            spawned = tally.spawned,
            births = tally.births,
            deaths_age = tally.deaths_age,
            deaths_hunger = tally.deaths_hunger,
            deaths_overcrowd = tally.deaths_overcrowd,
            deaths_eaten = tally.deaths_eaten,
            living = stats.living(species),
            "Final statistics"
        );
    }

    Ok(())
}
