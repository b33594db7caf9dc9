//! Interfaces to the collaborators that consume simulation output.

use predprey_core::{DeathCause, Location, Species};
use serde::{Deserialize, Serialize};

/// Record of one organism's death
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub species: Species,
    /// Age at death
    pub age: u32,
    pub death_tick: u64,
    pub death_cause: DeathCause,
    /// Organisms still in the population when this one was removed, itself included
    pub population_size: usize,
}

/// Receives exactly one event per death, before the organism is removed
pub trait LifeEventSink {
    fn record(&mut self, event: &LifeEvent);
}

impl LifeEventSink for Vec<LifeEvent> {
    fn record(&mut self, event: &LifeEvent) {
        self.push(event.clone());
    }
}

/// Discards every event
impl LifeEventSink for () {
    fn record(&mut self, _event: &LifeEvent) {}
}

/// Species occupying each cell at the end of a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub depth: i32,
    pub width: i32,
    pub cells: Vec<Option<Species>>,
}

impl GridSnapshot {
    pub fn get(&self, location: Location) -> Option<Species> {
        if location.row < 0 || location.row >= self.depth || location.col < 0 || location.col >= self.width {
            return None;
        }
        self.cells[(location.row * self.width + location.col) as usize]
    }

    pub fn count(&self, species: Species) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(species)).count()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// Renders or inspects the grid after every tick and decides whether the run is
/// still worth continuing.
pub trait Viewer {
    fn show_status(&mut self, tick: u64, grid: &GridSnapshot);

    /// A run stays viable while both species are present
    fn is_viable(&self, grid: &GridSnapshot) -> bool {
        Species::all().iter().all(|species| grid.count(*species) > 0)
    }
}

/// Viewer that shows nothing and uses the default viability policy
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewer;

impl Viewer for NullViewer {
    fn show_status(&mut self, _tick: u64, _grid: &GridSnapshot) {}
}
