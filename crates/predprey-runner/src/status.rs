//! Viewer that reports population counts through tracing.

use predprey_core::Species;
use predprey_world::{GridSnapshot, Viewer};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct StatusViewer {
    interval: u64,
    last_tick: u64,
    predators: usize,
    prey: usize,
}

impl StatusViewer {
    /// Logs every `interval` ticks; zero only keeps the counts
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Predator => self.predators,
            Species::Prey => self.prey,
        }
    }
}

impl Viewer for StatusViewer {
    fn show_status(&mut self, tick: u64, grid: &GridSnapshot) {
        self.last_tick = tick;
        self.predators = grid.count(Species::Predator);
        self.prey = grid.count(Species::Prey);

        if self.interval > 0 && tick % self.interval == 0 {
            info!(
                tick = tick,
                predators = self.predators,
                prey = self.prey,
                "Tick {}: {} predators, {} prey",
                tick,
                self.predators,
                self.prey
            );
        }
    }
}
