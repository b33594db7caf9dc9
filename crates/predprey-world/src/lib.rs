//! Predator/prey simulation engine.
//!
//! This module implements the bounded 2D grid, the per-organism life cycle, and the
//! tick-stepping population that drives them.

pub mod grid;
pub mod organism;
mod lifecycle;
pub mod population;
pub mod random;
pub mod events;
pub mod seeding;

pub use grid::{Grid, Slot};
pub use organism::Organism;
pub use population::{Population, RunSummary, TickReport};
pub use random::{RandomSource, SimRng};
pub use events::{GridSnapshot, LifeEvent, LifeEventSink, NullViewer, Viewer};
pub use seeding::populate;
