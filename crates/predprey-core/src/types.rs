//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an organism, unique within one population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Chessboard distance; all eight neighbours are at distance 1
    pub fn chebyshev_distance(&self, other: &Location) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The two kinds of organism living on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Predator,
    Prey,
}

impl Species {
    pub fn all() -> [Species; 2] {
        [Species::Predator, Species::Prey]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Predator => "PREDATOR",
            Species::Prey => "PREY",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an organism stopped living. `None` while it is still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeathCause {
    #[default]
    None,
    Age,
    Hunger,
    Overcrowd,
    Eaten,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::None => "NONE",
            DeathCause::Age => "AGE",
            DeathCause::Hunger => "HUNGER",
            DeathCause::Overcrowd => "OVERCROWD",
            DeathCause::Eaten => "EATEN",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_equality_and_offset() {
        let loc = Location::new(2, 3);
        assert_eq!(loc, Location::new(2, 3));
        assert_ne!(loc, Location::new(3, 2));
        assert_eq!(loc.offset(-1, 1), Location::new(1, 4));
    }

    #[test]
    fn test_chebyshev_distance() {
        let origin = Location::new(0, 0);
        assert_eq!(origin.chebyshev_distance(&Location::new(1, 1)), 1);
        assert_eq!(origin.chebyshev_distance(&Location::new(-2, 1)), 2);
        assert_eq!(origin.chebyshev_distance(&origin), 0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Species::Predator.to_string(), "PREDATOR");
        assert_eq!(Species::Prey.to_string(), "PREY");
        assert_eq!(DeathCause::Overcrowd.to_string(), "OVERCROWD");
        assert_eq!(DeathCause::default(), DeathCause::None);
    }

    #[test]
    fn test_species_serialization() {
        let json = serde_json::to_string(&Species::Prey).unwrap();
        assert_eq!(json, "\"PREY\"");
        let cause: DeathCause = serde_json::from_str("\"EATEN\"").unwrap();
        assert_eq!(cause, DeathCause::Eaten);
    }
}
