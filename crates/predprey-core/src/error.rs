//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Location ({row}, {col}) is outside the {depth}x{width} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        depth: i32,
        width: i32,
    },

    #[error("Cell ({row}, {col}) is already occupied")]
    CellOccupied { row: i32, col: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
