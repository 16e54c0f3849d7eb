//! Errors raised by world and unit operations.

use thiserror::Error;

use crate::types::{TileCoord, UnitId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("tile coordinates out of bounds: {0}")]
    OutOfBounds(TileCoord),

    #[error("cannot place unit on non-walkable tile at {0}")]
    NotWalkable(TileCoord),

    #[error("tile already occupied at {0}")]
    Occupied(TileCoord),

    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("maximum unit count reached ({0})")]
    MaxUnitsReached(usize),

    #[error("cannot remove unit: minimum of {0} unit required")]
    MinimumUnits(usize),

    #[error("no valid spawn location found")]
    NoSpawnLocation,

    #[error("heal amount must not be negative, got {0}")]
    NegativeHeal(i32),

    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, WorldError>;
