use thiserror::Error;

use tileworld_core::enums::TileType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f64),

    #[error("expected {expected} tiles, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("walkable tile {tile:?} needs a positive walk speed, got {walk_speed}")]
    InvalidWalkSpeed { tile: TileType, walk_speed: f64 },

    #[error("unknown map glyph {0:?}")]
    UnknownGlyph(char),
}
