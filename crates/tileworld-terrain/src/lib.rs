//! Terrain system for tileworld.
//!
//! Tile definitions, the tile map grid, procedural terrain,
//! nearest-walkable search and the `.tmap` file format.

pub use tileworld_core as core;

pub mod error;
pub mod generation;
pub mod grid;
pub mod nearest;
pub mod tiles;
pub mod tmap;

// Re-export key types for convenience.
pub use error::TerrainError;
pub use generation::generate_terrain;
pub use grid::TileMap;
pub use nearest::find_nearest_walkable;
pub use tiles::{TileDef, TileOverride, TileSet};
