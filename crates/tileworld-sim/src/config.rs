//! Simulation configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! seed = 7
//!
//! [map]
//! width = 64
//! height = 64
//!
//! [[tiles]]
//! tile = "DirtPath"
//! walk_speed = 2.0
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tileworld_core::constants::*;
use tileworld_terrain::grid::check_dimensions;
use tileworld_terrain::{TerrainError, TileMap, TileOverride, TileSet};

use crate::systems::camera::valid_viewport;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub map: MapConfig,
    pub viewport: ViewportConfig,
    /// Place the four starter units next to the player.
    pub spawn_initial_units: bool,
    /// Changes to the default tile definitions.
    pub tiles: Vec<TileOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    pub tile_size: f64,
    /// Fill the map with lakes, rivers and paths instead of plain grass.
    pub generate_terrain: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            map: MapConfig::default(),
            viewport: ViewportConfig::default(),
            spawn_initial_units: true,
            tiles: Vec::new(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            tile_size: TILE_SIZE,
            generate_terrain: true,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_settings()?;
        check_dimensions(self.map.width, self.map.height, self.map.tile_size)?;
        Ok(())
    }

    /// Everything except the map section.
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        let v = &self.viewport;
        if !valid_viewport(v.width, v.height) {
            return Err(ConfigError::InvalidViewport {
                width: v.width,
                height: v.height,
            });
        }
        self.tile_set().validate()?;
        Ok(())
    }

    /// Default tile definitions with the configured overrides applied.
    pub fn tile_set(&self) -> TileSet {
        let mut tiles = TileSet::default();
        tiles.apply_overrides(&self.tiles);
        tiles
    }

    /// Build the map described by this config.
    pub fn build_map(&self) -> Result<TileMap, TerrainError> {
        let m = &self.map;
        if m.generate_terrain {
            TileMap::generated(m.width, m.height, m.tile_size)
        } else {
            TileMap::new(m.width, m.height, m.tile_size)
        }
    }
}
