//! Tile definitions: walkability, speed and colour per terrain type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tileworld_core::enums::TileType;

use crate::error::TerrainError;

/// Properties of a terrain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub walkable: bool,
    /// Multiplier on a mover's base speed. Higher is faster.
    pub walk_speed: f64,
    /// CSS hex colour used by renderers.
    pub color: String,
}

impl TileDef {
    pub fn new(walkable: bool, walk_speed: f64, color: &str) -> Self {
        Self {
            walkable,
            walk_speed,
            color: color.to_string(),
        }
    }

    fn grass() -> Self {
        Self::new(true, 1.0, "#90EE90")
    }
}

/// Partial replacement of a tile definition, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileOverride {
    pub tile: TileType,
    #[serde(default)]
    pub walkable: Option<bool>,
    #[serde(default)]
    pub walk_speed: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Lookup table of tile definitions.
///
/// Types without a definition resolve to the grass definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    defs: HashMap<TileType, TileDef>,
    fallback: TileDef,
}

impl Default for TileSet {
    fn default() -> Self {
        let mut defs = HashMap::new();
        defs.insert(TileType::Grass, TileDef::grass());
        defs.insert(TileType::Water, TileDef::new(false, 0.0, "#4169E1"));
        defs.insert(TileType::DirtPath, TileDef::new(true, 1.5, "#8B4513"));
        Self {
            defs,
            fallback: TileDef::grass(),
        }
    }
}

impl TileSet {
    /// A tile set with no definitions at all (everything resolves to grass).
    pub fn empty() -> Self {
        Self {
            defs: HashMap::new(),
            fallback: TileDef::grass(),
        }
    }

    /// Definition for a tile type, falling back to grass.
    pub fn get(&self, tile: TileType) -> &TileDef {
        self.defs
            .get(&tile)
            .or_else(|| self.defs.get(&TileType::Grass))
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, tile: TileType) -> bool {
        self.defs.contains_key(&tile)
    }

    pub fn insert(&mut self, tile: TileType, def: TileDef) {
        self.defs.insert(tile, def);
    }

    pub fn remove(&mut self, tile: TileType) -> Option<TileDef> {
        self.defs.remove(&tile)
    }

    pub fn is_walkable(&self, tile: TileType) -> bool {
        self.get(tile).walkable
    }

    pub fn walk_speed(&self, tile: TileType) -> f64 {
        self.get(tile).walk_speed
    }

    /// Apply configuration overrides on top of the current definitions.
    pub fn apply_overrides(&mut self, overrides: &[TileOverride]) {
        for o in overrides {
            let mut def = self.get(o.tile).clone();
            if let Some(walkable) = o.walkable {
                def.walkable = walkable;
            }
            if let Some(speed) = o.walk_speed {
                def.walk_speed = speed;
            }
            if let Some(color) = &o.color {
                def.color = color.clone();
            }
            self.defs.insert(o.tile, def);
        }
    }

    /// Every walkable definition must have a positive, finite speed.
    /// Pathfinding divides by it.
    pub fn validate(&self) -> Result<(), TerrainError> {
        for tile in TileType::ALL {
            let def = self.get(tile);
            if def.walkable && !(def.walk_speed.is_finite() && def.walk_speed > 0.0) {
                return Err(TerrainError::InvalidWalkSpeed {
                    tile,
                    walk_speed: def.walk_speed,
                });
            }
        }
        Ok(())
    }
}
