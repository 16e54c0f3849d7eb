//! Game state snapshot: the complete visible state sent to the frontend each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime, Size, TileCoord, UnitId, UnitStats};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub camera: CameraView,
    /// Tiles a renderer has to draw for the current camera.
    pub visible_tiles: TileRange,
    pub player: PlayerView,
    /// Alive units, sorted by id.
    pub units: Vec<UnitView>,
    /// Alive units per type.
    pub unit_counts: BTreeMap<UnitType, usize>,
    pub events: Vec<GameEvent>,
}

/// Camera offset and viewport size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub x: f64,
    pub y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// Inclusive rectangle of tile coordinates.
/// Empty when `start_x > end_x` or `start_y > end_y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl TileRange {
    pub fn is_empty(&self) -> bool {
        self.start_x > self.end_x || self.start_y > self.end_y
    }

    /// Number of tiles covered.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let w = (self.end_x - self.start_x + 1) as usize;
        let h = (self.end_y - self.start_y + 1) as usize;
        w * h
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= self.start_x && tile.x <= self.end_x && tile.y >= self.start_y && tile.y <= self.end_y
    }

    /// Row-major iteration over the covered tiles.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let (sx, ex) = (self.start_x, self.end_x);
        (self.start_y..=self.end_y).flat_map(move |y| (sx..=ex).map(move |x| TileCoord::new(x, y)))
    }
}

/// The player's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub size: Size,
    /// Tile under the player's centre.
    pub tile: TileCoord,
    pub moving: bool,
    /// Tiles still to walk, including the one currently targeted.
    pub path_remaining: Vec<TileCoord>,
}

/// A unit as shown by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub name: String,
    pub position: Position,
    pub tile: TileCoord,
    pub stats: UnitStats,
    pub max_stats: UnitStats,
    pub level: u32,
    pub experience: u32,
    pub status: UnitStatus,
    pub moving: bool,
    /// Current health over max health (0.0 to 1.0).
    pub health_percentage: f64,
    /// At full health.
    pub healthy: bool,
}
