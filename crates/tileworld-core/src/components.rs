//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Path, Position, Size, TileCoord, UnitId, UnitStats};

/// Marker for the player-controlled entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Path-following movement state shared by the player and all units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mover {
    /// Bounding box size (pixels).
    pub size: Size,
    /// Base speed in pixels per tick before terrain modifiers.
    pub move_speed: f64,
    /// Top-left position the entity is currently heading for.
    pub target: Position,
    pub moving: bool,
    /// Active path, None when idle.
    pub path: Option<Path>,
    /// Index into `path` of the tile currently targeted.
    pub path_step: usize,
}

/// Identity and progression of a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInfo {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub status: UnitStatus,
    /// Tick at which the unit was created.
    pub created_tick: u64,
    /// Tick of the most recent move order.
    pub last_moved_tick: u64,
}

/// Current and maximum stats of a unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub current: UnitStats,
    pub max: UnitStats,
    pub alive: bool,
}

/// Tile a unit is registered under in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePosition(pub TileCoord);
