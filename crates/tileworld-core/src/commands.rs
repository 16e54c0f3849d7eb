//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::UnitId;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Player movement ---
    /// Click on the canvas at screen coordinates.
    ClickCanvas { x: f64, y: f64 },
    /// Walk the player to a tile.
    MoveToTile { x: i32, y: i32 },
    /// Put the player back at the centre of the world.
    Recenter,
    /// The canvas was resized.
    ResizeViewport { width: f64, height: f64 },

    // --- Unit management ---
    /// Create a unit on a tile.
    CreateUnit {
        unit_type: UnitType,
        x: i32,
        y: i32,
        #[serde(default)]
        name: Option<String>,
    },
    /// Order a unit to walk to a tile.
    MoveUnit { unit_id: UnitId, x: i32, y: i32 },
    RemoveUnit { unit_id: UnitId },
    DamageUnit { unit_id: UnitId, amount: i32 },
    HealUnit { unit_id: UnitId, amount: i32 },
    /// Spawn a random unit at a random free tile.
    SpawnRandomUnit,
    /// Remove the most recently created unit.
    RemoveNewestUnit,

    // --- Simulation control ---
    Pause,
    Resume,
}
