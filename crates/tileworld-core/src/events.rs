//! Events emitted by the simulation for UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::UnitType;
use crate::types::{TileCoord, UnitId};

/// Entity an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Actor {
    Player,
    Unit { unit_id: UnitId },
}

/// Notable things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A path was found and the actor started walking.
    PathPlanned {
        actor: Actor,
        steps: usize,
        destination: TileCoord,
    },
    /// No path reaches the requested tile.
    PathNotFound {
        actor: Actor,
        destination: TileCoord,
    },
    /// The actor walked the last step of its path.
    DestinationReached { actor: Actor, tile: TileCoord },
    UnitCreated {
        unit_id: UnitId,
        unit_type: UnitType,
        tile: TileCoord,
    },
    UnitRemoved { unit_id: UnitId },
    UnitDamaged {
        unit_id: UnitId,
        amount: i32,
        remaining: i32,
    },
    UnitHealed {
        unit_id: UnitId,
        amount: i32,
        health: i32,
    },
    UnitDied { unit_id: UnitId },
    /// A queued command could not be carried out.
    CommandRejected { reason: String },
}
