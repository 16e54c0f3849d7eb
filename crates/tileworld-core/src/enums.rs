//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Terrain type of a single map tile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TileType {
    #[default]
    Grass,
    Water,
    DirtPath,
}

impl TileType {
    pub const ALL: [TileType; 3] = [TileType::Grass, TileType::Water, TileType::DirtPath];

    /// One-byte code used by the binary map format.
    pub fn code(self) -> u8 {
        match self {
            TileType::Grass => 0,
            TileType::Water => 1,
            TileType::DirtPath => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileType::Grass),
            1 => Some(TileType::Water),
            2 => Some(TileType::DirtPath),
            _ => None,
        }
    }
}

/// Kind of unit. Determines base stats and appearance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum UnitType {
    #[default]
    Warrior,
    Archer,
    Mage,
    Scout,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Warrior,
        UnitType::Archer,
        UnitType::Mage,
        UnitType::Scout,
    ];

    /// Types chosen from when spawning a random unit.
    pub const RANDOM_SPAWN: [UnitType; 3] = [UnitType::Warrior, UnitType::Archer, UnitType::Mage];

    /// Display name ("Warrior", "Archer", ...).
    pub fn name(self) -> &'static str {
        match self {
            UnitType::Warrior => "Warrior",
            UnitType::Archer => "Archer",
            UnitType::Mage => "Mage",
            UnitType::Scout => "Scout",
        }
    }
}

/// Lifecycle status of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    #[default]
    Idle,
    Moving,
    Dead,
}

/// Whether the simulation is advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
}
