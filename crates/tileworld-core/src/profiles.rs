//! Per-type unit profiles: base stats and presentation.

use serde::Serialize;

use crate::enums::UnitType;
use crate::types::UnitStats;

/// How a unit type is drawn by a frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitAppearance {
    pub icon: &'static str,
    /// CSS hex colour.
    pub color: &'static str,
    /// Sprite edge in pixels.
    pub size: u32,
}

/// Everything a unit type brings with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitProfile {
    pub unit_type: UnitType,
    pub stats: UnitStats,
    pub appearance: UnitAppearance,
    pub description: &'static str,
}

/// Get the profile for a unit type.
pub fn get_profile(unit_type: UnitType) -> UnitProfile {
    match unit_type {
        UnitType::Warrior => UnitProfile {
            unit_type,
            stats: UnitStats {
                health: 100,
                damage: 25,
                speed: 2,
                defense: 15,
            },
            appearance: UnitAppearance {
                icon: "⚔️",
                color: "#8B4513",
                size: 24,
            },
            description: "A heavy armored fighter with high health and defense",
        },
        UnitType::Archer => UnitProfile {
            unit_type,
            stats: UnitStats {
                health: 60,
                damage: 40,
                speed: 4,
                defense: 5,
            },
            appearance: UnitAppearance {
                icon: "🏹",
                color: "#228B22",
                size: 20,
            },
            description: "A ranged fighter with high damage and speed",
        },
        UnitType::Mage => UnitProfile {
            unit_type,
            stats: UnitStats {
                health: 40,
                damage: 60,
                speed: 3,
                defense: 2,
            },
            appearance: UnitAppearance {
                icon: "🔮",
                color: "#4B0082",
                size: 20,
            },
            description: "A magic user with devastating spells but low defense",
        },
        UnitType::Scout => UnitProfile {
            unit_type,
            stats: UnitStats {
                health: 30,
                damage: 15,
                speed: 6,
                defense: 3,
            },
            appearance: UnitAppearance {
                icon: "👁️",
                color: "#DAA520",
                size: 18,
            },
            description: "A fast reconnaissance unit with high mobility",
        },
    }
}
