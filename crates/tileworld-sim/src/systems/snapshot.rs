//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use tileworld_core::components::*;
use tileworld_core::enums::GamePhase;
use tileworld_core::events::GameEvent;
use tileworld_core::state::*;
use tileworld_core::types::{Position, SimTime};
use tileworld_terrain::TileMap;

use crate::systems::camera::Camera;
use crate::systems::combat::{health_fraction, is_healthy};
use crate::systems::{movement, units};

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    map: &TileMap,
    camera: &Camera,
    time: &SimTime,
    phase: GamePhase,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        camera: camera.view(),
        visible_tiles: camera.visible_tiles(map),
        player: build_player(world, map),
        units: build_units(world),
        unit_counts: units::type_counts(world),
        events,
    }
}

fn build_player(world: &World, map: &TileMap) -> PlayerView {
    world
        .query::<(&Player, &Position, &Mover)>()
        .iter()
        .next()
        .map(|(_, (_, pos, mover))| PlayerView {
            position: *pos,
            size: mover.size,
            tile: movement::current_tile(map, *pos, mover),
            moving: mover.moving,
            path_remaining: mover
                .path
                .as_ref()
                .map(|path| path.iter().skip(mover.path_step).copied().collect())
                .unwrap_or_default(),
        })
        .unwrap_or_default()
}

/// Alive units sorted by id.
fn build_units(world: &World) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(&UnitInfo, &Vitals, &Position, &Mover, &TilePosition)>()
        .iter()
        .filter(|(_, (_, vitals, _, _, _))| vitals.alive)
        .map(|(_, (info, vitals, pos, mover, tile))| UnitView {
            id: info.id,
            unit_type: info.unit_type,
            name: info.name.clone(),
            position: *pos,
            tile: tile.0,
            stats: vitals.current,
            max_stats: vitals.max,
            level: info.level,
            experience: info.experience,
            status: info.status,
            moving: mover.moving,
            health_percentage: health_fraction(vitals),
            healthy: is_healthy(vitals),
        })
        .collect();

    units.sort_by_key(|u| u.id);
    units
}
