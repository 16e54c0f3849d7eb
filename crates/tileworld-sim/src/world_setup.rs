//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player and the starting squad of units.

use hecs::{Entity, World};
use tracing::warn;

use tileworld_core::components::*;
use tileworld_core::constants::*;
use tileworld_core::enums::UnitType;
use tileworld_core::types::{Position, Size, TileCoord, UnitId};
use tileworld_terrain::{TileMap, TileSet};

use crate::systems::units::{self, UnitIndex};

/// Starting squad, as offsets from the map's centre tile.
const INITIAL_UNITS: [(UnitType, i32, i32); 4] = [
    (UnitType::Warrior, -5, -5),
    (UnitType::Archer, -3, -5),
    (UnitType::Mage, -5, -3),
    (UnitType::Scout, -3, -3),
];

/// Top-left position that centres the player on the world.
pub fn player_start(map: &TileMap) -> Position {
    Position::new(
        (map.world_width() - PLAYER_SIZE) / 2.0,
        (map.world_height() - PLAYER_SIZE) / 2.0,
    )
}

/// Spawn the player at the centre of the world, standing still.
pub fn spawn_player(world: &mut World, map: &TileMap) -> Entity {
    let pos = player_start(map);
    world.spawn((
        Player,
        pos,
        Mover {
            size: Size::square(PLAYER_SIZE),
            move_speed: PLAYER_MOVE_SPEED,
            target: pos,
            moving: false,
            path: None,
            path_step: 0,
        },
    ))
}

/// Place the starting squad around the map centre.
/// Placements that fail (water, off-map) are skipped with a warning.
pub fn setup_initial_units(
    world: &mut World,
    index: &mut UnitIndex,
    map: &TileMap,
    tiles: &TileSet,
) -> Vec<UnitId> {
    let center = map.center_tile();
    let mut created = Vec::with_capacity(INITIAL_UNITS.len());

    for (unit_type, dx, dy) in INITIAL_UNITS {
        let tile = center.offset(dx, dy);
        match units::create_unit(world, index, map, tiles, unit_type, tile, None, 0) {
            Ok(id) => created.push(id),
            Err(e) => warn!(?unit_type, %tile, error = %e, "initial unit not placed"),
        }
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_at_world_centre() {
        let map = TileMap::new(200, 200, 32.0).unwrap();
        let mut world = World::new();
        let player = spawn_player(&mut world, &map);

        let pos = *world.get::<&Position>(player).unwrap();
        assert_eq!(pos, Position::new(3190.0, 3190.0));
        let mover = world.get::<&Mover>(player).unwrap();
        assert!(!mover.moving);
        assert_eq!(mover.target, pos);
    }

    #[test]
    fn test_initial_units_on_grass_map() {
        let map = TileMap::new(200, 200, 32.0).unwrap();
        let mut world = World::new();
        let mut index = UnitIndex::new();
        let ids = setup_initial_units(&mut world, &mut index, &map, &TileSet::default());

        assert_eq!(ids.len(), 4);
        assert_eq!(index.units_at(TileCoord::new(95, 95)), &[UnitId(1)]);
        assert_eq!(index.units_at(TileCoord::new(97, 95)), &[UnitId(2)]);
        assert_eq!(index.units_at(TileCoord::new(95, 97)), &[UnitId(3)]);
        assert_eq!(index.units_at(TileCoord::new(97, 97)), &[UnitId(4)]);
    }

    #[test]
    fn test_initial_units_skip_bad_tiles() {
        // Centre (2, 2): offsets land off the map.
        let map = TileMap::new(4, 4, 32.0).unwrap();
        let mut world = World::new();
        let mut index = UnitIndex::new();
        let ids = setup_initial_units(&mut world, &mut index, &map, &TileSet::default());
        assert!(ids.is_empty());
        assert!(index.is_empty());
    }
}
