//! Unit management: creation, move orders, removal and the spatial index.
//!
//! Units are hecs entities carrying `UnitInfo`, `Vitals`, `Mover`,
//! `Position` and `TilePosition`. The `UnitIndex` maps ids to entities and
//! tiles to the units standing on them. Dead units keep their tile until
//! removed.

use std::collections::{BTreeMap, HashMap};

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use tileworld_core::components::{Mover, TilePosition, UnitInfo, Vitals};
use tileworld_core::constants::*;
use tileworld_core::enums::{UnitStatus, UnitType};
use tileworld_core::error::{Result, WorldError};
use tileworld_core::profiles::get_profile;
use tileworld_core::types::{Position, Size, TileCoord, UnitId};
use tileworld_terrain::{TileMap, TileSet};

use crate::systems::movement::{self, MoveOutcome};

/// Lookup from unit id to entity and from tile to units.
#[derive(Debug, Default)]
pub struct UnitIndex {
    entities: BTreeMap<UnitId, Entity>,
    by_tile: HashMap<TileCoord, Vec<UnitId>>,
    next_id: u32,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> UnitId {
        self.next_id += 1;
        UnitId(self.next_id)
    }

    pub fn entity(&self, id: UnitId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// All registered ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.entities.keys().copied()
    }

    /// Registered units, dead ones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Units on a tile in the order they arrived.
    pub fn units_at(&self, tile: TileCoord) -> &[UnitId] {
        self.by_tile.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_occupied(&self, tile: TileCoord) -> bool {
        !self.units_at(tile).is_empty()
    }

    fn insert(&mut self, id: UnitId, entity: Entity, tile: TileCoord) {
        self.entities.insert(id, entity);
        self.by_tile.entry(tile).or_default().push(id);
    }

    fn remove(&mut self, id: UnitId, tile: TileCoord) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.detach(id, tile);
        Some(entity)
    }

    fn detach(&mut self, id: UnitId, tile: TileCoord) {
        if let Some(bucket) = self.by_tile.get_mut(&tile) {
            bucket.retain(|u| *u != id);
            if bucket.is_empty() {
                self.by_tile.remove(&tile);
            }
        }
    }

    fn relocate(&mut self, id: UnitId, from: TileCoord, to: TileCoord) {
        self.detach(id, from);
        self.by_tile.entry(to).or_default().push(id);
    }
}

/// Check that a unit may be placed on a tile.
pub fn validate_position(
    map: &TileMap,
    tiles: &TileSet,
    index: &UnitIndex,
    tile: TileCoord,
) -> Result<()> {
    if !map.in_bounds(tile) {
        return Err(WorldError::OutOfBounds(tile));
    }
    if !map.is_walkable(tile, tiles) {
        return Err(WorldError::NotWalkable(tile));
    }
    if index.is_occupied(tile) {
        return Err(WorldError::Occupied(tile));
    }
    Ok(())
}

/// Create a unit centred on `tile`. Without a name it is called
/// "<Type> #<n>".
#[allow(clippy::too_many_arguments)]
pub fn create_unit(
    world: &mut World,
    index: &mut UnitIndex,
    map: &TileMap,
    tiles: &TileSet,
    unit_type: UnitType,
    tile: TileCoord,
    name: Option<String>,
    tick: u64,
) -> Result<UnitId> {
    validate_position(map, tiles, index, tile)?;

    let id = index.allocate_id();
    let name = name.unwrap_or_else(|| format!("{} #{}", unit_type.name(), id.0));
    let stats = get_profile(unit_type).stats;
    let size = Size::square(UNIT_SIZE);
    let pos = map.grid_to_world(tile).top_left_for(size);

    let entity = world.spawn((
        pos,
        Mover {
            size,
            move_speed: UNIT_MOVE_SPEED,
            target: pos,
            moving: false,
            path: None,
            path_step: 0,
        },
        UnitInfo {
            id,
            unit_type,
            name,
            level: 1,
            experience: 0,
            status: UnitStatus::Idle,
            created_tick: tick,
            last_moved_tick: tick,
        },
        Vitals {
            current: stats,
            max: stats,
            alive: true,
        },
        TilePosition(tile),
    ));
    index.insert(id, entity, tile);

    info!(%id, ?unit_type, %tile, "unit created");
    Ok(id)
}

/// Order a unit to walk to a tile.
///
/// A unit already indexed on `tile` is left alone.
pub fn move_unit(
    world: &mut World,
    index: &UnitIndex,
    map: &TileMap,
    tiles: &TileSet,
    id: UnitId,
    tile: TileCoord,
    tick: u64,
) -> Result<MoveOutcome> {
    let entity = index.entity(id).ok_or(WorldError::UnitNotFound(id))?;
    let (pos, mover, info, vitals, tile_pos) = world
        .query_one_mut::<(&Position, &mut Mover, &mut UnitInfo, &Vitals, &TilePosition)>(entity)
        .map_err(|_| WorldError::UnitNotFound(id))?;

    if !vitals.alive {
        return Err(WorldError::UnitDead(id));
    }
    if !map.in_bounds(tile) {
        return Err(WorldError::OutOfBounds(tile));
    }
    if tile_pos.0 == tile {
        return Ok(MoveOutcome::AlreadyThere);
    }

    let outcome = movement::move_to_tile(map, tiles, *pos, mover, tile);
    info.last_moved_tick = tick;
    if matches!(outcome, MoveOutcome::Planned { .. }) {
        info.status = UnitStatus::Moving;
    }
    debug!(%id, %tile, ?outcome, "unit move order");
    Ok(outcome)
}

/// Despawn a unit and drop it from the index.
pub fn remove_unit(world: &mut World, index: &mut UnitIndex, id: UnitId) -> Result<()> {
    let entity = index.entity(id).ok_or(WorldError::UnitNotFound(id))?;
    let tile = world
        .get::<&TilePosition>(entity)
        .map(|t| t.0)
        .map_err(|_| WorldError::UnitNotFound(id))?;

    world
        .despawn(entity)
        .map_err(|_| WorldError::UnitNotFound(id))?;
    index.remove(id, tile);

    info!(%id, "unit removed");
    Ok(())
}

/// Number of living units.
pub fn alive_count(world: &World) -> usize {
    world
        .query::<(&UnitInfo, &Vitals)>()
        .iter()
        .filter(|(_, (_, vitals))| vitals.alive)
        .count()
}

/// Living units per type. Every type is present, possibly with 0.
pub fn type_counts(world: &World) -> BTreeMap<UnitType, usize> {
    let mut counts: BTreeMap<UnitType, usize> = UnitType::ALL.iter().map(|t| (*t, 0)).collect();
    for (_, (info, vitals)) in world.query::<(&UnitInfo, &Vitals)>().iter() {
        if vitals.alive {
            *counts.entry(info.unit_type).or_default() += 1;
        }
    }
    counts
}

/// Create a random Warrior, Archer or Mage on a random free tile.
pub fn spawn_random_unit(
    world: &mut World,
    index: &mut UnitIndex,
    map: &TileMap,
    tiles: &TileSet,
    rng: &mut ChaCha8Rng,
    tick: u64,
) -> Result<UnitId> {
    if alive_count(world) >= MAX_UNITS {
        return Err(WorldError::MaxUnitsReached(MAX_UNITS));
    }

    let unit_type = UnitType::RANDOM_SPAWN
        .choose(rng)
        .copied()
        .unwrap_or_default();

    for _ in 0..SPAWN_ATTEMPTS {
        let tile = TileCoord::new(rng.gen_range(0..map.width()), rng.gen_range(0..map.height()));
        if validate_position(map, tiles, index, tile).is_ok() {
            let name = format!("Unit_{}", rng.gen_range(0..10_000));
            return create_unit(world, index, map, tiles, unit_type, tile, Some(name), tick);
        }
    }

    Err(WorldError::NoSpawnLocation)
}

/// Remove the most recently created unit, keeping at least one alive.
pub fn remove_newest_unit(world: &mut World, index: &mut UnitIndex) -> Result<UnitId> {
    if alive_count(world) <= MIN_UNITS {
        return Err(WorldError::MinimumUnits(MIN_UNITS));
    }

    let newest = world
        .query::<&UnitInfo>()
        .iter()
        .map(|(_, info)| (info.created_tick, info.id))
        .max()
        .map(|(_, id)| id)
        .ok_or(WorldError::MinimumUnits(MIN_UNITS))?;

    remove_unit(world, index, newest)?;
    Ok(newest)
}

/// Re-index units whose centre moved onto another tile.
pub fn sync_tiles(world: &mut World, index: &mut UnitIndex, map: &TileMap) {
    for (_entity, (info, pos, mover, tile_pos)) in
        world.query_mut::<(&UnitInfo, &Position, &Mover, &mut TilePosition)>()
    {
        let tile = movement::current_tile(map, *pos, mover);
        if tile != tile_pos.0 {
            index.relocate(info.id, tile_pos.0, tile);
            tile_pos.0 = tile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Fixture {
        world: World,
        index: UnitIndex,
        map: TileMap,
        tiles: TileSet,
    }

    fn fixture() -> Fixture {
        Fixture {
            world: World::new(),
            index: UnitIndex::new(),
            map: TileMap::from_ascii(
                &[
                    "......", //
                    "..~~..", //
                    "......", //
                ],
                32.0,
            )
            .unwrap(),
            tiles: TileSet::default(),
        }
    }

    fn create(f: &mut Fixture, unit_type: UnitType, x: i32, y: i32) -> Result<UnitId> {
        create_unit(
            &mut f.world,
            &mut f.index,
            &f.map,
            &f.tiles,
            unit_type,
            TileCoord::new(x, y),
            None,
            0,
        )
    }

    #[test]
    fn test_create_unit_defaults() {
        let mut f = fixture();
        let id = create(&mut f, UnitType::Archer, 1, 0).unwrap();
        assert_eq!(id, UnitId(1));

        let entity = f.index.entity(id).unwrap();
        let info = f.world.get::<&UnitInfo>(entity).unwrap();
        assert_eq!(info.name, "Archer #1");
        assert_eq!(info.level, 1);
        assert_eq!(info.status, UnitStatus::Idle);

        let vitals = f.world.get::<&Vitals>(entity).unwrap();
        assert_eq!(vitals.current.health, 60);
        assert_eq!(vitals.max, vitals.current);

        // Centred on the tile: (32 + 16 - 8, 0 + 16 - 8).
        let pos = *f.world.get::<&Position>(entity).unwrap();
        assert_eq!(pos, Position::new(40.0, 8.0));
        assert_eq!(f.index.units_at(TileCoord::new(1, 0)), &[id]);
    }

    #[test]
    fn test_create_unit_validation() {
        let mut f = fixture();
        assert_eq!(
            create(&mut f, UnitType::Warrior, 6, 0),
            Err(WorldError::OutOfBounds(TileCoord::new(6, 0)))
        );
        assert_eq!(
            create(&mut f, UnitType::Warrior, 2, 1),
            Err(WorldError::NotWalkable(TileCoord::new(2, 1)))
        );
        create(&mut f, UnitType::Warrior, 0, 0).unwrap();
        assert_eq!(
            create(&mut f, UnitType::Mage, 0, 0),
            Err(WorldError::Occupied(TileCoord::new(0, 0)))
        );
        assert_eq!(f.index.len(), 1);
    }

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let mut f = fixture();
        let a = create(&mut f, UnitType::Warrior, 0, 0).unwrap();
        let b = create(&mut f, UnitType::Scout, 1, 0).unwrap();
        remove_unit(&mut f.world, &mut f.index, b).unwrap();
        let c = create(&mut f, UnitType::Scout, 1, 0).unwrap();
        assert_eq!((a, b, c), (UnitId(1), UnitId(2), UnitId(3)));
    }

    #[test]
    fn test_remove_unit_frees_tile() {
        let mut f = fixture();
        let id = create(&mut f, UnitType::Mage, 3, 2).unwrap();
        assert!(f.index.is_occupied(TileCoord::new(3, 2)));

        remove_unit(&mut f.world, &mut f.index, id).unwrap();
        assert!(!f.index.is_occupied(TileCoord::new(3, 2)));
        assert!(f.index.is_empty());
        assert_eq!(
            remove_unit(&mut f.world, &mut f.index, id),
            Err(WorldError::UnitNotFound(id))
        );
    }

    #[test]
    fn test_move_unit_errors() {
        let mut f = fixture();
        let id = create(&mut f, UnitType::Warrior, 0, 0).unwrap();
        let missing = UnitId(99);
        assert_eq!(
            move_unit(&mut f.world, &f.index, &f.map, &f.tiles, missing, TileCoord::new(1, 1), 0),
            Err(WorldError::UnitNotFound(missing))
        );
        assert_eq!(
            move_unit(&mut f.world, &f.index, &f.map, &f.tiles, id, TileCoord::new(0, 0), 0),
            Ok(MoveOutcome::AlreadyThere)
        );
        assert_eq!(
            move_unit(&mut f.world, &f.index, &f.map, &f.tiles, id, TileCoord::new(-1, 0), 0),
            Err(WorldError::OutOfBounds(TileCoord::new(-1, 0)))
        );

        let entity = f.index.entity(id).unwrap();
        f.world.get::<&mut Vitals>(entity).unwrap().alive = false;
        assert_eq!(
            move_unit(&mut f.world, &f.index, &f.map, &f.tiles, id, TileCoord::new(5, 2), 0),
            Err(WorldError::UnitDead(id))
        );
    }

    #[test]
    fn test_move_unit_walks_and_reindexes() {
        let mut f = fixture();
        let id = create(&mut f, UnitType::Scout, 0, 0).unwrap();
        let outcome =
            move_unit(&mut f.world, &f.index, &f.map, &f.tiles, id, TileCoord::new(5, 2), 7)
                .unwrap();
        assert!(matches!(outcome, MoveOutcome::Planned { .. }));

        let entity = f.index.entity(id).unwrap();
        assert_eq!(f.world.get::<&UnitInfo>(entity).unwrap().last_moved_tick, 7);

        let mut events = Vec::new();
        for _ in 0..300 {
            movement::run(&mut f.world, &f.map, &f.tiles, &mut events);
            sync_tiles(&mut f.world, &mut f.index, &f.map);
        }
        assert_eq!(f.index.units_at(TileCoord::new(5, 2)), &[id]);
        assert!(!f.index.is_occupied(TileCoord::new(0, 0)));
        assert_eq!(f.world.get::<&UnitInfo>(entity).unwrap().status, UnitStatus::Idle);
        assert_eq!(events.len(), 1, "One arrival: {events:?}");
    }

    #[test]
    fn test_counts_skip_dead_units() {
        let mut f = fixture();
        create(&mut f, UnitType::Warrior, 0, 0).unwrap();
        let b = create(&mut f, UnitType::Warrior, 1, 0).unwrap();
        create(&mut f, UnitType::Mage, 2, 0).unwrap();

        let entity = f.index.entity(b).unwrap();
        f.world.get::<&mut Vitals>(entity).unwrap().alive = false;

        assert_eq!(alive_count(&f.world), 2);
        let counts = type_counts(&f.world);
        assert_eq!(counts[&UnitType::Warrior], 1);
        assert_eq!(counts[&UnitType::Mage], 1);
        assert_eq!(counts[&UnitType::Scout], 0);
        // The dead unit still blocks its tile.
        assert!(f.index.is_occupied(TileCoord::new(1, 0)));
    }

    #[test]
    fn test_spawn_random_unit() {
        let mut f = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = spawn_random_unit(&mut f.world, &mut f.index, &f.map, &f.tiles, &mut rng, 0)
            .unwrap();
        let entity = f.index.entity(id).unwrap();
        let info = f.world.get::<&UnitInfo>(entity).unwrap();
        assert!(UnitType::RANDOM_SPAWN.contains(&info.unit_type));
        assert!(info.name.starts_with("Unit_"));
    }

    #[test]
    fn test_spawn_random_unit_limits() {
        let mut f = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // 16 free tiles, so ten spawns succeed easily.
        for _ in 0..MAX_UNITS {
            spawn_random_unit(&mut f.world, &mut f.index, &f.map, &f.tiles, &mut rng, 0).unwrap();
        }
        assert_eq!(
            spawn_random_unit(&mut f.world, &mut f.index, &f.map, &f.tiles, &mut rng, 0),
            Err(WorldError::MaxUnitsReached(MAX_UNITS))
        );

        // A map with no free tile gives up after the attempt budget.
        let mut f = fixture();
        f.map = TileMap::from_ascii(&["~~"], 32.0).unwrap();
        assert_eq!(
            spawn_random_unit(&mut f.world, &mut f.index, &f.map, &f.tiles, &mut rng, 0),
            Err(WorldError::NoSpawnLocation)
        );
    }

    #[test]
    fn test_remove_newest_unit() {
        let mut f = fixture();
        let a = create_unit(
            &mut f.world,
            &mut f.index,
            &f.map,
            &f.tiles,
            UnitType::Warrior,
            TileCoord::new(0, 0),
            None,
            5,
        )
        .unwrap();
        let b = create_unit(
            &mut f.world,
            &mut f.index,
            &f.map,
            &f.tiles,
            UnitType::Archer,
            TileCoord::new(1, 0),
            None,
            9,
        )
        .unwrap();

        assert_eq!(remove_newest_unit(&mut f.world, &mut f.index), Ok(b));
        assert_eq!(
            remove_newest_unit(&mut f.world, &mut f.index),
            Err(WorldError::MinimumUnits(MIN_UNITS))
        );
        assert!(f.index.entity(a).is_some());
    }
}
