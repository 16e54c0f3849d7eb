//! Path-following movement for the player and units.
//!
//! A mover walks its path one tile at a time, aiming for the tile centre
//! (offset by half its size so the box is centred). Speed is scaled by the
//! walk speed of the tile under the mover's centre.

use hecs::World;

use tileworld_core::components::{Mover, Player, UnitInfo};
use tileworld_core::constants::{ARRIVAL_THRESHOLD, SNAP_DISTANCE};
use tileworld_core::enums::UnitStatus;
use tileworld_core::events::{Actor, GameEvent};
use tileworld_core::types::{Position, Size, TileCoord};
use tileworld_terrain::{find_nearest_walkable, TileMap, TileSet};

use crate::pathfinding::{find_path, is_path_complete, next_path_step};

/// Result of a move order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mover already stands on the requested tile; it has been stopped.
    AlreadyThere,
    /// A path was set. `steps` counts every tile including the current one.
    Planned { steps: usize, destination: TileCoord },
    /// Nothing reaches the destination. The mover is left untouched.
    NoPath { destination: TileCoord },
}

/// What a mover did during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Idle,
    Moving,
    /// Finished the path on this tile.
    Arrived(TileCoord),
}

/// Whether `current` is within the arrival threshold of `target`.
pub fn has_reached_target(current: Position, target: Position) -> bool {
    current.distance_to(&target) <= ARRIVAL_THRESHOLD
}

/// Move `speed` pixels toward `target`, landing exactly on it instead of
/// overshooting.
pub fn step_toward(current: Position, target: Position, speed: f64) -> Position {
    let from = current.as_vec();
    let delta = target.as_vec() - from;
    let distance = delta.length();

    if distance < SNAP_DISTANCE || distance <= speed {
        return target;
    }
    Position::from_vec(from + delta / distance * speed)
}

/// Clamp position and target so the box stays inside the map.
/// The lower bound is applied first.
pub fn clamp_to_map_bounds(
    pos: Position,
    target: Position,
    size: Size,
    map_size: Size,
) -> (Position, Position) {
    let max_x = map_size.width - size.width;
    let max_y = map_size.height - size.height;
    let clamp = |p: Position| {
        let mut x = p.x;
        let mut y = p.y;
        if x < 0.0 {
            x = 0.0;
        }
        if y < 0.0 {
            y = 0.0;
        }
        if x > max_x {
            x = max_x;
        }
        if y > max_y {
            y = max_y;
        }
        Position::new(x, y)
    };
    (clamp(pos), clamp(target))
}

/// Tile under the centre of a mover's box.
pub fn current_tile(map: &TileMap, pos: Position, mover: &Mover) -> TileCoord {
    map.world_to_grid(pos.center_of(mover.size))
}

/// Base speed times the walk speed of the tile under the mover.
pub fn terrain_speed(map: &TileMap, tiles: &TileSet, pos: Position, mover: &Mover) -> f64 {
    let tile = map.get_tile(current_tile(map, pos, mover));
    mover.move_speed * tiles.walk_speed(tile)
}

/// Top-left position that centres the mover on a tile.
fn tile_target(map: &TileMap, mover: &Mover, tile: TileCoord) -> Position {
    map.grid_to_world(tile).top_left_for(mover.size)
}

fn stop(mover: &mut Mover) {
    mover.moving = false;
    mover.path = None;
    mover.path_step = 0;
}

/// Plan a path to `tile` and start walking it.
pub fn move_to_tile(
    map: &TileMap,
    tiles: &TileSet,
    pos: Position,
    mover: &mut Mover,
    tile: TileCoord,
) -> MoveOutcome {
    let current = current_tile(map, pos, mover);
    if current == tile {
        stop(mover);
        return MoveOutcome::AlreadyThere;
    }

    let destination = find_nearest_walkable(map, tiles, tile);
    let path = match find_path(map, tiles, current, destination) {
        Some(path) if !path.is_empty() => path,
        _ => return MoveOutcome::NoPath { destination },
    };

    let steps = path.len();
    if let Some(first) = next_path_step(&path, 0) {
        mover.target = tile_target(map, mover, first);
    }
    mover.path = Some(path);
    mover.path_step = 0;
    mover.moving = true;

    MoveOutcome::Planned { steps, destination }
}

/// Advance one mover by one tick.
pub fn update(map: &TileMap, tiles: &TileSet, pos: &mut Position, mover: &mut Mover) -> StepResult {
    if !mover.moving {
        return StepResult::Idle;
    }
    let Some(path) = mover.path.as_ref() else {
        mover.moving = false;
        return StepResult::Idle;
    };

    if has_reached_target(*pos, mover.target) {
        let next_step = mover.path_step + 1;
        match next_path_step(path, next_step) {
            Some(tile) if !is_path_complete(path, next_step) => {
                mover.target = tile_target(map, mover, tile);
                mover.path_step = next_step;
            }
            _ => {
                let last = path.last().copied().unwrap_or_else(|| current_tile(map, *pos, mover));
                stop(mover);
                return StepResult::Arrived(last);
            }
        }
    }

    let speed = terrain_speed(map, tiles, *pos, mover);
    *pos = step_toward(*pos, mover.target, speed);
    StepResult::Moving
}

/// Move every living mover and report arrivals.
pub fn run(world: &mut World, map: &TileMap, tiles: &TileSet, events: &mut Vec<GameEvent>) {
    for (_entity, (pos, mover, player, info)) in world.query_mut::<(
        &mut Position,
        &mut Mover,
        Option<&Player>,
        Option<&mut UnitInfo>,
    )>() {
        if info.as_ref().is_some_and(|i| i.status == UnitStatus::Dead) {
            continue;
        }

        let result = update(map, tiles, pos, mover);

        let actor = match (&player, &info) {
            (Some(_), _) => Some(Actor::Player),
            (None, Some(info)) => Some(Actor::Unit { unit_id: info.id }),
            (None, None) => None,
        };
        if let (StepResult::Arrived(tile), Some(actor)) = (result, actor) {
            events.push(GameEvent::DestinationReached { actor, tile });
        }

        if let Some(info) = info {
            info.status = if mover.moving {
                UnitStatus::Moving
            } else {
                UnitStatus::Idle
            };
        }
    }
}

/// Keep every mover (and its target) inside the map.
pub fn clamp_all(world: &mut World, map: &TileMap) {
    let map_size = Size::new(map.world_width(), map.world_height());
    for (_entity, (pos, mover)) in world.query_mut::<(&mut Position, &mut Mover)>() {
        let (p, t) = clamp_to_map_bounds(*pos, mover.target, mover.size, map_size);
        *pos = p;
        mover.target = t;
    }
}
