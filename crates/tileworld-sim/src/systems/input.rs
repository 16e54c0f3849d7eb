//! Canvas click handling: screen coordinates to a player move order.

use hecs::{Entity, World};

use tileworld_core::components::Mover;
use tileworld_core::constants::UI_AREA_HEIGHT;
use tileworld_core::types::{Position, TileCoord};
use tileworld_terrain::{TileMap, TileSet};

use crate::systems::camera::Camera;
use crate::systems::movement::{self, MoveOutcome};

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Landed on the button strip at the bottom of the canvas.
    UiArea,
    /// Landed on a tile outside the map.
    OutOfBounds(TileCoord),
    /// The player entity is gone.
    NoPlayer,
    Move { tile: TileCoord, outcome: MoveOutcome },
}

/// Whether a screen y coordinate falls in the button strip.
pub fn is_ui_area(camera: &Camera, screen_y: f64) -> bool {
    screen_y >= camera.viewport_height - UI_AREA_HEIGHT
}

/// Translate a click into a move order for `player`.
pub fn handle_click(
    world: &mut World,
    map: &TileMap,
    tiles: &TileSet,
    camera: &Camera,
    player: Entity,
    screen_x: f64,
    screen_y: f64,
) -> ClickOutcome {
    if is_ui_area(camera, screen_y) {
        return ClickOutcome::UiArea;
    }

    let tile = map.world_to_grid(camera.screen_to_world(screen_x, screen_y));
    if !map.in_bounds(tile) {
        return ClickOutcome::OutOfBounds(tile);
    }

    match world.query_one_mut::<(&Position, &mut Mover)>(player) {
        Ok((pos, mover)) => ClickOutcome::Move {
            tile,
            outcome: movement::move_to_tile(map, tiles, *pos, mover, tile),
        },
        Err(_) => ClickOutcome::NoPlayer,
    }
}
