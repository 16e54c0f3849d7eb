//! Camera that follows the player and culls the map to the viewport.

use hecs::World;

use tileworld_core::components::{Mover, Player};
use tileworld_core::state::{CameraView, TileRange};
use tileworld_core::types::{Position, Size};
use tileworld_terrain::TileMap;

/// Whether a viewport size can be followed and culled.
pub fn valid_viewport(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

/// World-space offset of the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Camera {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Centre the viewport on a box, then clamp to the map.
    ///
    /// The lower bound is applied first, so a map smaller than the viewport
    /// ends up with a negative offset.
    pub fn follow(&mut self, pos: Position, size: Size, map: &TileMap) {
        let mut x = pos.x - self.viewport_width / 2.0 + size.width / 2.0;
        let mut y = pos.y - self.viewport_height / 2.0 + size.height / 2.0;

        let max_x = map.world_width() - self.viewport_width;
        let max_y = map.world_height() - self.viewport_height;
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

        self.x = x;
        self.y = y;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> Position {
        Position::new(screen_x + self.x, screen_y + self.y)
    }

    /// Tiles that need drawing for this camera.
    pub fn visible_tiles(&self, map: &TileMap) -> TileRange {
        map.visible_range(self.x, self.y, self.viewport_width, self.viewport_height)
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            x: self.x,
            y: self.y,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }
}

/// Point the camera at the player.
pub fn run(world: &World, camera: &mut Camera, map: &TileMap) {
    let player = world
        .query::<(&Player, &Position, &Mover)>()
        .iter()
        .next()
        .map(|(_, (_, pos, mover))| (*pos, mover.size));
    if let Some((pos, size)) = player {
        camera.follow(pos, size, map);
    }
}
