//! Nearest walkable tile search.

use tileworld_core::constants::NEAREST_WALKABLE_RADIUS;
use tileworld_core::types::TileCoord;

use crate::grid::TileMap;
use crate::tiles::TileSet;

/// The walkable tile closest to `target` in Manhattan rings.
///
/// Returns `target` itself when walkable. Rings of radius 1 to
/// `NEAREST_WALKABLE_RADIUS` are scanned with `dx` then `dy` ascending; when
/// nothing walkable is found the map centre is returned.
pub fn find_nearest_walkable(map: &TileMap, tiles: &TileSet, target: TileCoord) -> TileCoord {
    if map.is_walkable(target, tiles) {
        return target;
    }

    for radius in 1..=NEAREST_WALKABLE_RADIUS {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() + dy.abs() != radius {
                    continue;
                }
                let candidate = target.offset(dx, dy);
                if map.in_bounds(candidate) && map.is_walkable(candidate, tiles) {
                    return candidate;
                }
            }
        }
    }

    map.center_tile()
}
