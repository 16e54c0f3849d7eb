//! Procedural terrain: lakes, rivers, coastline, ponds and dirt paths.
//!
//! Feature coordinates are laid out for the default 200x200 map. Every write
//! is bounds-checked, so smaller or larger maps simply clip them.

use std::f64::consts::PI;

use tracing::debug;

use tileworld_core::enums::TileType;
use tileworld_core::types::TileCoord;

use crate::error::TerrainError;
use crate::grid::TileMap;

struct Lake {
    center: (i32, i32),
    radius: (f64, f64),
    irregularity: f64,
}

const LAKES: [Lake; 5] = [
    Lake { center: (40, 30), radius: (18.0, 12.0), irregularity: 0.3 },
    Lake { center: (160, 45), radius: (22.0, 20.0), irregularity: 0.4 },
    Lake { center: (80, 120), radius: (15.0, 25.0), irregularity: 0.5 },
    Lake { center: (140, 160), radius: (20.0, 15.0), irregularity: 0.3 },
    Lake { center: (25, 170), radius: (12.0, 18.0), irregularity: 0.4 },
];

/// (start, end, half-width) of each river.
const RIVERS: [((i32, i32), (i32, i32), i32); 3] = [
    ((40, 30), (80, 120), 3),
    ((80, 120), (140, 160), 2),
    ((160, 45), (140, 160), 2),
];

/// (x, y, radius) of each pond.
const PONDS: [(i32, i32, i32); 7] = [
    (120, 80, 4),
    (180, 120, 3),
    (50, 90, 5),
    (170, 30, 3),
    (30, 140, 4),
    (110, 40, 3),
    (190, 180, 4),
];

impl TileMap {
    /// Create a map and fill it with the procedural terrain.
    pub fn generated(width: i32, height: i32, tile_size: f64) -> Result<Self, TerrainError> {
        let mut map = TileMap::new(width, height, tile_size)?;
        generate_terrain(&mut map);
        Ok(map)
    }
}

/// Overwrite the whole map with generated terrain.
pub fn generate_terrain(map: &mut TileMap) {
    for y in 0..map.height() {
        for x in 0..map.width() {
            map.set_tile(TileCoord::new(x, y), TileType::Grass);
        }
    }

    for lake in &LAKES {
        add_lake(map, lake);
    }
    for (start, end, width) in RIVERS {
        add_river(map, start, end, width);
    }
    add_coastal_areas(map);
    add_ponds(map);
    add_dirt_paths(map);

    debug!(
        width = map.width(),
        height = map.height(),
        water = map.count(TileType::Water),
        dirt = map.count(TileType::DirtPath),
        "generated terrain"
    );
}

/// Elliptical lake with a shoreline perturbed by angular noise.
fn add_lake(map: &mut TileMap, lake: &Lake) {
    for y in 0..map.height() {
        for x in 0..map.width() {
            let dx = f64::from(x - lake.center.0);
            let dy = f64::from(y - lake.center.1);

            let angle = dy.atan2(dx);
            let noise = (angle * 6.0).sin() * lake.irregularity
                + (angle * 4.0 + 2.5).sin() * lake.irregularity * 0.5;

            let dist_x = dx / (lake.radius.0 + noise);
            let dist_y = dy / (lake.radius.1 + noise * 0.7);
            if (dist_x * dist_x + dist_y * dist_y).sqrt() < 1.0 {
                map.set_tile(TileCoord::new(x, y), TileType::Water);
            }
        }
    }
}

/// Sine-curved river drawn with a disc brush.
fn add_river(map: &mut TileMap, start: (i32, i32), end: (i32, i32), width: i32) {
    let steps = line_steps(start, end);
    if steps == 0 {
        return;
    }

    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let curve = (t * PI * 2.0).sin() * 8.0;
        let x = lerp(start.0, end.0, t, curve) as i32;
        let y = lerp(start.1, end.1, t, 0.0) as i32;
        stamp_disc(map, TileCoord::new(x, y), width, |_| true, TileType::Water);
    }
}

/// Partial coastline along the left and bottom edges.
fn add_coastal_areas(map: &mut TileMap) {
    for y in 60..140 {
        let depth = (6.0 + 4.0 * (f64::from(y) * 0.1).sin()) as i32;
        for x in 0..depth {
            map.set_tile(TileCoord::new(x, y), TileType::Water);
        }
    }

    for x in 20..80 {
        let depth = (4.0 + 3.0 * (f64::from(x) * 0.15).sin()) as i32;
        for y in (map.height() - depth).max(0)..map.height() {
            map.set_tile(TileCoord::new(x, y), TileType::Water);
        }
    }
}

/// Small round ponds with ragged rims.
fn add_ponds(map: &mut TileMap) {
    for (px, py, radius) in PONDS {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d2 = dx * dx + dy * dy;
                if d2 > radius * radius {
                    continue;
                }
                let (x, y) = (px + dx, py + dy);
                if d2 <= (radius - 1) * (radius - 1) || (x + y) % 3 == 0 {
                    map.set_tile(TileCoord::new(x, y), TileType::Water);
                }
            }
        }
    }
}

/// Three continuous winding dirt paths: across, down, and corner to corner.
fn add_dirt_paths(map: &mut TileMap) {
    let (w, h) = (map.width(), map.height());
    add_snaking_path(map, (10, h / 2), (w - 10, h / 2));
    add_snaking_path(map, (w / 2, 10), (w / 2, h - 10));
    add_snaking_path(map, (20, 20), (w - 20, h - 20));
}

/// Path that weaves perpendicular to the straight line between two points.
/// Only grass is turned into dirt.
fn add_snaking_path(map: &mut TileMap, start: (i32, i32), end: (i32, i32)) {
    let dx = f64::from(end.0 - start.0);
    let dy = f64::from(end.1 - start.1);
    let total = (dx * dx + dy * dy).sqrt();
    if total == 0.0 {
        return;
    }

    // One tile per step keeps the path gap-free.
    let steps = (total as i32).max(1);
    let (perp_x, perp_y) = (-dy / total, dx / total);
    let amplitude = 8.0;

    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let offset = (t * PI * 3.0).sin() * amplitude + (t * PI * 7.0).sin() * amplitude * 0.3;

        let x = lerp(start.0, end.0, t, perp_x * offset).round() as i32;
        let y = lerp(start.1, end.1, t, perp_y * offset).round() as i32;
        let center = TileCoord::new(x, y);

        // The tile itself plus its 4-neighbourhood.
        stamp_disc(map, center, 1, |t| t == TileType::Grass, TileType::DirtPath);
    }
}

fn line_steps(start: (i32, i32), end: (i32, i32)) -> i32 {
    let dx = f64::from(end.0 - start.0);
    let dy = f64::from(end.1 - start.1);
    (dx * dx + dy * dy).sqrt() as i32
}

fn lerp(a: i32, b: i32, t: f64, offset: f64) -> f64 {
    f64::from(a) * (1.0 - t) + f64::from(b) * t + offset
}

/// Set every tile within `radius` (Euclidean) of `center` for which
/// `replace` holds.
fn stamp_disc(
    map: &mut TileMap,
    center: TileCoord,
    radius: i32,
    replace: impl Fn(TileType) -> bool,
    tile_type: TileType,
) {
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let tile = center.offset(dx, dy);
            if map.in_bounds(tile) && replace(map.get_tile(tile)) {
                map.set_tile(tile, tile_type);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::constants::{MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};

    fn default_map() -> TileMap {
        TileMap::generated(MAP_WIDTH, MAP_HEIGHT, TILE_SIZE).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(default_map(), default_map());
    }

    #[test]
    fn test_lake_centers_are_water() {
        let map = default_map();
        for lake in &LAKES {
            let c = TileCoord::new(lake.center.0, lake.center.1);
            assert_eq!(map.get_tile(c), TileType::Water, "Lake at {c}");
        }
    }

    #[test]
    fn test_pond_centers_are_water() {
        let map = default_map();
        for (x, y, _) in PONDS {
            assert_eq!(map.get_tile(TileCoord::new(x, y)), TileType::Water);
        }
    }

    #[test]
    fn test_coast_and_dirt_present() {
        let map = default_map();
        // Left coast covers column 0 between rows 60 and 139.
        assert_eq!(map.get_tile(TileCoord::new(0, 100)), TileType::Water);
        assert_eq!(map.get_tile(TileCoord::new(0, 10)), TileType::Grass);
        // Bottom coast.
        assert_eq!(map.get_tile(TileCoord::new(50, MAP_HEIGHT - 1)), TileType::Water);

        assert!(map.count(TileType::DirtPath) > 300, "Three long paths expected");
        assert!(map.count(TileType::Grass) > map.count(TileType::Water));
    }

    #[test]
    fn test_paths_start_on_dirt() {
        let map = default_map();
        // Offsets are zero at t = 0, so each path starts exactly at its start point.
        assert_eq!(map.get_tile(TileCoord::new(10, 100)), TileType::DirtPath);
        assert_eq!(map.get_tile(TileCoord::new(100, 10)), TileType::DirtPath);
        assert_eq!(map.get_tile(TileCoord::new(20, 20)), TileType::DirtPath);
    }

    #[test]
    fn test_map_center_walkable() {
        let map = default_map();
        assert_ne!(map.get_tile(map.center_tile()), TileType::Water);
    }

    #[test]
    fn test_small_map_does_not_panic() {
        let map = TileMap::generated(12, 7, 16.0).unwrap();
        assert_eq!(map.tiles().len(), 84);
    }
}
