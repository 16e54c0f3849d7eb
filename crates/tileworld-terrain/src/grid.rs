//! TileMap: fixed-size grid of terrain tiles with world/grid conversion.

use serde::{Deserialize, Serialize};

use tileworld_core::enums::TileType;
use tileworld_core::state::TileRange;
use tileworld_core::types::{Position, TileCoord};

use crate::error::TerrainError;
use crate::tiles::TileSet;

/// Grid of tiles, row-major (top-to-bottom, left-to-right).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    /// Edge length of one tile in world pixels.
    tile_size: f64,
    tiles: Vec<TileType>,
}

impl TileMap {
    /// Create an all-grass map.
    pub fn new(width: i32, height: i32, tile_size: f64) -> Result<Self, TerrainError> {
        check_dimensions(width, height, tile_size)?;
        Ok(Self {
            width,
            height,
            tile_size,
            tiles: vec![TileType::Grass; (width as usize) * (height as usize)],
        })
    }

    /// Create a map from pre-loaded row-major tiles.
    pub fn from_tiles(
        width: i32,
        height: i32,
        tile_size: f64,
        tiles: Vec<TileType>,
    ) -> Result<Self, TerrainError> {
        check_dimensions(width, height, tile_size)?;
        let expected = (width as usize) * (height as usize);
        if tiles.len() != expected {
            return Err(TerrainError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// Parse a map drawn with glyphs: `.` grass, `~` water, `=` dirt path.
    /// All rows must have the same length.
    pub fn from_ascii(rows: &[&str], tile_size: f64) -> Result<Self, TerrainError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut tiles = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for row in rows {
            for c in row.chars() {
                tiles.push(tile_from_glyph(c).ok_or(TerrainError::UnknownGlyph(c))?);
            }
        }
        Self::from_tiles(width, height, tile_size, tiles)
    }

    /// Render the map back to glyph rows.
    pub fn to_ascii(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| tile_glyph(*t)).collect())
            .collect()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Raw row-major tile storage.
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Map width in world pixels.
    pub fn world_width(&self) -> f64 {
        f64::from(self.width) * self.tile_size
    }

    /// Map height in world pixels.
    pub fn world_height(&self) -> f64 {
        f64::from(self.height) * self.tile_size
    }

    pub fn center_tile(&self) -> TileCoord {
        TileCoord::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| (tile.y as usize) * (self.width as usize) + tile.x as usize)
    }

    /// Tile at grid coordinates. Out of bounds is water.
    pub fn get_tile(&self, tile: TileCoord) -> TileType {
        self.index(tile)
            .map_or(TileType::Water, |i| self.tiles[i])
    }

    /// Set the tile at grid coordinates. Out of bounds is ignored.
    pub fn set_tile(&mut self, tile: TileCoord, tile_type: TileType) {
        if let Some(i) = self.index(tile) {
            self.tiles[i] = tile_type;
        }
    }

    pub fn is_walkable(&self, tile: TileCoord, tiles: &TileSet) -> bool {
        tiles.is_walkable(self.get_tile(tile))
    }

    /// Tile containing a world position.
    pub fn world_to_grid(&self, pos: Position) -> TileCoord {
        TileCoord::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    /// World position of the centre of a tile.
    pub fn grid_to_world(&self, tile: TileCoord) -> Position {
        Position::new(
            f64::from(tile.x) * self.tile_size + self.tile_size / 2.0,
            f64::from(tile.y) * self.tile_size + self.tile_size / 2.0,
        )
    }

    /// Tiles overlapping a viewport whose top-left corner is at the camera.
    pub fn visible_range(
        &self,
        camera_x: f64,
        camera_y: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> TileRange {
        let ts = self.tile_size;
        let start_x = (camera_x / ts).floor().max(0.0) as i32;
        let start_y = (camera_y / ts).floor().max(0.0) as i32;
        let end_x = ((camera_x + viewport_width) / ts)
            .ceil()
            .min(f64::from(self.width - 1)) as i32;
        let end_y = ((camera_y + viewport_height) / ts)
            .ceil()
            .min(f64::from(self.height - 1)) as i32;
        TileRange {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Number of tiles of a given type.
    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile_type).count()
    }
}

/// Check map dimensions without allocating a grid.
pub fn check_dimensions(width: i32, height: i32, tile_size: f64) -> Result<(), TerrainError> {
    if width <= 0 || height <= 0 {
        return Err(TerrainError::InvalidDimensions { width, height });
    }
    if !(tile_size.is_finite() && tile_size > 0.0) {
        return Err(TerrainError::InvalidTileSize(tile_size));
    }
    Ok(())
}

/// Preview glyph of a tile type.
pub fn tile_glyph(tile: TileType) -> char {
    match tile {
        TileType::Grass => '.',
        TileType::Water => '~',
        TileType::DirtPath => '=',
    }
}

fn tile_from_glyph(c: char) -> Option<TileType> {
    match c {
        '.' => Some(TileType::Grass),
        '~' => Some(TileType::Water),
        '=' => Some(TileType::DirtPath),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_map() -> TileMap {
        TileMap::from_ascii(
            &[
                ".....", //
                ".~~..", //
                ".~~==", //
                ".....", //
            ],
            32.0,
        )
        .unwrap()
    }

    #[test]
    fn test_new_map_is_grass() {
        let map = TileMap::new(10, 8, 32.0).unwrap();
        assert_eq!(map.tiles().len(), 80);
        assert_eq!(map.count(TileType::Grass), 80);
        assert_eq!(map.world_width(), 320.0);
        assert_eq!(map.world_height(), 256.0);
        assert_eq!(map.center_tile(), TileCoord::new(5, 4));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            TileMap::new(0, 5, 32.0),
            Err(TerrainError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(TileMap::new(5, 5, 0.0).is_err());
        assert!(TileMap::from_tiles(2, 2, 32.0, vec![TileType::Grass; 3]).is_err());
        assert_eq!(
            TileMap::from_ascii(&["..x"], 32.0),
            Err(TerrainError::UnknownGlyph('x'))
        );
    }

    #[test]
    fn test_get_tile_out_of_bounds_is_water() {
        let map = make_test_map();
        assert_eq!(map.get_tile(TileCoord::new(0, 0)), TileType::Grass);
        assert_eq!(map.get_tile(TileCoord::new(1, 1)), TileType::Water);
        assert_eq!(map.get_tile(TileCoord::new(4, 2)), TileType::DirtPath);
        assert_eq!(map.get_tile(TileCoord::new(-1, 0)), TileType::Water);
        assert_eq!(map.get_tile(TileCoord::new(0, 4)), TileType::Water);
        assert_eq!(map.get_tile(TileCoord::new(5, 0)), TileType::Water);
    }

    #[test]
    fn test_set_tile_out_of_bounds_ignored() {
        let mut map = make_test_map();
        let before = map.clone();
        map.set_tile(TileCoord::new(-1, -1), TileType::DirtPath);
        map.set_tile(TileCoord::new(5, 0), TileType::DirtPath);
        assert_eq!(map, before);

        map.set_tile(TileCoord::new(0, 0), TileType::Water);
        assert_eq!(map.get_tile(TileCoord::new(0, 0)), TileType::Water);
    }

    #[test]
    fn test_world_grid_conversion() {
        let map = make_test_map();
        assert_eq!(map.world_to_grid(Position::new(0.0, 0.0)), TileCoord::new(0, 0));
        assert_eq!(map.world_to_grid(Position::new(31.9, 32.0)), TileCoord::new(0, 1));
        assert_eq!(map.world_to_grid(Position::new(-0.5, 10.0)), TileCoord::new(-1, 0));
        assert_eq!(map.grid_to_world(TileCoord::new(2, 1)), Position::new(80.0, 48.0));

        // Centre of a tile maps back to the tile.
        let t = TileCoord::new(3, 2);
        assert_eq!(map.world_to_grid(map.grid_to_world(t)), t);
    }

    #[test]
    fn test_walkability() {
        let map = make_test_map();
        let tiles = TileSet::default();
        assert!(map.is_walkable(TileCoord::new(0, 0), &tiles));
        assert!(!map.is_walkable(TileCoord::new(2, 2), &tiles));
        assert!(map.is_walkable(TileCoord::new(3, 2), &tiles));
        assert!(!map.is_walkable(TileCoord::new(-1, 0), &tiles));
    }

    #[test]
    fn test_visible_range_clamped() {
        let map = TileMap::new(200, 200, 32.0).unwrap();

        let range = map.visible_range(0.0, 0.0, 800.0, 600.0);
        assert_eq!(range.start_x, 0);
        assert_eq!(range.start_y, 0);
        assert_eq!(range.end_x, 25);
        assert_eq!(range.end_y, 19); // ceil(600 / 32) = 19

        let range = map.visible_range(100.0, 40.0, 800.0, 600.0);
        assert_eq!(range.start_x, 3);
        assert_eq!(range.start_y, 1);
        assert_eq!(range.end_x, 29); // ceil(900 / 32) = 29

        // Bottom-right corner clamps to the last tile.
        let range = map.visible_range(6400.0 - 800.0, 6400.0 - 600.0, 800.0, 600.0);
        assert_eq!(range.end_x, 199);
        assert_eq!(range.end_y, 199);

        // Negative camera clamps to 0.
        let range = map.visible_range(-50.0, -50.0, 100.0, 100.0);
        assert_eq!((range.start_x, range.start_y), (0, 0));
    }

    #[test]
    fn test_visible_range_empty_outside_map() {
        let map = TileMap::new(10, 10, 32.0).unwrap();
        let range = map.visible_range(1000.0, 0.0, 100.0, 100.0);
        assert!(range.is_empty());
    }

    #[test]
    fn test_ascii_roundtrip() {
        let map = make_test_map();
        assert_eq!(map.to_ascii(), vec![".....", ".~~..", ".~~==", "....."]);
    }
}
