//! .tmap binary format loader and writer.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                  |
//! |--------|------|------------------------|
//! | 0      | 4    | magic `TMAP`           |
//! | 4      | 2    | version                |
//! | 6      | 2    | flags (reserved, 0)    |
//! | 8      | 4    | width in tiles         |
//! | 12     | 4    | height in tiles        |
//! | 16     | 8    | tile size (f64 pixels) |
//! | 24     | 8    | reserved               |
//! | 32     | w*h  | tile codes, row-major  |

use std::io;
use std::path::Path;

use tracing::debug;

use tileworld_core::enums::TileType;

use crate::grid::TileMap;

/// .tmap magic bytes.
const TMAP_MAGIC: [u8; 4] = *b"TMAP";

/// Current format version.
const TMAP_VERSION: u16 = 1;

/// Total header size in bytes.
const HEADER_SIZE: usize = 32;

/// Load a TileMap from a .tmap file.
pub fn load_tmap(path: &Path) -> io::Result<TileMap> {
    let data = std::fs::read(path)?;
    let map = parse_tmap(&data)?;
    debug!(path = %path.display(), width = map.width(), height = map.height(), "loaded map");
    Ok(map)
}

/// Parse a .tmap from a byte buffer.
pub fn parse_tmap(data: &[u8]) -> io::Result<TileMap> {
    if data.len() < HEADER_SIZE {
        return Err(invalid("File too small for .tmap header"));
    }

    if data[0..4] != TMAP_MAGIC {
        return Err(invalid("Invalid .tmap magic bytes"));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != TMAP_VERSION {
        return Err(invalid(format!("Unsupported .tmap version: {version}")));
    }

    // Bytes 6..8 are flags, currently unused.
    let width = read_u32(data, 8);
    let height = read_u32(data, 12);
    let tile_size = f64::from_le_bytes([
        data[16], data[17], data[18], data[19], data[20], data[21], data[22], data[23],
    ]);
    // Bytes 24..32 are reserved

    let cell_count = (width as usize) * (height as usize);
    let end = HEADER_SIZE + cell_count;
    if data.len() < end {
        return Err(invalid("File too small for tile data"));
    }

    let tiles = data[HEADER_SIZE..end]
        .iter()
        .map(|&code| {
            TileType::from_code(code).ok_or_else(|| invalid(format!("Unknown tile code: {code}")))
        })
        .collect::<io::Result<Vec<_>>>()?;

    let width = i32::try_from(width).map_err(|_| invalid("Map width out of range"))?;
    let height = i32::try_from(height).map_err(|_| invalid("Map height out of range"))?;
    TileMap::from_tiles(width, height, tile_size, tiles).map_err(|e| invalid(e.to_string()))
}

/// Write a TileMap to a .tmap file.
pub fn write_tmap(map: &TileMap, path: &Path) -> io::Result<()> {
    std::fs::write(path, serialize_tmap(map))
}

/// Serialize a TileMap to .tmap bytes.
pub fn serialize_tmap(map: &TileMap) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + map.tiles().len());

    // Header (32 bytes)
    buf.extend_from_slice(&TMAP_MAGIC);
    buf.extend_from_slice(&TMAP_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&(map.width() as u32).to_le_bytes());
    buf.extend_from_slice(&(map.height() as u32).to_le_bytes());
    buf.extend_from_slice(&map.tile_size().to_le_bytes());
    buf.resize(HEADER_SIZE, 0);

    buf.extend(map.tiles().iter().map(|t| t.code()));
    buf
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> TileMap {
        TileMap::from_ascii(&["..~=", "~~..", "=..."], 24.0).unwrap()
    }

    #[test]
    fn test_tmap_roundtrip() {
        let map = sample_map();
        let bytes = serialize_tmap(&map);
        assert_eq!(bytes.len(), HEADER_SIZE + 12);
        assert_eq!(&bytes[0..4], b"TMAP");

        let map2 = parse_tmap(&bytes).expect("Failed to parse .tmap");
        assert_eq!(map2, map);
        assert_eq!(map2.tile_size(), 24.0);
    }

    #[test]
    fn test_tmap_invalid_magic() {
        let data = vec![0u8; 64];
        let err = parse_tmap(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_tmap_truncated() {
        let bytes = serialize_tmap(&sample_map());
        assert!(parse_tmap(&bytes[..10]).is_err(), "Short header");
        assert!(parse_tmap(&bytes[..bytes.len() - 1]).is_err(), "Short tile data");
    }

    #[test]
    fn test_tmap_bad_version_and_code() {
        let mut bytes = serialize_tmap(&sample_map());
        bytes[4] = 9;
        assert!(parse_tmap(&bytes).is_err());

        let mut bytes = serialize_tmap(&sample_map());
        bytes[HEADER_SIZE] = 7;
        let err = parse_tmap(&bytes).unwrap_err();
        assert!(err.to_string().contains("Unknown tile code"));
    }

    #[test]
    fn test_tmap_zero_size_rejected() {
        let mut bytes = serialize_tmap(&sample_map());
        bytes[8..12].copy_from_slice(&0u32.to_le_bytes());
        assert!(parse_tmap(&bytes).is_err());
    }
}
