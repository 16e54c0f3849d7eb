//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz), one tick per animation frame.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Map ---

/// Edge length of a tile in world pixels.
pub const TILE_SIZE: f64 = 32.0;

/// Default map width in tiles.
pub const MAP_WIDTH: i32 = 200;

/// Default map height in tiles.
pub const MAP_HEIGHT: i32 = 200;

// --- Player ---

/// Player bounding box edge (pixels).
pub const PLAYER_SIZE: f64 = 20.0;

/// Player base speed (pixels per tick).
pub const PLAYER_MOVE_SPEED: f64 = 3.0;

// --- Units ---

/// Unit bounding box edge (pixels).
pub const UNIT_SIZE: f64 = 16.0;

/// Unit base speed (pixels per tick).
pub const UNIT_MOVE_SPEED: f64 = 2.0;

/// Most alive units allowed when spawning at random.
pub const MAX_UNITS: usize = 10;

/// Fewest alive units that must remain after removing the newest.
pub const MIN_UNITS: usize = 1;

/// Random positions tried before a spawn gives up.
pub const SPAWN_ATTEMPTS: u32 = 50;

// --- Movement ---

/// Distance at which a mover counts as having reached its target.
pub const ARRIVAL_THRESHOLD: f64 = 0.5;

/// Distance under which a mover snaps onto its target.
pub const SNAP_DISTANCE: f64 = 0.1;

// --- Pathfinding ---

/// Base cost of a diagonal step.
pub const DIAGONAL_COST: f64 = 1.414;

/// Node expansions before the search gives up.
pub const MAX_SEARCH_ITERATIONS: usize = 50_000;

/// Largest ring searched for a walkable substitute tile.
pub const NEAREST_WALKABLE_RADIUS: i32 = 20;

// --- Viewport ---

/// Default canvas width (pixels).
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;

/// Default canvas height (pixels).
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Height of the button strip at the bottom of the canvas that swallows clicks.
pub const UI_AREA_HEIGHT: f64 = 60.0;
