//! A* pathfinding over the tile grid.
//!
//! 8-directional movement with a Euclidean heuristic. Step cost is the base
//! cost (1 cardinal, 1.414 diagonal) divided by the destination tile's walk
//! speed, so faster terrain is preferred. No ECS dependency.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tileworld_core::constants::{DIAGONAL_COST, MAX_SEARCH_ITERATIONS};
use tileworld_core::types::{Path, TileCoord};
use tileworld_terrain::{find_nearest_walkable, TileMap, TileSet};

/// Neighbour offsets: cardinals first, then diagonals.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest f first,
/// breaking ties on the lowest h.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f64,
    h: f64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// Find a walkable path between two tiles.
///
/// Returns `None` when either endpoint is outside the map or no path exists.
/// Non-walkable endpoints are replaced by their nearest walkable tile. The
/// path includes both endpoints; equal endpoints give a one-tile path.
pub fn find_path(map: &TileMap, tiles: &TileSet, start: TileCoord, end: TileCoord) -> Option<Path> {
    find_path_with_limit(map, tiles, start, end, MAX_SEARCH_ITERATIONS)
}

/// `find_path` with an explicit cap on node expansions.
pub fn find_path_with_limit(
    map: &TileMap,
    tiles: &TileSet,
    start: TileCoord,
    end: TileCoord,
    max_iterations: usize,
) -> Option<Path> {
    if !map.in_bounds(start) || !map.in_bounds(end) {
        return None;
    }

    let start = find_nearest_walkable(map, tiles, start);
    let end = find_nearest_walkable(map, tiles, end);

    if start == end {
        return Some(vec![end]);
    }

    let width = map.width() as usize;
    let cell_count = width * map.height() as usize;
    let index_of = |t: TileCoord| (t.y as usize) * width + t.x as usize;
    let coord_of = |i: usize| TileCoord::new((i % width) as i32, (i / width) as i32);

    let mut g_cost = vec![f64::INFINITY; cell_count];
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();

    let start_index = index_of(start);
    let start_h = heuristic(start, end);
    g_cost[start_index] = 0.0;
    open.push(OpenNode {
        f: start_h,
        h: start_h,
        index: start_index,
    });

    let mut iterations = 0;
    while let Some(node) = open.pop() {
        // Superseded by a cheaper entry pushed later.
        if closed[node.index] {
            continue;
        }
        if iterations >= max_iterations {
            return None;
        }
        iterations += 1;
        closed[node.index] = true;

        let current = coord_of(node.index);
        if current == end {
            return Some(reconstruct_path(&parent, node.index, coord_of));
        }

        for (dx, dy) in DIRECTIONS {
            let neighbor = current.offset(dx, dy);
            if !map.in_bounds(neighbor) {
                continue;
            }
            let n_index = index_of(neighbor);
            if closed[n_index] {
                continue;
            }
            let def = tiles.get(map.get_tile(neighbor));
            if !def.walkable {
                continue;
            }

            let base_cost = if dx != 0 && dy != 0 { DIAGONAL_COST } else { 1.0 };
            let tentative = g_cost[node.index] + base_cost / def.walk_speed;
            if tentative < g_cost[n_index] {
                g_cost[n_index] = tentative;
                parent[n_index] = Some(node.index);
                let h = heuristic(neighbor, end);
                open.push(OpenNode {
                    f: tentative + h,
                    h,
                    index: n_index,
                });
            }
        }
    }

    None
}

/// Euclidean distance between tiles.
fn heuristic(a: TileCoord, b: TileCoord) -> f64 {
    a.distance_to(&b)
}

fn reconstruct_path(
    parent: &[Option<usize>],
    goal: usize,
    coord_of: impl Fn(usize) -> TileCoord,
) -> Path {
    let mut path = vec![coord_of(goal)];
    let mut current = goal;
    while let Some(p) = parent[current] {
        path.push(coord_of(p));
        current = p;
    }
    path.reverse();
    path
}

/// Tile at `step`, or None once the path is exhausted.
pub fn next_path_step(path: &[TileCoord], step: usize) -> Option<TileCoord> {
    path.get(step).copied()
}

pub fn is_path_complete(path: &[TileCoord], step: usize) -> bool {
    step >= path.len()
}
