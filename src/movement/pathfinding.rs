//! A* pathfinding over a zone's cost matrix
//!
//! Goals are ranges rather than tiles: the search stops at the first tile
//! within `range` of the target. Blocking structures and natural walls are
//! impassable; roads are cheaper than plain tiles, swamps dearer.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::core::types::Tile;
use crate::world::terrain::TileGrid;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    tile: Tile,
    f_cost: u32, // g_cost + heuristic
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; tile order keeps expansion deterministic
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.tile.cmp(&self.tile))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lower bound on the cost still needed to get within range
fn heuristic(tile: Tile, target: Tile, range: u32, min_step_cost: u32) -> u32 {
    tile.range_to(target).saturating_sub(range) * min_step_cost
}

/// Find the cheapest path from `start` to any tile within `range` of `target`
///
/// The returned steps exclude `start`; an empty path means `start` already
/// satisfies the range. Returns `None` when no tile in range is reachable
/// within `max_nodes` expansions.
pub fn find_path(
    costs: &TileGrid<Option<u32>>,
    start: Tile,
    target: Tile,
    range: u32,
    max_nodes: usize,
) -> Option<Vec<Tile>> {
    if start.range_to(target) <= range {
        return Some(Vec::new());
    }

    let min_step_cost = costs
        .tiles()
        .filter_map(|t| costs.get(t).copied().flatten())
        .min()?;

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Tile, Tile> = AHashMap::new();
    let mut g_scores: AHashMap<Tile, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        tile: start,
        f_cost: heuristic(start, target, range, min_step_cost),
    });

    let mut expanded = 0;
    while let Some(current) = open_set.pop() {
        if current.tile.range_to(target) <= range {
            return Some(reconstruct_path(&came_from, start, current.tile));
        }

        let current_g = g_scores.get(&current.tile).copied().unwrap_or(u32::MAX);
        // Stale heap entry for a tile already reached more cheaply
        if current.f_cost > current_g + heuristic(current.tile, target, range, min_step_cost) {
            continue;
        }

        expanded += 1;
        if expanded > max_nodes {
            return None;
        }

        for neighbor in current.tile.neighbors() {
            let Some(step_cost) = costs.get(neighbor).copied().flatten() else {
                continue;
            };

            let tentative_g = current_g + step_cost;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.tile);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    tile: neighbor,
                    f_cost: tentative_g + heuristic(neighbor, target, range, min_step_cost),
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map, excluding the start tile
fn reconstruct_path(came_from: &AHashMap<Tile, Tile>, start: Tile, mut current: Tile) -> Vec<Tile> {
    let mut path = Vec::new();
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(&prev) => current = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Total cost of walking a path
pub fn path_cost(costs: &TileGrid<Option<u32>>, path: &[Tile]) -> Option<u32> {
    path.iter().map(|t| costs.get(*t).copied().flatten()).sum()
}
