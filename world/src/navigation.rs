//! Weighted A* search used by goal-directed firefighters.

use std::{cmp::Reverse, collections::BinaryHeap};

use flashpoint_core::{CellCoord, TileKind};

use crate::grid::{Tile, TileGrid};

/// Cost of stepping onto open floor, street, or an open door.
pub const BASE_STEP_COST: u32 = 1;
/// Cost of stepping through a closed door, which has to be opened first.
pub const DOOR_STEP_COST: u32 = 2;
/// Cost of stepping onto a burning tile.
pub const FIRE_STEP_COST: u32 = 3;
/// Cost of breaking through a wall; kept high so doors win over walls.
pub const WALL_STEP_COST: u32 = 10;

/// Cost of entering the provided tile in its current state.
#[must_use]
pub fn step_cost(tile: &Tile) -> u32 {
    match tile.kind() {
        TileKind::Wall => WALL_STEP_COST,
        TileKind::Door => DOOR_STEP_COST,
        _ if tile.fire() => FIRE_STEP_COST,
        _ => BASE_STEP_COST,
    }
}

/// Sum of step costs along a path, excluding the starting tile.
///
/// Returns `None` when the path leaves the board or contains a non-adjacent hop.
#[must_use]
pub fn path_cost(grid: &TileGrid, path: &[CellCoord]) -> Option<u32> {
    let mut total = 0u32;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if !from.is_adjacent(to) {
            return None;
        }
        total = total.checked_add(step_cost(grid.tile_at(to)?))?;
    }
    Some(total)
}

/// Finds the cheapest path from `start` to `goal`, both inclusive.
///
/// The frontier is ordered by `cost + manhattan(goal)`; equal priorities pop in
/// discovery order. Returns `None` when either endpoint is off the board or the
/// goal cannot be reached.
#[must_use]
pub fn find_path(grid: &TileGrid, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
    if !grid.contains(start) || !grid.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let width = usize::try_from(grid.width()).ok()?;
    let height = usize::try_from(grid.height()).ok()?;
    let node_count = width.checked_mul(height)?;

    let mut best_cost = vec![u32::MAX; node_count];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; node_count];
    let mut frontier = BinaryHeap::new();
    let mut discovered: u64 = 0;

    best_cost[index(width, start)?] = 0;
    frontier.push(Reverse((start.manhattan_distance(goal), discovered, 0u32, start)));

    while let Some(Reverse((_, _, cost, cell))) = frontier.pop() {
        if cell == goal {
            break;
        }
        if cost > best_cost[index(width, cell)?] {
            continue;
        }

        for neighbor in grid.neighbors4(cell) {
            let Some(tile) = grid.tile_at(neighbor) else {
                continue;
            };
            let next_cost = cost.saturating_add(step_cost(tile));
            let slot = index(width, neighbor)?;
            if next_cost >= best_cost[slot] {
                continue;
            }

            best_cost[slot] = next_cost;
            came_from[slot] = Some(cell);
            discovered += 1;
            let priority = next_cost.saturating_add(neighbor.manhattan_distance(goal));
            frontier.push(Reverse((priority, discovered, next_cost, neighbor)));
        }
    }

    if best_cost[index(width, goal)?] == u32::MAX {
        return None;
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        cursor = came_from[index(width, cursor)?]?;
        path.push(cursor);
    }
    path.reverse();
    Some(path)
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
