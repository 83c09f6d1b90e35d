use std::collections::{HashSet, VecDeque};

use crate::types::{Cell, ALL_DIRECTIONS};

/// Counts free cells reachable from `origin` over the 4-connected grid,
/// truncated at `capacity`. A blocked or out-of-bounds origin scores 0.
///
/// Only the visited-set size matters, so any expansion order returns the
/// same count; the returned value never exceeds `capacity`.
pub fn reachable_cells(
    origin: Cell,
    grid_size: i32,
    occupied: &HashSet<Cell>,
    capacity: usize,
) -> usize {
    if capacity == 0 || !is_open(origin, grid_size, occupied) {
        return 0;
    }

    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    let mut count = 0usize;

    while let Some(cell) = queue.pop_front() {
        count += 1;
        if count >= capacity {
            return capacity;
        }
        for dir in ALL_DIRECTIONS {
            let next = dir.offset(cell);
            if is_open(next, grid_size, occupied) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    count
}

fn is_open((x, y): Cell, grid_size: i32, occupied: &HashSet<Cell>) -> bool {
    x >= 0 && x < grid_size && y >= 0 && y < grid_size && !occupied.contains(&(x, y))
}
