use std::collections::HashSet;

use crate::types::Cell;

/// Spatial index for the arena: fixed bounds plus the permanent occupancy
/// set. Cells are only ever added; a dead agent's trail stays a hazard for
/// every survivor.
#[derive(Clone, Debug)]
pub struct Arena {
    grid_size: i32,
    occupied: HashSet<Cell>,
}

impl Arena {
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            occupied: HashSet::new(),
        }
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn in_bounds(&self, (x, y): Cell) -> bool {
        x >= 0 && x < self.grid_size && y >= 0 && y < self.grid_size
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_occupied(cell)
    }

    pub fn occupy(&mut self, cell: Cell) {
        self.occupied.insert(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open_on_both_axes() {
        let arena = Arena::new(10);
        assert!(arena.in_bounds((0, 0)));
        assert!(arena.in_bounds((9, 9)));
        assert!(!arena.in_bounds((-1, 0)));
        assert!(!arena.in_bounds((0, -1)));
        assert!(!arena.in_bounds((10, 0)));
        assert!(!arena.in_bounds((0, 10)));
    }

    #[test]
    fn occupancy_is_permanent() {
        let mut arena = Arena::new(10);
        assert!(arena.is_free((4, 4)));
        arena.occupy((4, 4));
        assert!(!arena.is_free((4, 4)));
        assert!(arena.is_occupied((4, 4)));
    }

    #[test]
    fn out_of_bounds_is_never_free() {
        let arena = Arena::new(10);
        assert!(!arena.is_free((10, 3)));
        assert!(!arena.is_free((3, -1)));
    }
}
