use crate::arena::Arena;
use crate::rng::Rng;
use crate::types::Cell;

/// Picks a spawn cell inside the border margin, at least `min_distance`
/// (Euclidean) from every previously placed spawn. After `max_attempts`
/// misses the spacing requirement is forfeited and any free margin cell is
/// accepted, so construction always succeeds even on saturated grids.
///
/// The margin shrinks to fit small grids, never past the grid center.
pub(super) fn pick_spawn_cell(
    arena: &Arena,
    placed: &[Cell],
    margin: i32,
    min_distance: f32,
    max_attempts: usize,
    rng: &mut Rng,
) -> Cell {
    let margin = margin.min((arena.grid_size() - 1) / 2).max(0);
    let lo = margin;
    let hi = arena.grid_size() - 1 - margin;

    for _ in 0..max_attempts {
        let cell = (rng.int(lo, hi), rng.int(lo, hi));
        if !arena.is_free(cell) {
            continue;
        }
        if placed
            .iter()
            .all(|other| euclidean(cell, *other) >= min_distance)
        {
            return cell;
        }
    }

    // Margin-only fallback, spacing no longer guaranteed.
    for _ in 0..max_attempts {
        let cell = (rng.int(lo, hi), rng.int(lo, hi));
        if arena.is_free(cell) {
            return cell;
        }
    }

    // Deterministic sweep over the margin box, then the whole grid.
    for y in lo..=hi {
        for x in lo..=hi {
            if arena.is_free((x, y)) {
                return (x, y);
            }
        }
    }
    for y in 0..arena.grid_size() {
        for x in 0..arena.grid_size() {
            if arena.is_free((x, y)) {
                return (x, y);
            }
        }
    }
    (lo, lo)
}

fn euclidean(a: Cell, b: Cell) -> f32 {
    let dx = (a.0 - b.0) as f32;
    let dy = (a.1 - b.1) as f32;
    (dx * dx + dy * dy).sqrt()
}
