pub const MIN_PLAYER_COUNT: usize = 2;
pub const MAX_PLAYER_COUNT: usize = 8;

pub const SPAWN_MARGIN: i32 = 3;
pub const SPAWN_MIN_DISTANCE: f32 = 6.0;
pub const SPAWN_MAX_ATTEMPTS: usize = 64;

/// Flood-fill truncation bound. Strategies only need a relative ranking of
/// candidate moves, so undercounting large open regions is acceptable.
pub const DEFAULT_SEARCH_CAPACITY: usize = 200;

pub const HUMAN_NAME: &str = "human";
pub const HUMAN_COLOR: &str = "#FF0000";

pub fn get_grid_size_by_player_count(player_count: usize) -> i32 {
    match player_count {
        2 => 22,
        3 => 25,
        4 => 27,
        5 => 30,
        6 => 33,
        7 => 36,
        8 => 40,
        _ => 50,
    }
}
