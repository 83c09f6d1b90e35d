use std::fmt;

use crate::constants::{
    get_grid_size_by_player_count, HUMAN_COLOR, HUMAN_NAME, MAX_PLAYER_COUNT, MIN_PLAYER_COUNT,
};
use crate::engine::GameEngine;
use crate::rng::Rng;
use crate::strategy::{StrategyProfile, ROSTER};
use crate::types::{AgentConfig, Direction, Snapshot};

#[derive(Debug, PartialEq, Eq)]
pub enum CreateGameError {
    PlayerCountOutOfRange(usize),
    GridSizeNotPositive(i32),
    GridSizeTooSmall {
        grid_size: i32,
        player_count: usize,
    },
}

impl fmt::Display for CreateGameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerCountOutOfRange(count) => write!(
                f,
                "playerCount must be between {MIN_PLAYER_COUNT} and {MAX_PLAYER_COUNT}, got {count}"
            ),
            Self::GridSizeNotPositive(size) => {
                write!(f, "gridSize must be positive, got {size}")
            }
            Self::GridSizeTooSmall {
                grid_size,
                player_count,
            } => {
                write!(
                    f,
                    "gridSize {grid_size} cannot hold {player_count} players"
                )
            }
        }
    }
}

impl std::error::Error for CreateGameError {}

/// One running match: agent 0 is the human slot, the remaining slots are
/// filled from the bot roster without repeats. All randomness (spawns,
/// roster draw, bot tie-breaks) flows from the single seed.
pub struct GameSession {
    engine: GameEngine,
    strategies: Vec<Option<&'static StrategyProfile>>,
    rng: Rng,
}

impl GameSession {
    pub fn create(
        player_count: usize,
        grid_size: Option<i32>,
        seed: u32,
    ) -> Result<Self, CreateGameError> {
        if !(MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&player_count) {
            return Err(CreateGameError::PlayerCountOutOfRange(player_count));
        }
        if let Some(size) = grid_size {
            if size <= 0 {
                return Err(CreateGameError::GridSizeNotPositive(size));
            }
            if (size as i64) * (size as i64) < player_count as i64 {
                return Err(CreateGameError::GridSizeTooSmall {
                    grid_size: size,
                    player_count,
                });
            }
        }

        let mut rng = Rng::new(seed);
        let grid_size = grid_size.unwrap_or_else(|| get_grid_size_by_player_count(player_count));

        let bot_indices = rng.sample_indices(ROSTER.len(), player_count - 1);
        let mut configs = Vec::with_capacity(player_count);
        let mut strategies: Vec<Option<&'static StrategyProfile>> =
            Vec::with_capacity(player_count);
        configs.push(AgentConfig {
            name: HUMAN_NAME.to_string(),
            color: HUMAN_COLOR.to_string(),
        });
        strategies.push(None);
        for idx in bot_indices {
            let profile = &ROSTER[idx];
            configs.push(AgentConfig {
                name: profile.name.to_string(),
                color: profile.color.to_string(),
            });
            strategies.push(Some(profile));
        }

        let engine = GameEngine::new(grid_size, &configs, &mut rng);
        Ok(Self {
            engine,
            strategies,
            rng,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.build_snapshot()
    }

    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    /// Queues the human direction for the next tick. Ignored once the
    /// match is over.
    pub fn submit_human_move(&mut self, direction: Direction) {
        if self.engine.is_over() {
            return;
        }
        self.engine.submit_direction(0, direction);
    }

    /// Runs every bot's decision against the pre-tick snapshot, advances
    /// the engine one tick, and returns the resulting state. After the
    /// match ends this is a pure read.
    pub fn advance_tick(&mut self) -> Snapshot {
        if self.engine.is_over() {
            return self.engine.build_snapshot();
        }

        let before = self.engine.build_snapshot();
        for agent_id in 0..self.strategies.len() {
            let Some(profile) = self.strategies[agent_id] else {
                continue;
            };
            if let Some(direction) = profile.decide(&before, agent_id, &mut self.rng) {
                self.engine.submit_direction(agent_id, direction);
            }
        }

        self.engine.tick();
        self.engine.build_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Winner;
    use std::collections::HashSet;

    #[test]
    fn rejects_player_counts_outside_the_supported_range() {
        for count in [0, 1, 9, 50] {
            assert_eq!(
                GameSession::create(count, None, 1).err(),
                Some(CreateGameError::PlayerCountOutOfRange(count))
            );
        }
        for count in [2, 8] {
            assert!(GameSession::create(count, None, 1).is_ok());
        }
    }

    #[test]
    fn rejects_non_positive_grid_size_overrides() {
        for size in [0, -1, -40] {
            assert_eq!(
                GameSession::create(4, Some(size), 1).err(),
                Some(CreateGameError::GridSizeNotPositive(size))
            );
        }
    }

    #[test]
    fn rejects_grids_with_fewer_cells_than_players() {
        assert_eq!(
            GameSession::create(2, Some(1), 1).err(),
            Some(CreateGameError::GridSizeTooSmall {
                grid_size: 1,
                player_count: 2,
            })
        );
        assert_eq!(
            GameSession::create(5, Some(2), 1).err(),
            Some(CreateGameError::GridSizeTooSmall {
                grid_size: 2,
                player_count: 5,
            })
        );
    }

    #[test]
    fn tiny_grid_overrides_spawn_in_bounds_and_unique() {
        // A 2x2 grid cannot honor the normal spawn margin; spawns must
        // still land on distinct in-grid cells.
        for (player_count, size) in [(2, 2), (4, 2), (3, 3), (8, 4)] {
            for seed in [1u32, 77, 4_096] {
                let session =
                    GameSession::create(player_count, Some(size), seed).expect("valid config");
                let snap = session.snapshot();
                let mut seen = HashSet::new();
                for player in &snap.players {
                    assert!(
                        (0..snap.grid_size).contains(&player.x)
                            && (0..snap.grid_size).contains(&player.y),
                        "{} spawned off-grid at ({}, {})",
                        player.name,
                        player.x,
                        player.y
                    );
                    assert!(
                        seen.insert((player.x, player.y)),
                        "duplicate spawn at ({}, {})",
                        player.x,
                        player.y
                    );
                }
            }
        }
    }

    #[test]
    fn slot_zero_is_the_human_and_bots_never_repeat() {
        let session = GameSession::create(8, None, 77).expect("valid count");
        let snap = session.snapshot();
        assert_eq!(snap.players.len(), 8);
        assert_eq!(snap.players[0].name, HUMAN_NAME);
        assert_eq!(snap.players[0].color, HUMAN_COLOR);

        let mut bot_names: Vec<String> = snap.players[1..]
            .iter()
            .map(|player| player.name.clone())
            .collect();
        bot_names.sort();
        bot_names.dedup();
        assert_eq!(bot_names.len(), 7);
        assert!(bot_names
            .iter()
            .all(|name| ROSTER.iter().any(|profile| profile.name == *name)));
    }

    #[test]
    fn grid_size_defaults_follow_the_player_count_table() {
        let session = GameSession::create(4, None, 5).expect("valid count");
        assert_eq!(session.snapshot().grid_size, 27);

        let session = GameSession::create(4, Some(12), 5).expect("valid count");
        assert_eq!(session.snapshot().grid_size, 12);
    }

    #[test]
    fn same_seed_replays_the_same_match() {
        let mut a = GameSession::create(4, None, 123).expect("valid count");
        let mut b = GameSession::create(4, None, 123).expect("valid count");
        for _ in 0..200 {
            let sa = serde_json::to_string(&a.advance_tick()).expect("serializable");
            let sb = serde_json::to_string(&b.advance_tick()).expect("serializable");
            assert_eq!(sa, sb);
            if a.is_over() {
                break;
            }
        }
    }

    #[test]
    fn match_reaches_a_terminal_state_with_a_winner_or_draw() {
        let mut session = GameSession::create(3, Some(12), 9).expect("valid count");
        let mut last = session.snapshot();
        for _ in 0..500 {
            last = session.advance_tick();
            if last.game_over {
                break;
            }
        }
        assert!(last.game_over);
        match last.winner {
            Some(Winner::Agent(id)) => {
                assert!(last.players[id].is_alive);
                assert_eq!(
                    last.players.iter().filter(|player| player.is_alive).count(),
                    1
                );
            }
            Some(Winner::Draw) => {
                assert!(last.players.iter().all(|player| !player.is_alive));
            }
            None => panic!("terminal state must carry a winner"),
        }
    }

    #[test]
    fn advancing_a_finished_match_is_a_pure_read() {
        let mut session = GameSession::create(2, Some(10), 31).expect("valid count");
        for _ in 0..500 {
            if session.advance_tick().game_over {
                break;
            }
        }
        assert!(session.is_over());
        let frozen = serde_json::to_string(&session.snapshot()).expect("serializable");
        for _ in 0..5 {
            session.submit_human_move(Direction::Up);
            let after = serde_json::to_string(&session.advance_tick()).expect("serializable");
            assert_eq!(after, frozen);
        }
    }
}
