use std::collections::HashSet;

use crate::constants::DEFAULT_SEARCH_CAPACITY;
use crate::flood::reachable_cells;
use crate::rng::Rng;
use crate::types::{Cell, Direction, Snapshot, ALL_DIRECTIONS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    PreferStraight,
    Random,
}

/// One parameterized decision function covers the whole bot roster; the
/// presets below only differ in scoring knobs and tie-break policy.
#[derive(Clone, Debug)]
pub struct StrategyProfile {
    pub name: &'static str,
    pub color: &'static str,
    /// Flood-fill truncation bound for this bot's lookahead.
    pub search_capacity: usize,
    pub straight_bonus: i32,
    /// Cells from the border inside which `edge_penalty` applies.
    pub edge_margin: i32,
    pub edge_penalty: i32,
    /// Manhattan radius inside which `opponent_penalty` applies.
    pub opponent_radius: i32,
    pub opponent_penalty: i32,
    pub tie_break: TieBreak,
}

pub static ROSTER: &[StrategyProfile] = &[
    StrategyProfile {
        name: "gemini_bot",
        color: "#4285F4",
        search_capacity: DEFAULT_SEARCH_CAPACITY,
        straight_bonus: 0,
        edge_margin: 0,
        edge_penalty: 0,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::PreferStraight,
    },
    StrategyProfile {
        name: "chatgpt_bot",
        color: "#75A593",
        search_capacity: 150,
        straight_bonus: 0,
        edge_margin: 0,
        edge_penalty: 0,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::Random,
    },
    StrategyProfile {
        name: "claude_bot",
        color: "#D97A53",
        search_capacity: 60,
        straight_bonus: 20,
        edge_margin: 3,
        edge_penalty: 10,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::PreferStraight,
    },
    StrategyProfile {
        name: "meta_bot",
        color: "#0068FA",
        search_capacity: 12,
        straight_bonus: 0,
        edge_margin: 0,
        edge_penalty: 0,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::Random,
    },
    StrategyProfile {
        name: "grok_bot",
        color: "#8A2BE2",
        search_capacity: 400,
        straight_bonus: 0,
        edge_margin: 0,
        edge_penalty: 0,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::PreferStraight,
    },
    StrategyProfile {
        name: "deepseek_bot",
        color: "#10B981",
        search_capacity: 10,
        straight_bonus: 2,
        edge_margin: 3,
        edge_penalty: 2,
        opponent_radius: 5,
        opponent_penalty: 1,
        tie_break: TieBreak::Random,
    },
    StrategyProfile {
        name: "qwen_bot",
        color: "#FF9900",
        search_capacity: DEFAULT_SEARCH_CAPACITY,
        straight_bonus: 0,
        edge_margin: 0,
        edge_penalty: 0,
        opponent_radius: 0,
        opponent_penalty: 0,
        tie_break: TieBreak::PreferStraight,
    },
];

pub fn find_profile(name: &str) -> Option<&'static StrategyProfile> {
    ROSTER.iter().find(|profile| profile.name == name)
}

/// Direction the agent last moved, derived from the trail's final two
/// cells. A freshly spawned agent (single-cell trail) has no facing yet.
pub fn facing_from_trail(trail: &[Cell]) -> Option<Direction> {
    let [.., prev, last] = trail else {
        return None;
    };
    match (last.0 - prev.0, last.1 - prev.1) {
        (1, 0) => Some(Direction::Right),
        (-1, 0) => Some(Direction::Left),
        (0, 1) => Some(Direction::Down),
        (0, -1) => Some(Direction::Up),
        _ => None,
    }
}

impl StrategyProfile {
    /// Requests a direction for `agent_id`, or `None` when the agent is
    /// dead or unknown. Never requests the opposite of the current facing;
    /// when every candidate cell is blocked it resigns by returning the
    /// current facing and lets the next tick finish the job.
    pub fn decide(&self, snapshot: &Snapshot, agent_id: usize, rng: &mut Rng) -> Option<Direction> {
        let agent = snapshot.players.get(agent_id)?;
        if !agent.is_alive {
            return None;
        }

        let occupied: HashSet<Cell> = snapshot
            .players
            .iter()
            .flat_map(|player| player.trail.iter().copied())
            .collect();
        let facing = facing_from_trail(&agent.trail);
        let head = (agent.x, agent.y);
        let opponents = snapshot.opponent_heads(agent_id);

        let candidates: Vec<Direction> = ALL_DIRECTIONS
            .into_iter()
            .filter(|dir| facing.map(|f| *dir != f.opposite()).unwrap_or(true))
            .collect();

        let mut scored: Vec<(i32, Direction)> = Vec::with_capacity(candidates.len());
        for dir in candidates {
            let next = dir.offset(head);
            if !in_bounds(next, snapshot.grid_size) || occupied.contains(&next) {
                continue;
            }
            let mut score =
                reachable_cells(next, snapshot.grid_size, &occupied, self.search_capacity) as i32;
            if facing == Some(dir) {
                score += self.straight_bonus;
            }
            if self.edge_penalty > 0 && border_distance(next, snapshot.grid_size) < self.edge_margin
            {
                score -= self.edge_penalty;
            }
            if self.opponent_penalty > 0 {
                let nearest = opponents
                    .iter()
                    .map(|opponent| manhattan(next, *opponent))
                    .min();
                if nearest.is_some_and(|distance| distance < self.opponent_radius) {
                    score -= self.opponent_penalty;
                }
            }
            scored.push((score, dir));
        }

        if scored.is_empty() {
            return Some(facing.unwrap_or_else(|| rng.pick_direction()));
        }

        let best = scored
            .iter()
            .map(|(score, _)| *score)
            .max()
            .unwrap_or_default();
        let best_moves: Vec<Direction> = scored
            .iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, dir)| *dir)
            .collect();

        match self.tie_break {
            TieBreak::PreferStraight => {
                if let Some(facing) = facing {
                    if best_moves.contains(&facing) {
                        return Some(facing);
                    }
                }
                best_moves.first().copied()
            }
            TieBreak::Random => Some(best_moves[rng.pick_index(best_moves.len())]),
        }
    }
}

fn in_bounds((x, y): Cell, grid_size: i32) -> bool {
    x >= 0 && x < grid_size && y >= 0 && y < grid_size
}

fn border_distance((x, y): Cell, grid_size: i32) -> i32 {
    x.min(grid_size - 1 - x).min(y).min(grid_size - 1 - y)
}

fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}
