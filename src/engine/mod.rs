use std::collections::HashMap;

use crate::arena::Arena;
use crate::constants::{SPAWN_MARGIN, SPAWN_MAX_ATTEMPTS, SPAWN_MIN_DISTANCE};
use crate::rng::Rng;
use crate::types::{AgentConfig, AgentView, Cell, Direction, Snapshot, Winner};

mod spawn;

use self::spawn::pick_spawn_cell;

#[derive(Clone, Debug)]
struct AgentInternal {
    id: usize,
    name: String,
    color: String,
    x: i32,
    y: i32,
    facing: Direction,
    pending: Direction,
    alive: bool,
    trail: Vec<Cell>,
}

impl AgentInternal {
    fn head(&self) -> Cell {
        (self.x, self.y)
    }
}

/// Owns the arena and every agent; the only mutator of game state.
///
/// A tick runs four phases over the whole agent collection, evaluating
/// phases 2-3 against the pre-tick occupancy snapshot so the outcome never
/// depends on agent iteration order.
#[derive(Clone, Debug)]
pub struct GameEngine {
    arena: Arena,
    agents: Vec<AgentInternal>,
    game_over: bool,
    winner: Option<Winner>,
}

impl GameEngine {
    pub fn new(grid_size: i32, configs: &[AgentConfig], rng: &mut Rng) -> Self {
        let mut arena = Arena::new(grid_size);
        let mut agents = Vec::with_capacity(configs.len());
        let mut placed: Vec<Cell> = Vec::with_capacity(configs.len());

        for (id, config) in configs.iter().enumerate() {
            let spawn = pick_spawn_cell(
                &arena,
                &placed,
                SPAWN_MARGIN,
                SPAWN_MIN_DISTANCE,
                SPAWN_MAX_ATTEMPTS,
                rng,
            );
            let facing = rng.pick_direction();
            arena.occupy(spawn);
            placed.push(spawn);
            agents.push(AgentInternal {
                id,
                name: config.name.clone(),
                color: config.color.clone(),
                x: spawn.0,
                y: spawn.1,
                facing,
                pending: facing,
                alive: true,
                trail: vec![spawn],
            });
        }

        Self {
            arena,
            agents,
            game_over: false,
            winner: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Records the direction requested for the next tick. Out-of-range ids
    /// and 180-degree reversals are silent no-ops; any other direction,
    /// including the current facing, overwrites the pending one.
    pub fn submit_direction(&mut self, agent_id: usize, direction: Direction) {
        let Some(agent) = self.agents.get_mut(agent_id) else {
            return;
        };
        if direction == agent.facing.opposite() {
            return;
        }
        agent.pending = direction;
    }

    pub fn tick(&mut self) {
        if self.game_over {
            return;
        }

        // 1. Move: every living agent commits its pending direction and
        // steps one cell.
        for agent in &mut self.agents {
            if !agent.alive {
                continue;
            }
            agent.facing = agent.pending;
            let next = agent.facing.offset(agent.head());
            agent.x = next.0;
            agent.y = next.1;
            agent.trail.push(next);
        }

        // 2. Collide against the pre-tick occupancy. Head-on collisions are
        // symmetric: whichever agent is seen second kills both.
        let mut heads: HashMap<Cell, usize> = HashMap::new();
        for idx in 0..self.agents.len() {
            if !self.agents[idx].alive {
                continue;
            }
            let cell = self.agents[idx].head();
            if !self.arena.is_free(cell) {
                self.agents[idx].alive = false;
                continue;
            }
            if let Some(other_idx) = heads.get(&cell).copied() {
                self.agents[idx].alive = false;
                self.agents[other_idx].alive = false;
            } else {
                heads.insert(cell, idx);
            }
        }

        // 3. Commit surviving heads into the permanent occupancy set.
        let commits: Vec<Cell> = self
            .agents
            .iter()
            .filter(|agent| agent.alive)
            .map(|agent| agent.head())
            .collect();
        for cell in commits {
            self.arena.occupy(cell);
        }

        // 4. Terminate.
        let survivors: Vec<usize> = self
            .agents
            .iter()
            .filter(|agent| agent.alive)
            .map(|agent| agent.id)
            .collect();
        if survivors.len() <= 1 {
            self.game_over = true;
            self.winner = match survivors.as_slice() {
                [sole] => Some(Winner::Agent(*sole)),
                _ => Some(Winner::Draw),
            };
        }
    }

    /// Immutable view of the full game state; the only channel strategies
    /// and the transport boundary observe.
    pub fn build_snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.arena.grid_size(),
            players: self
                .agents
                .iter()
                .map(|agent| AgentView {
                    id: agent.id,
                    name: agent.name.clone(),
                    x: agent.x,
                    y: agent.y,
                    direction: agent.facing,
                    is_alive: agent.alive,
                    trail: agent.trail.clone(),
                    color: agent.color.clone(),
                })
                .collect(),
            game_over: self.game_over,
            winner: self.winner,
        }
    }
}
