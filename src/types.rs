use serde::ser::Serializer;
use serde::Serialize;

/// Grid coordinate, serialized on the wire as a `[x, y]` pair.
pub type Cell = (i32, i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step in screen coordinates (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn offset(self, (x, y): Cell) -> Cell {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Agent(usize),
    Draw,
}

// The original client expects a bare agent id, the string "DRAW", or null.
impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Agent(id) => serializer.serialize_u64(*id as u64),
            Self::Draw => serializer.serialize_str("DRAW"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentView {
    pub id: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub is_alive: bool,
    pub trail: Vec<Cell>,
    pub color: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub grid_size: i32,
    pub players: Vec<AgentView>,
    pub game_over: bool,
    pub winner: Option<Winner>,
}

impl Snapshot {
    /// Living opponent head positions, used by strategy distance terms.
    pub fn opponent_heads(&self, agent_id: usize) -> Vec<Cell> {
        self.players
            .iter()
            .filter(|agent| agent.id != agent_id && agent.is_alive)
            .map(|agent| (agent.x, agent.y))
            .collect()
    }
}
