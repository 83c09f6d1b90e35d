use serde::Deserialize;

use crate::types::Direction;

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    #[serde(rename = "playerCount")]
    pub player_count: usize,
    #[serde(rename = "gridSize", default)]
    pub grid_size: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMoveRequest {
    pub direction: String,
}

impl SubmitMoveRequest {
    pub fn parse_direction(&self) -> Option<Direction> {
        Direction::parse_move(&self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_game_request_parses_with_and_without_grid_size() {
        let req: StartGameRequest =
            serde_json::from_str(r#"{"playerCount": 4}"#).expect("valid request");
        assert_eq!(req.player_count, 4);
        assert_eq!(req.grid_size, None);

        let req: StartGameRequest =
            serde_json::from_str(r#"{"playerCount": 2, "gridSize": 14}"#).expect("valid request");
        assert_eq!(req.player_count, 2);
        assert_eq!(req.grid_size, Some(14));
    }

    #[test]
    fn move_request_maps_strings_onto_directions() {
        let req: SubmitMoveRequest =
            serde_json::from_str(r#"{"direction": "LEFT"}"#).expect("valid request");
        assert_eq!(req.parse_direction(), Some(Direction::Left));

        let req: SubmitMoveRequest =
            serde_json::from_str(r#"{"direction": "sideways"}"#).expect("valid request");
        assert_eq!(req.parse_direction(), None);
    }
}
