//! Snapshot building for broadcast

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Vec2;
use super::simulation::{GameBounds, GameData};

/// Ball fields published to clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub direction: Vec2,
    pub speed: f64,
}

/// Per-tick match snapshot sent to both participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: Uuid,
    pub ball: BallSnapshot,
    pub paddle_left: Vec2,
    pub paddle_right: Vec2,
    pub player_left_ready: bool,
    pub player_right_ready: bool,
    pub bounds: GameBounds,
}

impl MatchSnapshot {
    /// Capture the current simulation state
    pub fn from_game(game: &GameData) -> Self {
        Self {
            match_id: game.match_id,
            ball: BallSnapshot {
                pos: game.ball.pos,
                direction: game.ball.direction,
                speed: game.ball.speed,
            },
            paddle_left: game.paddle_left.pos,
            paddle_right: game.paddle_right.pos,
            player_left_ready: game.player_left_ready,
            player_right_ready: game.player_right_ready,
            bounds: game.bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn snapshot_mirrors_game_state() {
        let mut game = GameData::new(GameConfig::default(), 9);
        game.player_left_ready = true;
        game.tick(1_000);

        let snapshot = MatchSnapshot::from_game(&game);

        assert_eq!(snapshot.match_id, game.match_id);
        assert_eq!(snapshot.ball.pos, game.ball.pos);
        assert_eq!(snapshot.ball.speed, game.ball.speed);
        assert_eq!(snapshot.paddle_right, game.paddle_right.pos);
        assert!(snapshot.player_left_ready);
        assert!(!snapshot.player_right_ready);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let game = GameData::new(GameConfig::default(), 10);
        let snapshot = MatchSnapshot::from_game(&game);
        let json = serde_json::to_string(&snapshot).expect("snapshot must serialize");
        assert!(json.contains("match_id"));
        assert!(json.contains("bounds"));
    }
}
