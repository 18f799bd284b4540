//! Serializable views of a game for display and machine output.

use serde::Serialize;

use crate::engine::game::Game;
use crate::engine::types::Color;

/// A point-in-time view of a game, serialized in camelCase for consumers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    /// 8x8 grid, rank 8 first; each cell is a piece letter (`K`, `q`, ...)
    /// or null.
    pub board: Vec<Vec<Option<String>>>,
    pub fen: String,
    pub status: String,
    pub current_player: String,
    pub check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_promotion: Option<String>,
    pub created_at: String,
}

impl GameSnapshot {
    pub fn of(game: &Game) -> Self {
        let board = (0..8u8)
            .map(|row| {
                (0..8u8)
                    .map(|col| {
                        game.board()
                            .piece_at(crate::engine::types::Square::new(row, col))
                            .map(|p| p.to_char().to_string())
                    })
                    .collect()
            })
            .collect();

        GameSnapshot {
            id: game.id().to_string(),
            board,
            fen: game.position_string(),
            status: game.status().as_str().to_string(),
            current_player: match game.turn() {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            check: game.checked_colors().contains(&game.turn()),
            last_move: game.last_move().map(|m| m.to_string()),
            pending_promotion: game.pending_promotion().map(|sq| sq.to_coordinate()),
            created_at: game.created_at().to_rfc3339(),
        }
    }
}
