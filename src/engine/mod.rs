//! The chess rules engine: board representation, move validation, legal
//! move generation, game orchestration and position notation.

pub mod board;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod types;

pub use board::{AppliedMove, Board};
pub use game::{Game, MoveOutcome};
pub use movegen::{is_checkmate, legal_destinations, legal_moves_for};
pub use notation::{decode_coordinate_move, position_string};
pub use rules::{in_check, is_valid_move};
pub use types::{
    CastleSide, CastlingRights, ChessError, Color, GameStatus, Move, MoveKind, Piece, PieceKind,
    Square,
};
