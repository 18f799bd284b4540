//! Game state and turn orchestration.
//!
//! [`Game`] owns the board, the side to move, the castling rights and the
//! promotion workflow. All mutation funnels through [`Game::try_move`] and
//! [`Game::resolve_promotion`]; everything else is read-only inspection.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::board::{AppliedMove, Board};
use crate::engine::movegen::{is_checkmate, legal_destinations, legal_moves_for};
use crate::engine::notation::{decode_coordinate_move, position_string};
use crate::engine::rules::{in_check, is_valid_move};
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, GameStatus, Move, Piece, PieceKind, Square,
};

/// What a successful move call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied and the turn passed to the opponent.
    Played(Move),
    /// A pawn reached its final rank; the game is suspended until
    /// [`Game::resolve_promotion`] picks the replacement piece.
    PromotionPending { from: Square, to: Square },
}

/// A single game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    id: Uuid,
    created_at: DateTime<Utc>,
    board: Board,
    turn: Color,
    rights: CastlingRights,
    status: GameStatus,
    last_move: Option<Move>,
    /// Set while a pawn sits on its final rank awaiting a piece choice.
    pending_promotion: Option<(Square, Square)>,
}

impl Game {
    pub fn new() -> Self {
        let game = Game {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            board: Board::starting(),
            turn: Color::White,
            rights: CastlingRights::ALL,
            status: GameStatus::Active,
            last_move: None,
            pending_promotion: None,
        };
        info!(game_id = %game.id, "new game created");
        game
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn rights(&self) -> CastlingRights {
        self.rights
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// The square a pawn is waiting on for its promotion choice, if any.
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion.map(|(_, to)| to)
    }

    /// Colors whose king is currently attacked.
    pub fn checked_colors(&self) -> Vec<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .filter(|&c| in_check(&self.board, c))
            .collect()
    }

    /// The current position in FEN layout.
    pub fn position_string(&self) -> String {
        position_string(&self.board, self.turn, self.rights)
    }

    /// Legal destinations for the side to move's piece on `from`.
    ///
    /// Empty when the square is empty, holds an opponent piece, the game is
    /// over, or a promotion is pending.
    pub fn legal_destinations_from(&mut self, from: Square) -> Vec<Square> {
        if self.status.is_game_over() || self.pending_promotion.is_some() {
            return Vec::new();
        }
        match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => {
                legal_destinations(&mut self.board, piece, from, self.rights)
            }
            _ => Vec::new(),
        }
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        if self.status.is_game_over() || self.pending_promotion.is_some() {
            return Vec::new();
        }
        legal_moves_for(&mut self.board, self.turn, self.rights)
    }

    /// Attempt to move the side-to-move's piece from `from` to `to`.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.as_str().to_string()));
        }
        if self.pending_promotion.is_some() {
            return Err(ChessError::PromotionPending);
        }

        let piece = self
            .board
            .piece_at(from)
            .ok_or_else(|| invalid(from, to, "no piece on the start square"))?;
        if piece.color != self.turn {
            return Err(invalid(from, to, "it is not that side's turn"));
        }
        if !is_valid_move(&self.board, piece, from, to, self.rights, true) {
            return Err(invalid(from, to, "the piece does not move that way"));
        }

        // Apply tentatively; a move that leaves the mover's own king in
        // check is rolled back by the guard's drop.
        let applied = AppliedMove::apply(&mut self.board, piece, from, to);
        if in_check(applied.board(), piece.color) {
            return Err(invalid(from, to, "the move leaves the king in check"));
        }
        applied.commit();

        self.rights = self.rights.after_move(piece, from);

        if piece.kind == PieceKind::Pawn && to.row() == (!piece.color).home_row() {
            // Suspend until the promotion piece is chosen; the turn does
            // not pass yet.
            self.pending_promotion = Some((from, to));
            debug!(game_id = %self.id, %from, %to, "promotion pending");
            return Ok(MoveOutcome::PromotionPending { from, to });
        }

        let mv = classify_move(piece, from, to);
        self.finish_move(mv);
        Ok(MoveOutcome::Played(mv))
    }

    /// Replace the waiting pawn with `kind` and pass the turn.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome, ChessError> {
        let (from, to) = self
            .pending_promotion
            .ok_or(ChessError::NoPromotionPending)?;
        if !PieceKind::PROMOTIONS.contains(&kind) {
            return Err(ChessError::InvalidPromotion(format!("{kind:?}")));
        }

        self.board.set(to, Some(Piece::new(self.turn, kind)));
        self.pending_promotion = None;

        let mv = Move::promotion(from, to, kind);
        self.finish_move(mv);
        Ok(MoveOutcome::Played(mv))
    }

    /// Play a coordinate move like `e2e4` or `e7e8q` in one call.
    ///
    /// When the text carries a promotion letter and the move indeed promotes,
    /// the promotion is resolved immediately.
    pub fn play_coordinate_move(&mut self, text: &str) -> Result<MoveOutcome, ChessError> {
        let (from, to, promotion) = decode_coordinate_move(text)?;
        match self.try_move(from, to)? {
            MoveOutcome::PromotionPending { from, to } => match promotion {
                Some(kind) => self.resolve_promotion(kind),
                None => Ok(MoveOutcome::PromotionPending { from, to }),
            },
            outcome => Ok(outcome),
        }
    }

    fn finish_move(&mut self, mv: Move) {
        self.last_move = Some(mv);
        self.turn = !self.turn;
        self.status = self.compute_status();
        debug!(game_id = %self.id, %mv, status = self.status.as_str(), "move played");
        if self.status == GameStatus::Checkmate {
            info!(game_id = %self.id, winner = %(!self.turn).token(), "checkmate");
        }
    }

    /// Status from the perspective of the side now to move.
    fn compute_status(&mut self) -> GameStatus {
        if is_checkmate(&mut self.board, self.turn, self.rights) {
            GameStatus::Checkmate
        } else if in_check(&self.board, self.turn) {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

fn invalid(from: Square, to: Square, reason: &str) -> ChessError {
    ChessError::InvalidMove {
        from: from.to_coordinate(),
        to: to.to_coordinate(),
        reason: reason.to_string(),
    }
}

fn classify_move(piece: Piece, from: Square, to: Square) -> Move {
    if piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2 {
        let side = if to.col() == CastleSide::Kingside.king_col() {
            CastleSide::Kingside
        } else {
            CastleSide::Queenside
        };
        Move::castle(from, to, side)
    } else {
        Move::new(from, to)
    }
}
