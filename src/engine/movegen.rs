//! Legal move generation on top of the validator.
//!
//! The generator works by simulation: every validator-approved destination
//! is applied to the board, the mover's king is tested for check, and the
//! move is rolled back. [`AppliedMove`] guarantees the rollback happens even
//! when a probe panics, so a caller's board is bit-identical before and
//! after any generation call.

use crate::engine::board::{AppliedMove, Board};
use crate::engine::rules::{in_check, is_valid_move};
use crate::engine::types::{CastleSide, CastlingRights, Color, Move, Piece, PieceKind, Square};

/// Every square `piece` standing on `from` may legally move to.
///
/// A destination is legal when the validator accepts it and the resulting
/// position does not leave the mover's own king in check.
pub fn legal_destinations(
    board: &mut Board,
    piece: Piece,
    from: Square,
    rights: CastlingRights,
) -> Vec<Square> {
    let mut out = Vec::new();
    for to in Board::all_squares() {
        if !is_valid_move(board, piece, from, to, rights, true) {
            continue;
        }
        let applied = AppliedMove::apply(board, piece, from, to);
        if !in_check(applied.board(), piece.color) {
            out.push(to);
        }
    }
    out
}

/// All legal moves for `color`, tagged with their kind.
///
/// A pawn reaching its final rank contributes one move per promotion piece.
pub fn legal_moves_for(board: &mut Board, color: Color, rights: CastlingRights) -> Vec<Move> {
    let occupants: Vec<(Square, Piece)> = board.pieces_of(color).collect();
    let mut moves = Vec::new();
    for (from, piece) in occupants {
        for to in legal_destinations(board, piece, from, rights) {
            if piece.kind == PieceKind::Pawn && to.row() == (!color).home_row() {
                for kind in PieceKind::PROMOTIONS {
                    moves.push(Move::promotion(from, to, kind));
                }
            } else if piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2 {
                let side = if to.col() == CastleSide::Kingside.king_col() {
                    CastleSide::Kingside
                } else {
                    CastleSide::Queenside
                };
                moves.push(Move::castle(from, to, side));
            } else {
                moves.push(Move::new(from, to));
            }
        }
    }
    moves
}

/// Checkmate: the king is attacked and no legal move escapes.
///
/// A position with no attack on the king is never checkmate here, however
/// immobile the side may be; stalemate is not this function's concern.
pub fn is_checkmate(board: &mut Board, color: Color, rights: CastlingRights) -> bool {
    if !in_check(board, color) {
        return false;
    }
    legal_moves_for(board, color, rights).is_empty()
}
