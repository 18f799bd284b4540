//! Move validation and check detection.
//!
//! [`is_valid_move`] answers whether a single piece may travel from one
//! square to another under its movement geometry and occupancy rules. It
//! does not ask whether the move exposes the mover's own king; that filter
//! lives in the generator. The one exception is the king's own step, which
//! folds the castling rules in when `allow_castle` is set.
//!
//! [`in_check`] scans every enemy occupant and asks the validator whether it
//! could capture the king square. It always calls the validator with
//! castling disabled, which is what breaks the recursion castling's own
//! transit-safety probes would otherwise cause.

use crate::engine::board::Board;
use crate::engine::types::{CastleSide, CastlingRights, Color, Piece, PieceKind, Square};

/// The four rook directions.
const STRAIGHT: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// The four bishop directions.
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// ---------------------------------------------------------------------------
// Move Validator
// ---------------------------------------------------------------------------

/// Is moving `piece` from `start` to `end` permitted by its movement rules?
///
/// The caller guarantees `piece` is the occupant of `start`. Moves onto a
/// same-color piece (or onto the start square itself) are always rejected.
/// `allow_castle` must be false on attack-scanning paths.
pub fn is_valid_move(
    board: &Board,
    piece: Piece,
    start: Square,
    end: Square,
    rights: CastlingRights,
    allow_castle: bool,
) -> bool {
    if start == end {
        return false;
    }
    if let Some(target) = board.piece_at(end) {
        if target.color == piece.color {
            return false;
        }
    }

    match piece.kind {
        PieceKind::Pawn => pawn_move_ok(board, piece.color, start, end),
        PieceKind::Knight => knight_move_ok(start, end),
        PieceKind::Bishop => slides_to(board, start, end, &DIAGONAL),
        PieceKind::Rook => slides_to(board, start, end, &STRAIGHT),
        // A queen move is exactly a rook move or a bishop move.
        PieceKind::Queen => {
            slides_to(board, start, end, &STRAIGHT) || slides_to(board, start, end, &DIAGONAL)
        }
        PieceKind::King => king_move_ok(board, piece.color, start, end, rights, allow_castle),
    }
}

/// Shared sliding predicate: can a piece slide from `start` to `end` along
/// one of `dirs`, with every strictly-intermediate square empty?
fn slides_to(board: &Board, start: Square, end: Square, dirs: &[(i8, i8)]) -> bool {
    for &(dr, dc) in dirs {
        let mut row = start.row() as i8 + dr;
        let mut col = start.col() as i8 + dc;
        while let Some(sq) = Square::try_new(row, col) {
            if sq == end {
                return true;
            }
            if !board.is_empty(sq) {
                break;
            }
            row += dr;
            col += dc;
        }
    }
    false
}

fn pawn_move_ok(board: &Board, color: Color, start: Square, end: Square) -> bool {
    let dir = color.forward();
    let dr = end.row() as i8 - start.row() as i8;
    let dc = end.col() as i8 - start.col() as i8;

    if dc == 0 {
        // One step forward onto an empty square.
        if dr == dir && board.is_empty(end) {
            return true;
        }
        // Two steps from the home rank, both squares empty.
        if start.row() == color.pawn_row() && dr == 2 * dir {
            let mid = Square::new((start.row() as i8 + dir) as u8, start.col());
            return board.is_empty(mid) && board.is_empty(end);
        }
        false
    } else {
        // Captures only diagonally, and only onto an occupied square. A
        // pawn may never step diagonally onto an empty one.
        dc.abs() == 1 && dr == dir && board.piece_at(end).is_some()
    }
}

fn knight_move_ok(start: Square, end: Square) -> bool {
    let dr = start.row().abs_diff(end.row());
    let dc = start.col().abs_diff(end.col());
    matches!((dr, dc), (2, 1) | (1, 2))
}

fn king_move_ok(
    board: &Board,
    color: Color,
    start: Square,
    end: Square,
    rights: CastlingRights,
    allow_castle: bool,
) -> bool {
    let dr = start.row().abs_diff(end.row());
    let dc = start.col().abs_diff(end.col());

    // Ordinary king step.
    if dr.max(dc) == 1 {
        return true;
    }

    if !allow_castle {
        return false;
    }

    // Castling: a two-square horizontal move from the untouched home square.
    if start.row() != color.home_row() || start.col() != 4 || end.row() != start.row() {
        return false;
    }
    let side = match end.col() {
        6 => CastleSide::Kingside,
        2 => CastleSide::Queenside,
        _ => return false,
    };
    if !rights.can_castle(color, side) {
        return false;
    }
    // No castling out of check.
    if in_check(board, color) {
        return false;
    }

    let row = start.row();
    // Squares that must be empty, and the king's transit squares that must
    // not be attacked. Queenside clears b/c/d but the king only crosses d/c.
    let (clear_cols, transit_cols): (&[u8], &[u8]) = match side {
        CastleSide::Kingside => (&[5, 6], &[5, 6]),
        CastleSide::Queenside => (&[1, 2, 3], &[3, 2]),
    };

    if clear_cols
        .iter()
        .any(|&col| !board.is_empty(Square::new(row, col)))
    {
        return false;
    }

    castle_path_safe(board, color, start, row, transit_cols)
}

/// Would the king be attacked on any of its castle transit squares?
///
/// Probes a copy of the board with the king lifted off its home square and
/// placed on each transit square in turn; the rook stays put during the
/// probe, matching the transit rule (the rook's future square is not what
/// is being tested).
fn castle_path_safe(
    board: &Board,
    color: Color,
    king_from: Square,
    row: u8,
    transit_cols: &[u8],
) -> bool {
    let king = Piece::new(color, PieceKind::King);
    let mut probe = board.clone();
    probe.set(king_from, None);
    for &col in transit_cols {
        let sq = Square::new(row, col);
        let prior = probe.piece_at(sq);
        probe.set(sq, Some(king));
        let attacked = in_check(&probe, color);
        probe.set(sq, prior);
        if attacked {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Check Detector
// ---------------------------------------------------------------------------

/// Is `color`'s king currently attacked?
///
/// Fail-closed: a board holding no king of `color` reports check. A
/// corrupted board should never read as safe.
pub fn in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.find_king(color) else {
        return true;
    };
    board.pieces_of(!color).any(|(sq, piece)| {
        is_valid_move(board, piece, sq, king_sq, CastlingRights::NONE, false)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_coordinate(name).unwrap()
    }

    fn piece(color: Color, kind: PieceKind) -> Piece {
        Piece::new(color, kind)
    }

    fn valid(board: &Board, p: Piece, from: &str, to: &str) -> bool {
        is_valid_move(board, p, sq(from), sq(to), CastlingRights::ALL, true)
    }

    // -------------------------------------------------------------------
    // Universal rejections
    // -------------------------------------------------------------------

    #[test]
    fn same_square_rejected() {
        let b = Board::starting();
        let p = b.piece_at(sq("e2")).unwrap();
        assert!(!valid(&b, p, "e2", "e2"));
    }

    #[test]
    fn same_color_destination_rejected() {
        let b = Board::starting();
        let rook = b.piece_at(sq("a1")).unwrap();
        assert!(!valid(&b, rook, "a1", "a2"));
        let queen = b.piece_at(sq("d1")).unwrap();
        assert!(!valid(&b, queen, "d1", "e1"));
    }

    // -------------------------------------------------------------------
    // Pawns
    // -------------------------------------------------------------------

    #[test]
    fn pawn_single_and_double_push() {
        let b = Board::starting();
        let p = piece(Color::White, PieceKind::Pawn);
        assert!(valid(&b, p, "e2", "e3"));
        assert!(valid(&b, p, "e2", "e4"));
        assert!(!valid(&b, p, "e2", "e5"));
        let bp = piece(Color::Black, PieceKind::Pawn);
        assert!(valid(&b, bp, "e7", "e6"));
        assert!(valid(&b, bp, "e7", "e5"));
    }

    #[test]
    fn pawn_cannot_push_backward() {
        let mut b = Board::empty();
        let p = piece(Color::White, PieceKind::Pawn);
        b.set(sq("e4"), Some(p));
        assert!(!valid(&b, p, "e4", "e3"));
        assert!(valid(&b, p, "e4", "e5"));
    }

    #[test]
    fn pawn_double_push_requires_home_rank_and_clear_path() {
        let mut b = Board::empty();
        let p = piece(Color::White, PieceKind::Pawn);
        b.set(sq("e3"), Some(p));
        assert!(!valid(&b, p, "e3", "e5"));

        let mut b = Board::starting();
        b.set(sq("e3"), Some(piece(Color::Black, PieceKind::Knight)));
        let p = b.piece_at(sq("e2")).unwrap();
        // Intermediate blocked: both the single and double push die.
        assert!(!valid(&b, p, "e2", "e3"), "occupied destination");
        assert!(!valid(&b, p, "e2", "e4"), "blocked intermediate");
    }

    #[test]
    fn pawn_diagonal_only_onto_occupied() {
        let mut b = Board::empty();
        let p = piece(Color::White, PieceKind::Pawn);
        b.set(sq("e4"), Some(p));
        // Empty diagonal: never.
        assert!(!valid(&b, p, "e4", "d5"));
        assert!(!valid(&b, p, "e4", "f5"));
        // Enemy on the diagonal: capture.
        b.set(sq("d5"), Some(piece(Color::Black, PieceKind::Knight)));
        assert!(valid(&b, p, "e4", "d5"));
        // Straight push onto an occupied square: never.
        b.set(sq("e5"), Some(piece(Color::Black, PieceKind::Pawn)));
        assert!(!valid(&b, p, "e4", "e5"));
    }

    #[test]
    fn black_pawn_moves_toward_row_7() {
        let mut b = Board::empty();
        let p = piece(Color::Black, PieceKind::Pawn);
        b.set(sq("d5"), Some(p));
        assert!(valid(&b, p, "d5", "d4"));
        assert!(!valid(&b, p, "d5", "d6"));
        b.set(sq("c4"), Some(piece(Color::White, PieceKind::Bishop)));
        assert!(valid(&b, p, "d5", "c4"));
    }

    // -------------------------------------------------------------------
    // Knights
    // -------------------------------------------------------------------

    #[test]
    fn knight_shapes() {
        let mut b = Board::empty();
        let n = piece(Color::White, PieceKind::Knight);
        b.set(sq("d4"), Some(n));
        for to in ["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"] {
            assert!(valid(&b, n, "d4", to), "knight should reach {to}");
        }
        for to in ["d5", "e4", "f6", "d6", "a4"] {
            assert!(!valid(&b, n, "d4", to), "knight should not reach {to}");
        }
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let b = Board::starting();
        let n = b.piece_at(sq("g1")).unwrap();
        assert!(valid(&b, n, "g1", "f3"));
        assert!(valid(&b, n, "g1", "h3"));
    }

    // -------------------------------------------------------------------
    // Sliders
    // -------------------------------------------------------------------

    #[test]
    fn rook_lines_and_blocking() {
        let mut b = Board::empty();
        let r = piece(Color::White, PieceKind::Rook);
        b.set(sq("d4"), Some(r));
        assert!(valid(&b, r, "d4", "d8"));
        assert!(valid(&b, r, "d4", "a4"));
        assert!(!valid(&b, r, "d4", "e5"));

        b.set(sq("d6"), Some(piece(Color::Black, PieceKind::Pawn)));
        assert!(valid(&b, r, "d4", "d6"), "capture on the blocker itself");
        assert!(!valid(&b, r, "d4", "d7"), "may not pass through the blocker");
    }

    #[test]
    fn bishop_diagonals_and_blocking() {
        let mut b = Board::empty();
        let bi = piece(Color::Black, PieceKind::Bishop);
        b.set(sq("c8"), Some(bi));
        assert!(valid(&b, bi, "c8", "h3"));
        assert!(!valid(&b, bi, "c8", "c5"));

        b.set(sq("e6"), Some(piece(Color::White, PieceKind::Pawn)));
        assert!(valid(&b, bi, "c8", "e6"));
        assert!(!valid(&b, bi, "c8", "f5"));
    }

    #[test]
    fn queen_is_rook_or_bishop() {
        let mut b = Board::empty();
        let q = piece(Color::White, PieceKind::Queen);
        b.set(sq("d1"), Some(q));
        assert!(valid(&b, q, "d1", "d8"));
        assert!(valid(&b, q, "d1", "h5"));
        assert!(!valid(&b, q, "d1", "e3"));
    }

    // -------------------------------------------------------------------
    // King steps
    // -------------------------------------------------------------------

    #[test]
    fn king_single_steps() {
        let mut b = Board::empty();
        let k = piece(Color::White, PieceKind::King);
        b.set(sq("e4"), Some(k));
        for to in ["d3", "d4", "d5", "e3", "e5", "f3", "f4", "f5"] {
            assert!(valid(&b, k, "e4", to), "king should reach {to}");
        }
        assert!(!valid(&b, k, "e4", "e6"));
        assert!(!valid(&b, k, "e4", "g4"));
    }

    // -------------------------------------------------------------------
    // Castling
    // -------------------------------------------------------------------

    fn castle_board() -> Board {
        // Kings and rooks only, everything between them cleared.
        let mut b = Board::empty();
        b.set(sq("e1"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("a1"), Some(piece(Color::White, PieceKind::Rook)));
        b.set(sq("h1"), Some(piece(Color::White, PieceKind::Rook)));
        b.set(sq("e8"), Some(piece(Color::Black, PieceKind::King)));
        b.set(sq("a8"), Some(piece(Color::Black, PieceKind::Rook)));
        b.set(sq("h8"), Some(piece(Color::Black, PieceKind::Rook)));
        b
    }

    #[test]
    fn castling_both_wings_when_clear() {
        let b = castle_board();
        let wk = piece(Color::White, PieceKind::King);
        let bk = piece(Color::Black, PieceKind::King);
        assert!(valid(&b, wk, "e1", "g1"));
        assert!(valid(&b, wk, "e1", "c1"));
        assert!(valid(&b, bk, "e8", "g8"));
        assert!(valid(&b, bk, "e8", "c8"));
    }

    #[test]
    fn castling_requires_rights() {
        let b = castle_board();
        let wk = piece(Color::White, PieceKind::King);
        let none = CastlingRights::NONE;
        assert!(!is_valid_move(&b, wk, sq("e1"), sq("g1"), none, true));
        let only_queenside = CastlingRights(CastlingRights::WHITE_QUEENSIDE);
        assert!(!is_valid_move(&b, wk, sq("e1"), sq("g1"), only_queenside, true));
        assert!(is_valid_move(&b, wk, sq("e1"), sq("c1"), only_queenside, true));
    }

    #[test]
    fn castling_blocked_by_pieces() {
        let mut b = castle_board();
        b.set(sq("f1"), Some(piece(Color::White, PieceKind::Bishop)));
        let wk = piece(Color::White, PieceKind::King);
        assert!(!valid(&b, wk, "e1", "g1"));
        assert!(valid(&b, wk, "e1", "c1"));

        // b1 blocks queenside even though the king never crosses it.
        let mut b = castle_board();
        b.set(sq("b1"), Some(piece(Color::White, PieceKind::Knight)));
        assert!(!valid(&b, wk, "e1", "c1"));
    }

    #[test]
    fn castling_disabled_flag() {
        let b = castle_board();
        let wk = piece(Color::White, PieceKind::King);
        assert!(!is_valid_move(
            &b,
            wk,
            sq("e1"),
            sq("g1"),
            CastlingRights::ALL,
            false
        ));
    }

    #[test]
    fn no_castling_while_in_check() {
        let mut b = castle_board();
        b.set(sq("e5"), Some(piece(Color::Black, PieceKind::Rook)));
        let wk = piece(Color::White, PieceKind::King);
        assert!(!valid(&b, wk, "e1", "g1"));
        assert!(!valid(&b, wk, "e1", "c1"));
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // Black rook on f8 covers f1: kingside transit unsafe, queenside ok.
        let mut b = castle_board();
        b.set(sq("f8"), Some(piece(Color::Black, PieceKind::Rook)));
        b.set(sq("h8"), None);
        let wk = piece(Color::White, PieceKind::King);
        assert!(!valid(&b, wk, "e1", "g1"));
        assert!(valid(&b, wk, "e1", "c1"));
    }

    #[test]
    fn no_castling_onto_attacked_square() {
        // Black rook covers g1: the landing square itself is unsafe.
        let mut b = castle_board();
        b.set(sq("g8"), Some(piece(Color::Black, PieceKind::Rook)));
        let wk = piece(Color::White, PieceKind::King);
        assert!(!valid(&b, wk, "e1", "g1"));
    }

    #[test]
    fn no_castling_from_foreign_square() {
        let mut b = Board::empty();
        let wk = piece(Color::White, PieceKind::King);
        b.set(sq("e4"), Some(wk));
        b.set(sq("e8"), Some(piece(Color::Black, PieceKind::King)));
        assert!(!valid(&b, wk, "e4", "g4"));
        assert!(!valid(&b, wk, "e4", "c4"));
    }

    #[test]
    fn castle_probe_leaves_board_untouched() {
        let b = castle_board();
        let before = b.clone();
        let wk = piece(Color::White, PieceKind::King);
        let _ = valid(&b, wk, "e1", "g1");
        assert_eq!(b, before);
    }

    // -------------------------------------------------------------------
    // Check detection
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_no_check() {
        let b = Board::starting();
        assert!(!in_check(&b, Color::White));
        assert!(!in_check(&b, Color::Black));
    }

    #[test]
    fn rook_gives_check() {
        let mut b = Board::empty();
        b.set(sq("e1"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("e8"), Some(piece(Color::Black, PieceKind::Rook)));
        assert!(in_check(&b, Color::White));
        // Interpose a pawn: no longer check.
        b.set(sq("e4"), Some(piece(Color::White, PieceKind::Pawn)));
        assert!(!in_check(&b, Color::White));
    }

    #[test]
    fn pawn_gives_check_diagonally_only() {
        let mut b = Board::empty();
        b.set(sq("e4"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("d5"), Some(piece(Color::Black, PieceKind::Pawn)));
        assert!(in_check(&b, Color::White));

        let mut b = Board::empty();
        b.set(sq("e4"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("e5"), Some(piece(Color::Black, PieceKind::Pawn)));
        assert!(!in_check(&b, Color::White), "pawn does not check straight ahead");
    }

    #[test]
    fn knight_gives_check() {
        let mut b = Board::empty();
        b.set(sq("e1"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("d3"), Some(piece(Color::Black, PieceKind::Knight)));
        assert!(in_check(&b, Color::White));
    }

    #[test]
    fn missing_king_reads_as_check() {
        let b = Board::empty();
        assert!(in_check(&b, Color::White));
        assert!(in_check(&b, Color::Black));
    }

    #[test]
    fn own_pieces_never_give_check() {
        let mut b = Board::empty();
        b.set(sq("e1"), Some(piece(Color::White, PieceKind::King)));
        b.set(sq("e8"), Some(piece(Color::White, PieceKind::Rook)));
        assert!(!in_check(&b, Color::White));
    }
}
