//! Mailbox board representation.
//!
//! `Board` is an 8×8 grid of optional pieces, row 0 = Black's back rank.
//! Exactly one board exists per in-progress game and it is mutated in place
//! for every accepted move. Speculative mutation (legality probing, castle
//! transit checks) goes through [`AppliedMove`], a scoped guard whose `Drop`
//! restores the grid, so no early-return or panic path can leave the board
//! half-moved.

use crate::engine::types::{Color, Piece, PieceKind, Square};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 8×8 grid of occupants.
///
/// `PartialEq` is derived so "restored to a bit-identical state" is a
/// directly testable claim.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting layout.
    pub fn starting() -> Self {
        use PieceKind::*;
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = Board::empty();
        for (col, &kind) in back.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(Color::Black, kind));
            board.squares[7][col] = Some(Piece::new(Color::White, kind));
        }
        for col in 0..8 {
            board.squares[1][col] = Some(Piece::new(Color::Black, Pawn));
            board.squares[6][col] = Some(Piece::new(Color::White, Pawn));
        }
        board
    }

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Place or clear a square.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all_squares() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }

    /// All occupied squares with their pieces.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Self::all_squares().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// All squares holding a piece of the given color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color == color)
    }

    /// Find the king of `color`. `None` means the board holds no such king,
    /// which the check detector treats as its fail-closed case.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Render the board as an 8-line text grid (rank 8 at top), useful for
    /// debugging and the terminal driver.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) => p.to_char(),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board:")?;
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// AppliedMove: scoped apply/revert
// ---------------------------------------------------------------------------

/// Saved contents of the rook squares touched by a castle simulation.
#[derive(Clone, Copy, Debug)]
struct RookShift {
    from: Square,
    to: Square,
    from_prior: Option<Piece>,
    to_prior: Option<Piece>,
}

/// A move tentatively applied to a live board.
///
/// Dropping the guard restores every touched square to its prior contents;
/// [`AppliedMove::commit`] keeps the move instead. A king step of two
/// columns also relocates the matching rook onto its transit square, and the
/// rook shift is reversed on rollback along with everything else.
pub struct AppliedMove<'a> {
    board: &'a mut Board,
    from: Square,
    to: Square,
    moved: Piece,
    captured: Option<Piece>,
    rook: Option<RookShift>,
    committed: bool,
}

impl<'a> AppliedMove<'a> {
    /// Apply `piece` moving `from` → `to`. The caller guarantees `piece`
    /// is the occupant of `from`.
    pub fn apply(board: &'a mut Board, piece: Piece, from: Square, to: Square) -> Self {
        let captured = board.piece_at(to);
        board.set(to, Some(piece));
        board.set(from, None);

        // A king travelling two columns is a castle: bring the rook along.
        let rook = if piece.kind == PieceKind::King
            && from.col().abs_diff(to.col()) == 2
        {
            let (rook_from_col, rook_to_col) = if to.col() == 6 { (7, 5) } else { (0, 3) };
            let rook_from = Square::new(to.row(), rook_from_col);
            let rook_to = Square::new(to.row(), rook_to_col);
            let from_prior = board.piece_at(rook_from);
            let to_prior = board.piece_at(rook_to);
            board.set(rook_to, from_prior);
            board.set(rook_from, None);
            Some(RookShift {
                from: rook_from,
                to: rook_to,
                from_prior,
                to_prior,
            })
        } else {
            None
        };

        AppliedMove {
            board,
            from,
            to,
            moved: piece,
            captured,
            rook,
            committed: false,
        }
    }

    /// The board with the move in place.
    #[inline]
    pub fn board(&self) -> &Board {
        self.board
    }

    /// Keep the move on the board instead of rolling it back.
    pub fn commit(mut self) {
        self.committed = true;
    }

    fn restore(&mut self) {
        self.board.set(self.from, Some(self.moved));
        self.board.set(self.to, self.captured);
        if let Some(rook) = self.rook {
            self.board.set(rook.from, rook.from_prior);
            self.board.set(rook.to, rook.to_prior);
        }
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.restore();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
