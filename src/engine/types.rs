use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Pawn push direction in row terms: White moves toward row 0,
    /// Black toward row 7.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row of this color's back rank (row 0 is Black's, row 7 White's).
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this color's pawns start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Single-letter token used in position strings.
    pub const fn token(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// The kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a promotion letter (q/r/b/n, lowercase). Kings and pawns are
    /// not valid promotion targets.
    pub fn from_promotion_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A colored piece. Immutable value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A board coordinate. Row 0 is Black's back rank (rank 8), row 7 is
/// White's back rank (rank 1); columns run a..h left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "square out of range: ({row},{col})");
        Square { row, col }
    }

    /// Checked constructor for coordinates that may be off-board.
    #[inline]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.col
    }

    /// Parse coordinate notation like "e4". Rank 8 maps to row 0.
    pub fn from_coordinate(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if col < 8 && rank < 8 {
            Some(Square::new(7 - rank, col))
        } else {
            None
        }
    }

    /// Convert to coordinate notation like "e4".
    pub fn to_coordinate(self) -> String {
        let file = (b'a' + self.col) as char;
        let rank = (b'1' + (7 - self.row)) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Which wing a castle move is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// King destination column for this wing.
    #[inline]
    pub const fn king_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// (rook start column, rook destination column) for this wing.
    #[inline]
    pub const fn rook_cols(self) -> (u8, u8) {
        match self {
            CastleSide::Kingside => (7, 5),
            CastleSide::Queenside => (0, 3),
        }
    }
}

/// What sort of move this is, fixed when the move is built rather than
/// re-derived from geometry downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Castle(CastleSide),
    Promotion(PieceKind),
}

/// A chess move: start square, end square, and kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    pub fn castle(from: Square, to: Square, side: CastleSide) -> Self {
        Move {
            from,
            to,
            kind: MoveKind::Castle(side),
        }
    }

    pub fn promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            kind: MoveKind::Promotion(kind),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let MoveKind::Promotion(kind) = self.kind {
            write!(f, "{}", kind.to_char(Color::Black))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
///
/// Rights only ever narrow: each flag transitions true→false at most once
/// over the life of a game and never comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    #[inline]
    pub fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn can_castle(self, color: Color, side: CastleSide) -> bool {
        self.has(Self::flag(color, side))
    }

    /// Rights after `piece` moves away from `from`.
    ///
    /// A king move clears both of that color's flags; a rook move from its
    /// exact home corner clears the matching flag. This fires only for the
    /// mover's start square: capturing an unmoved rook on its home square
    /// does NOT clear the victim's rights. Known gap, kept deliberately and
    /// pinned by a regression test.
    pub fn after_move(self, piece: Piece, from: Square) -> Self {
        let mut rights = self;
        match piece.kind {
            PieceKind::King => {
                rights.remove(Self::flag(piece.color, CastleSide::Kingside));
                rights.remove(Self::flag(piece.color, CastleSide::Queenside));
            }
            PieceKind::Rook if from.row() == piece.color.home_row() => {
                if from.col() == 0 {
                    rights.remove(Self::flag(piece.color, CastleSide::Queenside));
                } else if from.col() == 7 {
                    rights.remove(Self::flag(piece.color, CastleSide::Kingside));
                }
            }
            _ => {}
        }
        rights
    }

    /// Parse the castling-availability token (e.g. "KQkq", "-", "Kq").
    pub fn from_token(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Castling-availability token for position strings.
    pub fn token(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game. Stalemate and draw rules are out of scope for
/// this engine, so a side with no moves but no check stays `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid move: {from} -> {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid coordinate move text: {0:?}")]
    InvalidMoveText(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("a promotion choice is pending; resolve it before moving")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("game is already over: {0}")]
    GameOver(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
