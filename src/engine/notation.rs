//! Position export and coordinate-move decoding.

use crate::engine::board::Board;
use crate::engine::types::{CastlingRights, ChessError, Color, PieceKind, Square};

/// Serialize a position in FEN layout.
///
/// Piece placement runs rank 8 down to rank 1, then the side to move and
/// the castling token. The en passant, halfmove and fullmove fields are
/// emitted as the fixed tail `- 0 1`; nothing downstream consumes them, and
/// engines accept the position regardless.
pub fn position_string(board: &Board, side_to_move: Color, rights: CastlingRights) -> String {
    let mut out = String::with_capacity(80);

    for row in 0..8u8 {
        if row > 0 {
            out.push('/');
        }
        let mut empties = 0;
        for col in 0..8u8 {
            match board.piece_at(Square::new(row, col)) {
                Some(piece) => {
                    if empties > 0 {
                        out.push(char::from(b'0' + empties));
                        empties = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empties += 1,
            }
        }
        if empties > 0 {
            out.push(char::from(b'0' + empties));
        }
    }

    out.push(' ');
    out.push(side_to_move.token());
    out.push(' ');
    out.push_str(&rights.token());
    out.push_str(" - 0 1");
    out
}

/// Decode a coordinate move like `e2e4` or `e7e8q`.
///
/// Accepts exactly four characters, or five when the last names a
/// promotion piece (`q`, `r`, `b` or `n`).
pub fn decode_coordinate_move(
    text: &str,
) -> Result<(Square, Square, Option<PieceKind>), ChessError> {
    let bytes = text.as_bytes();
    if !(bytes.len() == 4 || bytes.len() == 5) || !text.is_ascii() {
        return Err(ChessError::InvalidMoveText(text.to_string()));
    }

    let from = Square::from_coordinate(&text[0..2])
        .ok_or_else(|| ChessError::InvalidMoveText(text.to_string()))?;
    let to = Square::from_coordinate(&text[2..4])
        .ok_or_else(|| ChessError::InvalidMoveText(text.to_string()))?;

    let promotion = match text[4..].chars().next() {
        Some(c) => Some(
            PieceKind::from_promotion_char(c)
                .ok_or_else(|| ChessError::InvalidPromotion(c.to_string()))?,
        ),
        None => None,
    };

    Ok((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Color, Piece};

    fn sq(name: &str) -> Square {
        Square::from_coordinate(name).unwrap()
    }

    #[test]
    fn starting_position_string() {
        let b = Board::starting();
        assert_eq!(
            position_string(&b, Color::White, CastlingRights::ALL),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn side_and_rights_tokens() {
        let b = Board::starting();
        let s = position_string(&b, Color::Black, CastlingRights::NONE);
        assert!(s.ends_with(" b - - 0 1"));
    }

    #[test]
    fn empty_runs_are_compressed() {
        let mut b = Board::empty();
        b.set(sq("e4"), Some(Piece::new(Color::White, PieceKind::King)));
        b.set(sq("e5"), Some(Piece::new(Color::Black, PieceKind::King)));
        let s = position_string(&b, Color::White, CastlingRights::NONE);
        assert_eq!(s, "8/8/8/4k3/4K3/8/8/8 w - - 0 1");
    }

    #[test]
    fn decode_plain_move() {
        let (from, to, promo) = decode_coordinate_move("e2e4").unwrap();
        assert_eq!((from.row(), from.col()), (6, 4));
        assert_eq!((to.row(), to.col()), (4, 4));
        assert_eq!(promo, None);
    }

    #[test]
    fn decode_promotion_move() {
        let (from, to, promo) = decode_coordinate_move("e7e8q").unwrap();
        assert_eq!((from.row(), from.col()), (1, 4));
        assert_eq!((to.row(), to.col()), (0, 4));
        assert_eq!(promo, Some(PieceKind::Queen));

        assert_eq!(
            decode_coordinate_move("a2a1n").unwrap().2,
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn decode_rejects_malformed_text() {
        for bad in ["", "e2", "e2e", "e2e4q1", "z9e4", "e2x4", "e9e4"] {
            assert!(
                matches!(
                    decode_coordinate_move(bad),
                    Err(ChessError::InvalidMoveText(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn decode_rejects_bad_promotion_letter() {
        assert!(matches!(
            decode_coordinate_move("e7e8k"),
            Err(ChessError::InvalidPromotion(_))
        ));
    }
}
