//! Path clearance for sliding pieces
//!
//! Rooks, bishops, and queens require every intervening square on the
//! from→to line to be empty. Occupancy of the destination itself is handled
//! by the caller (capture vs own-piece rejection).

use crate::board::{Board, Square};

/// True when every square strictly between `from` and `to` is empty.
///
/// Assumes `from` and `to` are on a shared rank, file, or diagonal; the
/// per-piece geometry checks guarantee this before calling.
pub(crate) fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let dfile = (to.file() as i8 - from.file() as i8).signum();
    let drank = (to.rank() as i8 - from.rank() as i8).signum();

    let mut current = from;
    loop {
        current = match current.offset(dfile, drank) {
            Some(sq) => sq,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty(current) {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece, PieceKind};

    #[test]
    fn test_path_clear_on_empty_board() {
        let board = Board::empty();
        let a1 = Square::parse("a1").unwrap();
        let a8 = Square::parse("a8").unwrap();
        let h8 = Square::parse("h8").unwrap();

        assert!(path_clear(&board, a1, a8), "Open file");
        assert!(path_clear(&board, a1, h8), "Open diagonal");
    }

    #[test]
    fn test_path_blocked_by_piece() {
        let mut board = Board::empty();
        board.set(
            Square::parse("a4").unwrap(),
            Some(Piece::new(Color::Black, PieceKind::Pawn)),
        );

        let a1 = Square::parse("a1").unwrap();
        assert!(
            !path_clear(&board, a1, Square::parse("a8").unwrap()),
            "Pawn on a4 blocks the file"
        );
        assert!(
            path_clear(&board, a1, Square::parse("a4").unwrap()),
            "Path up to the blocker itself is clear"
        );
        assert!(path_clear(&board, a1, Square::parse("a3").unwrap()));
    }

    #[test]
    fn test_adjacent_squares_always_clear() {
        let board = Board::starting_position();
        assert!(path_clear(
            &board,
            Square::parse("e2").unwrap(),
            Square::parse("e3").unwrap()
        ));
    }
}
