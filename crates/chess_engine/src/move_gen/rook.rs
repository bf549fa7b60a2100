//! Rook movement geometry

use super::sliding::path_clear;
use crate::board::{Board, Square};

pub(crate) fn rook_move_valid(board: &Board, from: Square, to: Square) -> bool {
    // Must move horizontally or vertically
    if from.file() != to.file() && from.rank() != to.rank() {
        return false;
    }

    path_clear(board, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece, PieceKind};

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn test_rook_lines() {
        let board = Board::empty();
        assert!(rook_move_valid(&board, sq("a1"), sq("a8")));
        assert!(rook_move_valid(&board, sq("a1"), sq("h1")));
        assert!(!rook_move_valid(&board, sq("a1"), sq("b2")), "Diagonal move");
    }

    #[test]
    fn test_rook_blocked() {
        let mut board = Board::empty();
        board.set(sq("a5"), Some(Piece::new(Color::Black, PieceKind::Knight)));
        assert!(
            !rook_move_valid(&board, sq("a1"), sq("a8")),
            "Knight on a5 blocks the file"
        );
        assert!(
            rook_move_valid(&board, sq("a1"), sq("a5")),
            "Moving onto the blocker is geometrically fine (capture handled by caller)"
        );
    }
}
