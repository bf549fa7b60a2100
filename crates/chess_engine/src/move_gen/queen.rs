//! Queen movement geometry
//!
//! A queen moves like a rook or a bishop.

use super::bishop::bishop_move_valid;
use super::rook::rook_move_valid;
use crate::board::{Board, Square};

pub(crate) fn queen_move_valid(board: &Board, from: Square, to: Square) -> bool {
    rook_move_valid(board, from, to) || bishop_move_valid(board, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn test_queen_combines_rook_and_bishop() {
        let board = Board::empty();
        assert!(queen_move_valid(&board, sq("d1"), sq("d8")));
        assert!(queen_move_valid(&board, sq("d1"), sq("h5")));
        assert!(!queen_move_valid(&board, sq("d1"), sq("e3")), "Knight shape");
    }
}
