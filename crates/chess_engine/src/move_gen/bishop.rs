//! Bishop movement geometry

use super::sliding::path_clear;
use crate::board::{Board, Square};

pub(crate) fn bishop_move_valid(board: &Board, from: Square, to: Square) -> bool {
    let dfile = (to.file() as i8 - from.file() as i8).abs();
    let drank = (to.rank() as i8 - from.rank() as i8).abs();

    // Must move diagonally
    if dfile != drank || dfile == 0 {
        return false;
    }

    path_clear(board, from, to)
}
