//! King movement geometry
//!
//! One square in any direction, plus castling: a two-square slide along the
//! home rank, accepted when the matching castling right is intact, the rook
//! is still on its corner, and the path between king and rook is clear. The
//! landing square is covered by the caller's king-safety simulation.

use super::sliding::path_clear;
use crate::board::{Board, Square};
use crate::types::{CastlingRights, Color, PieceKind};

pub(crate) fn king_move_valid(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    rights: &CastlingRights,
) -> bool {
    let dfile = (to.file() as i8 - from.file() as i8).abs();
    let drank = (to.rank() as i8 - from.rank() as i8).abs();

    if dfile <= 1 && drank <= 1 {
        return true;
    }

    // Castling: e-file king sliding two squares along its home rank
    if drank == 0 && dfile == 2 && from.file() == 4 && from.rank() == color.home_rank() {
        return castle_valid(board, color, from, to, rights);
    }

    false
}

fn castle_valid(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    rights: &CastlingRights,
) -> bool {
    let (allowed, rook_file) = if to.file() == 6 {
        (rights.kingside(color), 7)
    } else if to.file() == 2 {
        (rights.queenside(color), 0)
    } else {
        return false;
    };

    if !allowed {
        return false;
    }

    let rook_square = match Square::new(rook_file, color.home_rank()) {
        Some(sq) => sq,
        None => return false,
    };
    match board.piece_at(rook_square) {
        Some(piece) if piece.color == color && piece.kind == PieceKind::Rook => {}
        _ => return false,
    }

    path_clear(board, from, rook_square)
}
