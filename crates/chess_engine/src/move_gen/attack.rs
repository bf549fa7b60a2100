//! Attack and check detection
//!
//! Uses the same geometry rules as move legality but without the
//! leaves-own-king-in-check recursion: an attack test is a pure reachability
//! question. Pawns attack only diagonally (a pawn's forward push can never
//! give check), and kings attack their eight neighbors (never by castling).

use super::bishop::bishop_move_valid;
use super::knight::knight_move_valid;
use super::queen::queen_move_valid;
use super::rook::rook_move_valid;
use crate::board::{Board, Square};
use crate::types::{Color, PieceKind};

/// True if any piece of `attacker` reaches `target` under its geometry rule.
pub fn square_attacked_by(board: &Board, target: Square, attacker: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == attacker)
        .any(|(from, piece)| attacks(board, from, piece.kind, attacker, target))
}

fn attacks(board: &Board, from: Square, kind: PieceKind, color: Color, target: Square) -> bool {
    match kind {
        PieceKind::Pawn => {
            let dfile = (target.file() as i8 - from.file() as i8).abs();
            let drank = target.rank() as i8 - from.rank() as i8;
            dfile == 1 && drank == color.pawn_direction()
        }
        PieceKind::Knight => knight_move_valid(from, target),
        PieceKind::Bishop => bishop_move_valid(board, from, target),
        PieceKind::Rook => rook_move_valid(board, from, target),
        PieceKind::Queen => queen_move_valid(board, from, target),
        PieceKind::King => {
            let dfile = (target.file() as i8 - from.file() as i8).abs();
            let drank = (target.rank() as i8 - from.rank() as i8).abs();
            dfile <= 1 && drank <= 1 && (dfile, drank) != (0, 0)
        }
    }
}

/// True if `color`'s king is currently attacked.
///
/// A board with no king for `color` reports not-in-check; legality checks
/// reject such histories through other paths.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => square_attacked_by(board, king, color.opponent()),
        None => false,
    }
}
