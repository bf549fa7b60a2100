//! Pawn movement geometry
//!
//! - Forward push: one square toward the opponent, destination empty
//! - Double push: only from the home rank, intermediate and destination empty
//! - Capture: one square diagonally forward, destination holding an enemy
//!   piece, or equal to the en-passant target square

use crate::board::{Board, Square};
use crate::types::Color;

/// Pawn geometry test. `en_passant` is the current en-passant target square,
/// if any; a diagonal move onto it is a capture even though the square is
/// empty.
pub(crate) fn pawn_move_valid(
    board: &Board,
    color: Color,
    from: Square,
    to: Square,
    en_passant: Option<Square>,
) -> bool {
    let direction = color.pawn_direction();
    let dfile = to.file() as i8 - from.file() as i8;
    let drank = to.rank() as i8 - from.rank() as i8;

    // Forward push
    if dfile == 0 && drank == direction {
        return board.is_empty(to);
    }

    // Double push from the home rank
    if dfile == 0 && drank == 2 * direction && from.rank() == color.pawn_start_rank() {
        let intermediate = match from.offset(0, direction) {
            Some(sq) => sq,
            None => return false,
        };
        return board.is_empty(intermediate) && board.is_empty(to);
    }

    // Diagonal capture
    if dfile.abs() == 1 && drank == direction {
        if let Some(target) = board.piece_at(to) {
            return target.color != color;
        }
        return en_passant == Some(to);
    }

    false
}
