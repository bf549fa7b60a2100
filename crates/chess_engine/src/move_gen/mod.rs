//! Move generation: per-piece geometry and pseudo-legal candidates
//!
//! Pseudo-legal means the move obeys the piece's geometry and occupancy
//! rules, ignoring whether it leaves the mover's own king in check. The
//! king-safety pass lives in [`crate::api::moves`], because check safety is a
//! whole-board property, not a per-piece one.

mod bishop;
mod king;
mod knight;
mod pawn;
mod queen;
mod rook;
mod sliding;

pub mod attack;

pub use attack::{is_in_check, square_attacked_by};

use crate::board::{Board, Square};
use crate::types::{CastlingRights, Color, Piece, PieceKind};

/// Geometry-and-occupancy test for a single candidate move.
///
/// Rejects null moves and own-piece destinations before dispatching to the
/// piece-specific rule.
pub fn is_pseudo_legal(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    rights: &CastlingRights,
    en_passant: Option<Square>,
) -> bool {
    // Can't move to the same square
    if from == to {
        return false;
    }

    // Can't capture your own pieces
    if let Some(target) = board.piece_at(to) {
        if target.color == piece.color {
            return false;
        }
    }

    match piece.kind {
        PieceKind::Pawn => pawn::pawn_move_valid(board, piece.color, from, to, en_passant),
        PieceKind::Knight => knight::knight_move_valid(from, to),
        PieceKind::Bishop => bishop::bishop_move_valid(board, from, to),
        PieceKind::Rook => rook::rook_move_valid(board, from, to),
        PieceKind::Queen => queen::queen_move_valid(board, from, to),
        PieceKind::King => king::king_move_valid(board, piece.color, from, to, rights),
    }
}

/// All pseudo-legal destination squares for the piece on `from`.
pub fn pseudo_legal_targets(
    board: &Board,
    piece: Piece,
    from: Square,
    rights: &CastlingRights,
    en_passant: Option<Square>,
) -> Vec<Square> {
    (0..64)
        .filter_map(Square::from_index)
        .filter(|&to| is_pseudo_legal(board, piece, from, to, rights, en_passant))
        .collect()
}
