//! Move legality and legal-move generation
//!
//! Legality is the two-pass structure: pseudo-legal geometry first, then a
//! simulation pass that discards anything leaving the mover's own king in
//! check. Every predicate here fails closed — a malformed or mismatched
//! input is simply an illegal move, never a panic.

use crate::board::Square;
use crate::move_gen::{is_in_check, is_pseudo_legal, pseudo_legal_targets};
use crate::types::{GameState, Move, Piece, PieceKind};

/// Check whether moving `piece` from `from` to `to` is legal for the side to
/// move.
///
/// Fails closed unless:
/// - the board actually holds `piece` on `from`;
/// - `piece` belongs to `current_player`;
/// - the piece's geometry rule permits the move under current occupancy;
/// - the move does not leave the mover's own king in check.
pub fn is_legal_move(state: &GameState, from: Square, to: Square, piece: Piece) -> bool {
    match state.board.piece_at(from) {
        Some(found) if found == piece => {}
        _ => return false,
    }

    if piece.color != state.current_player {
        return false;
    }

    if !is_pseudo_legal(
        &state.board,
        piece,
        from,
        to,
        &state.castling_rights,
        state.en_passant_target,
    ) {
        return false;
    }

    king_safe_after(state, piece, from, to)
}

/// All legal moves for the side to move.
///
/// Pseudo-legal candidates per piece, then the king-safety simulation pass.
/// Generated moves carry derived capture/castle/en-passant/promotion
/// annotations so they can be fed straight into [`super::apply_move`].
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in state.board.pieces() {
        if piece.color != state.current_player {
            continue;
        }
        for to in pseudo_legal_targets(
            &state.board,
            piece,
            from,
            &state.castling_rights,
            state.en_passant_target,
        ) {
            if king_safe_after(state, piece, from, to) {
                moves.push(annotate(state, piece, from, to));
            }
        }
    }
    moves
}

/// Simulate the move on a board copy and test whether the mover's king
/// survives. The copy includes en-passant pawn removal; the original state is
/// never touched.
pub(super) fn king_safe_after(state: &GameState, piece: Piece, from: Square, to: Square) -> bool {
    let mut board = state.board.with_move(from, to);
    if piece.kind == PieceKind::Pawn
        && state.en_passant_target == Some(to)
        && from.file() != to.file()
    {
        if let Some(bypassed) = Square::new(to.file(), from.rank()) {
            board.set(bypassed, None);
        }
    }
    !is_in_check(&board, piece.color)
}

fn annotate(state: &GameState, piece: Piece, from: Square, to: Square) -> Move {
    let is_en_passant =
        piece.kind == PieceKind::Pawn && from.file() != to.file() && state.board.is_empty(to);
    let captured = if is_en_passant {
        Square::new(to.file(), from.rank()).and_then(|sq| state.board.piece_at(sq))
    } else {
        state.board.piece_at(to)
    };
    let is_castle =
        piece.kind == PieceKind::King && (to.file() as i8 - from.file() as i8).abs() == 2;
    let promotion = (piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank())
        .then_some(PieceKind::Queen);

    Move {
        from,
        to,
        piece,
        captured,
        promotion,
        is_castle,
        is_en_passant,
    }
}
