//! Game lifecycle: creation and move application
//!
//! `apply_move` is the only way a `GameState` advances. It takes the current
//! state by reference and returns a new value, so replay and simulation can
//! never corrupt a caller's state by forgetting to restore something.

use super::state;
use crate::board::Square;
use crate::move_gen::is_in_check;
use crate::types::{CastlingRights, Color, GameState, Move, Piece, PieceKind};

/// A fresh game at the standard starting position, White to move.
pub fn new_game() -> GameState {
    let mut state = GameState {
        board: crate::board::Board::starting_position(),
        current_player: Color::White,
        castling_rights: CastlingRights::initial(),
        en_passant_target: None,
        halfmove_clock: 0,
        fullmove_number: 1,
        move_history: Vec::new(),
        in_check: false,
        in_checkmate: false,
        in_stalemate: false,
        draw: false,
    };
    refresh_terminal_flags(&mut state);
    state
}

/// Apply a move and return the resulting state.
///
/// The move is assumed legal (validate with [`super::is_legal_move`] first).
/// Handles the piece relocation, capture removal, en-passant pawn removal,
/// castling rook hop, promotion, clock/right bookkeeping, and recomputes the
/// terminal flags for the side now to move.
pub fn apply_move(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();

    // En passant removes the bypassed pawn, not the destination square
    if mv.is_en_passant {
        if let Some(bypassed) = Square::new(mv.to.file(), mv.from.rank()) {
            next.board.set(bypassed, None);
        }
    }

    next.board.set(mv.from, None);
    let placed = match mv.promotion {
        Some(kind) => Piece::new(mv.piece.color, kind),
        None => mv.piece,
    };
    next.board.set(mv.to, Some(placed));

    if mv.is_castle {
        relocate_castle_rook(&mut next, mv);
    }

    if mv.piece.kind == PieceKind::King {
        next.castling_rights.revoke_all(mv.piece.color);
    }
    // A rook leaving its corner, or being captured on it, drops that right
    next.castling_rights.revoke_for_square(mv.from);
    next.castling_rights.revoke_for_square(mv.to);

    next.en_passant_target = double_push_target(mv);

    if mv.piece.kind == PieceKind::Pawn || mv.captured.is_some() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if mv.piece.color == Color::Black {
        next.fullmove_number += 1;
    }

    next.move_history.push(*mv);
    next.current_player = state.current_player.opponent();

    refresh_terminal_flags(&mut next);
    next
}

fn relocate_castle_rook(state: &mut GameState, mv: &Move) {
    let rank = mv.from.rank();
    let (rook_from, rook_to) = if mv.to.file() == 6 {
        (Square::new(7, rank), Square::new(5, rank))
    } else {
        (Square::new(0, rank), Square::new(3, rank))
    };
    if let (Some(from), Some(to)) = (rook_from, rook_to) {
        let rook = state.board.piece_at(from);
        state.board.set(from, None);
        state.board.set(to, rook);
    }
}

fn double_push_target(mv: &Move) -> Option<Square> {
    if mv.piece.kind != PieceKind::Pawn {
        return None;
    }
    if (mv.to.rank() as i8 - mv.from.rank() as i8).abs() != 2 {
        return None;
    }
    Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
}

fn refresh_terminal_flags(state: &mut GameState) {
    state.in_check = is_in_check(&state.board, state.current_player);
    let has_reply = state::has_any_legal_move(state);
    state.in_checkmate = state.in_check && !has_reply;
    state.in_stalemate = !state.in_check && !has_reply;
    state.draw = state.in_stalemate;
}
