//! Terminal-state queries
//!
//! Checkmate and stalemate are both "no legal replies"; the in-check bit is
//! what separates them. `has_any_legal_move` exists separately from
//! [`super::legal_moves`] so terminal detection can bail out on the first
//! surviving candidate instead of materializing the full move list.

use super::moves::king_safe_after;
use crate::move_gen::{is_in_check, pseudo_legal_targets};
use crate::types::GameState;

/// Game status from the perspective of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Checkmate,
    Stalemate,
}

/// True if the side to move has at least one legal reply.
pub fn has_any_legal_move(state: &GameState) -> bool {
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
                return true;
            }
        }
    }
    false
}

/// Classify the position for the side to move.
pub fn game_status(state: &GameState) -> GameStatus {
    if has_any_legal_move(state) {
        return GameStatus::Playing;
    }
    if is_in_check(&state.board, state.current_player) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}
