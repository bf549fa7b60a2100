//! Move-replay validation
//!
//! Reconstructs the whole game from the standard starting position using
//! only the rules engine and the persisted move list. An illegal recorded
//! move is logged and scored but never applied — replay continues against
//! the engine's own still-consistent state, so every later defect is also
//! individually visible. Captures and castle/en-passant effects are
//! re-derived from the reconstructed board rather than trusted from the
//! record.

use super::{ValidationResult, ValidationStatus, ValidationType};
use chess_engine::{
    apply_move, is_legal_move, is_pseudo_legal, legal_moves, new_game, GameState, Move,
};
use serde_json::json;
use shared::{GameRecord, MoveRecord, Winner};

/// Score deduction per illegal recorded move (floored at 0).
pub const ILLEGAL_MOVE_PENALTY: f64 = 20.0;
/// Deduction when the engine-derived winner disagrees with the record.
pub const WINNER_MISMATCH_PENALTY: f64 = 30.0;
/// The mismatch deduction never drags the score below this.
pub const WINNER_MISMATCH_FLOOR: f64 = 50.0;

pub fn validate(game: &GameRecord, moves: &[MoveRecord]) -> ValidationResult {
    let mut state = new_game();
    let mut score = 100.0_f64;
    let mut invalid_moves = Vec::new();
    let mut applied = 0usize;

    for record in moves {
        if is_legal_move(&state, record.from, record.to, record.piece) {
            let mv = reconstruct(&state, record);
            state = apply_move(&state, &mv);
            applied += 1;
        } else {
            invalid_moves.push(json!({
                "move_number": record.move_number,
                "from": record.from.to_string(),
                "to": record.to.to_string(),
                "piece": record.piece.to_string(),
                "reason": rejection_reason(&state, record),
            }));
            score = (score - ILLEGAL_MOVE_PENALTY).max(0.0);
        }
    }

    let expected = expected_winner(&state);
    let recorded = game.winner();

    let mut status = if invalid_moves.is_empty() {
        ValidationStatus::Passed
    } else {
        ValidationStatus::Failed
    };

    let mut winner_mismatch = false;
    if let Some(expected) = expected {
        if recorded != Some(expected) {
            winner_mismatch = true;
            if status == ValidationStatus::Passed {
                status = ValidationStatus::Warning;
            }
            score = (score - WINNER_MISMATCH_PENALTY).max(WINNER_MISMATCH_FLOOR);
        }
    }

    ValidationResult::new(
        ValidationType::MoveReplay,
        status,
        score,
        json!({
            "total_moves": moves.len(),
            "moves_applied": applied,
            "invalid_moves": invalid_moves,
            "expected_winner": expected.map(Winner::as_str),
            "recorded_winner": game.winner.clone(),
            "winner_mismatch": winner_mismatch,
            "final_position": state.to_fen(),
        }),
    )
}

/// Pick the generated move matching the record's from/to so captures and
/// castle/en-passant side effects come from the reconstructed board, keeping
/// only the recorded promotion choice.
fn reconstruct(state: &GameState, record: &MoveRecord) -> Move {
    legal_moves(state)
        .into_iter()
        .find(|m| m.from == record.from && m.to == record.to)
        .map(|mut m| {
            if m.promotion.is_some() && record.promotion.is_some() {
                m.promotion = record.promotion;
            }
            m
        })
        .unwrap_or_else(|| record.to_engine_move())
}

fn rejection_reason(state: &GameState, record: &MoveRecord) -> String {
    match state.board.piece_at(record.from) {
        None => format!("no piece on {}", record.from),
        Some(found) if found != record.piece => format!(
            "recorded piece {} but board holds {} on {}",
            record.piece, found, record.from
        ),
        Some(_) if record.piece.color != state.current_player => {
            format!("{} moved out of turn", record.piece.color)
        }
        Some(_)
            if !is_pseudo_legal(
                &state.board,
                record.piece,
                record.from,
                record.to,
                &state.castling_rights,
                state.en_passant_target,
            ) =>
        {
            format!(
                "{} cannot reach {} from {}",
                record.piece, record.to, record.from
            )
        }
        Some(_) => "move leaves own king in check".to_string(),
    }
}

/// Winner implied by the engine's terminal flags, if the replayed game
/// actually ended on the board. Resignations and timeouts end off the board,
/// so they produce no expectation.
fn expected_winner(state: &GameState) -> Option<Winner> {
    if state.in_checkmate {
        return Some(Winner::from_color(state.current_player.opponent()));
    }
    if state.in_stalemate || state.draw {
        return Some(Winner::Draw);
    }
    None
}
