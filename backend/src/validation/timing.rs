//! Game-duration plausibility
//!
//! Works from the game's wall-clock span, not per-move times (those belong
//! to anti-cheat). A timeout result with no winner on record is the one
//! fatal case: the escrow cannot be settled without knowing whose clock
//! fell.

use super::{ValidationResult, ValidationStatus, ValidationType};
use serde_json::json;
use shared::{GameRecord, GameResult, MoveRecord};

/// Finished-in-under-this is implausible for anything but a resignation.
pub const MIN_PLAUSIBLE_DURATION_SECS: i64 = 10;
/// A game running past this multiple of its time limit is suspect.
pub const DURATION_LIMIT_FACTOR: i64 = 4;

pub fn validate(game: &GameRecord, _moves: &[MoveRecord]) -> ValidationResult {
    let duration = (game.finished_at - game.started_at).num_seconds();
    let mut issues: Vec<&'static str> = Vec::new();
    let mut status = ValidationStatus::Passed;
    let mut score = 100.0_f64;

    if duration < 0 {
        issues.push("negative_duration");
        status = status.max(ValidationStatus::Warning);
        score -= 20.0;
    }

    if game.time_limit_seconds > 0 && duration > DURATION_LIMIT_FACTOR * game.time_limit_seconds {
        issues.push("game_duration_too_long");
        status = status.max(ValidationStatus::Warning);
        score -= 20.0;
    }

    if (0..MIN_PLAUSIBLE_DURATION_SECS).contains(&duration)
        && game.result() != Some(GameResult::Resignation)
    {
        issues.push("game_duration_too_short");
        status = status.max(ValidationStatus::Warning);
        score -= 25.0;
    }

    if game.result() == Some(GameResult::Timeout) && game.winner.is_none() {
        issues.push("timeout_without_winner");
        status = ValidationStatus::Failed;
        score = 0.0;
    }

    ValidationResult::new(
        ValidationType::Timing,
        status,
        score,
        json!({
            "duration_seconds": duration,
            "time_limit_seconds": game.time_limit_seconds,
            "issues": issues,
        }),
    )
}
