//! Anti-cheat timing heuristics
//!
//! Two signals, both computed from recorded per-move think times:
//!
//! - a high fraction of near-instant moves across the whole game (engine
//!   assistance rarely pauses to think);
//! - an alternating fast/slow rhythm over the final stretch, the signature
//!   of a player consulting an engine only on their own critical moves.
//!
//! Heuristics warn and feed the risk level; they never fail a game on their
//! own — that judgment stays with the human-review queue.

use super::{ValidationResult, ValidationStatus, ValidationType};
use serde_json::json;
use shared::{GameRecord, MoveRecord};

/// A move under this think time counts as near-instant.
pub const FAST_MOVE_THRESHOLD_MS: i64 = 100;
/// Fraction of near-instant moves above which the game is flagged.
pub const FAST_MOVE_RATIO_LIMIT: f64 = 0.30;
/// How many trailing moves the rhythm scan looks at.
pub const PATTERN_WINDOW: usize = 20;
/// "Fast" bound for the rhythm scan.
pub const PATTERN_FAST_MS: i64 = 200;
/// "Slow" bound for the rhythm scan.
pub const PATTERN_SLOW_MS: i64 = 2000;
/// More adjacent fast/slow swings than this raises risk to high.
pub const PATTERN_TRANSITION_LIMIT: usize = 5;

pub fn validate(_game: &GameRecord, moves: &[MoveRecord]) -> ValidationResult {
    let mut flags: Vec<(&'static str, &'static str)> = Vec::new();
    let mut score = 100.0_f64;

    let total = moves.len();
    let fast = moves
        .iter()
        .filter(|m| m.time_spent_ms < FAST_MOVE_THRESHOLD_MS)
        .count();
    let fast_ratio = if total == 0 {
        0.0
    } else {
        fast as f64 / total as f64
    };
    if total > 0 && fast_ratio > FAST_MOVE_RATIO_LIMIT {
        flags.push(("excessive_fast_moves", "medium"));
        score -= 30.0;
    }

    let window = &moves[total.saturating_sub(PATTERN_WINDOW)..];
    let transitions = window
        .windows(2)
        .filter(|pair| {
            let a = pair[0].time_spent_ms;
            let b = pair[1].time_spent_ms;
            (a < PATTERN_FAST_MS && b > PATTERN_SLOW_MS)
                || (a > PATTERN_SLOW_MS && b < PATTERN_FAST_MS)
        })
        .count();
    if transitions > PATTERN_TRANSITION_LIMIT {
        flags.push(("alternating_move_times", "high"));
        score -= 40.0;
    }

    let any_high = flags.iter().any(|(_, severity)| *severity == "high");
    let risk_level = if any_high || flags.len() >= 3 {
        "high"
    } else if !flags.is_empty() {
        "medium"
    } else {
        "low"
    };

    let status = if flags.is_empty() {
        ValidationStatus::Passed
    } else {
        ValidationStatus::Warning
    };

    ValidationResult::new(
        ValidationType::AntiCheat,
        status,
        score,
        json!({
            "flags": flags
                .iter()
                .map(|(code, severity)| json!({"code": code, "severity": severity}))
                .collect::<Vec<_>>(),
            "risk_level": risk_level,
            "fast_move_ratio": fast_ratio,
            "rapid_transitions": transitions,
        }),
    )
}
