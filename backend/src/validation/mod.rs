//! Validation pipeline
//!
//! Five independent validators, each a pure function from
//! `(GameRecord, &[MoveRecord])` to a [`ValidationResult`]. None of them
//! depends on another, none touches storage, and none returns an error past
//! its own boundary — an internal problem becomes a `failed` result with
//! details, so a single validator can never take the pipeline down.
//!
//! ## Validator Organization
//!
//! - `replay` - replays the move list against the rules engine
//! - `financial` - fee arithmetic, result/winner consistency, stake range
//! - `anti_cheat` - move-timing heuristics (speed, alternating patterns)
//! - `timing` - game-duration plausibility
//! - `integrity` - FEN/PGN shape and move-count consistency

pub mod anti_cheat;
pub mod financial;
pub mod integrity;
pub mod replay;
pub mod timing;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{GameRecord, MoveRecord};

/// The five validation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    MoveReplay,
    FinancialSecurity,
    AntiCheat,
    Timing,
    PositionIntegrity,
}

impl ValidationType {
    pub const ALL: [ValidationType; 5] = [
        ValidationType::MoveReplay,
        ValidationType::FinancialSecurity,
        ValidationType::AntiCheat,
        ValidationType::Timing,
        ValidationType::PositionIntegrity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationType::MoveReplay => "move_replay",
            ValidationType::FinancialSecurity => "financial_security",
            ValidationType::AntiCheat => "anti_cheat",
            ValidationType::Timing => "timing",
            ValidationType::PositionIntegrity => "position_integrity",
        }
    }

    pub fn parse(input: &str) -> Option<ValidationType> {
        match input {
            "move_replay" => Some(ValidationType::MoveReplay),
            "financial_security" => Some(ValidationType::FinancialSecurity),
            "anti_cheat" => Some(ValidationType::AntiCheat),
            "timing" => Some(ValidationType::Timing),
            "position_integrity" => Some(ValidationType::PositionIntegrity),
            _ => None,
        }
    }
}

/// Validator verdict. Ordered so the pipeline's overall status is simply the
/// maximum across validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Warning,
    Failed,
}

impl ValidationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Passed => "passed",
            ValidationStatus::Warning => "warning",
            ValidationStatus::Failed => "failed",
        }
    }

    pub fn parse(input: &str) -> Option<ValidationStatus> {
        match input {
            "passed" => Some(ValidationStatus::Passed),
            "warning" => Some(ValidationStatus::Warning),
            "failed" => Some(ValidationStatus::Failed),
            _ => None,
        }
    }
}

/// One validator's verdict for one game. Upserted per
/// `(game_id, validation_type)`, so re-running is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validation_type: ValidationType,
    pub status: ValidationStatus,
    pub score: f64,
    pub details: Value,
}

impl ValidationResult {
    pub fn new(
        validation_type: ValidationType,
        status: ValidationStatus,
        score: f64,
        details: Value,
    ) -> ValidationResult {
        ValidationResult {
            validation_type,
            status,
            score: score.clamp(0.0, 100.0),
            details,
        }
    }
}

/// Run every validator. The result vector always contains all five types, in
/// `ValidationType::ALL` order.
pub fn run_all(game: &GameRecord, moves: &[MoveRecord]) -> Vec<ValidationResult> {
    vec![
        replay::validate(game, moves),
        financial::validate(game, moves),
        anti_cheat::validate(game, moves),
        timing::validate(game, moves),
        integrity::validate(game, moves),
    ]
}

/// Worst status across the set.
pub fn overall_status(results: &[ValidationResult]) -> ValidationStatus {
    results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(ValidationStatus::Failed)
}

/// Arithmetic mean of the scores; the payout readiness score.
pub fn readiness_score(results: &[ValidationResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
}

/// Payout-ready means every dimension reported and none failed.
pub fn is_payout_ready(results: &[ValidationResult]) -> bool {
    ValidationType::ALL.iter().all(|ty| {
        results
            .iter()
            .any(|r| r.validation_type == *ty && r.status != ValidationStatus::Failed)
    })
}
