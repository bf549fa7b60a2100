//! Payout authorization
//!
//! The single gate between a finished game and release of escrowed funds.
//! Per game the state machine is:
//!
//! ```text
//! pending -> {passed|warning|failed}   (validation outcome)
//!         -> {approved|rejected|human_review}
//! ```
//!
//! `approved` and `rejected` are terminal. `human_review` is suspended until
//! an external reviewer acts; nothing here resolves it automatically. A
//! second authorization call for an already-approved game returns the stored
//! decision unchanged — at most one payout per game, enforced together with
//! the storage layer's unique constraint and transactional finalize.
//!
//! Storage failures anywhere in the sequence are caught, logged, and
//! surfaced as a `validation_error` rejection. They never become an implicit
//! approval, and they leave no partial payout state, so the caller may
//! safely retry.

use crate::error::PayoutError;
use crate::storage::Store;
use crate::validation::{self, ValidationStatus, ValidationType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{GameLifecycle, GameRecord, GameResult};
use std::collections::BTreeMap;
use tracing::{error, info, warn};
use uuid::Uuid;

pub use crate::validation::financial::PLATFORM_FEE_RATE;

/// Mean validator score below which payout is rejected outright.
pub const READINESS_MIN_SCORE: f64 = 70.0;
/// Mean validator score below which a human signs off instead of the system.
pub const AUTO_APPROVE_MIN_SCORE: f64 = 85.0;
/// Pots larger than this (stake units) always go to human review.
pub const HUMAN_REVIEW_POT_LIMIT: f64 = 10.0;
/// Recorded as the approver on auto-approved payouts.
pub const SYSTEM_AUTO_APPROVER: &str = "system_auto_approval";

/// Payout decision lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Rejected,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Rejected => "rejected",
        }
    }

    pub fn parse(input: &str) -> Option<PayoutStatus> {
        match input {
            "pending" => Some(PayoutStatus::Pending),
            "approved" => Some(PayoutStatus::Approved),
            "rejected" => Some(PayoutStatus::Rejected),
            _ => None,
        }
    }
}

/// Why an authorization attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    GameNotFinished,
    GameValidationFailed,
    LowConfidenceScore,
    ValidationError,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::GameNotFinished => "game_not_finished",
            RejectReason::GameValidationFailed => "game_validation_failed",
            RejectReason::LowConfidenceScore => "low_confidence_score",
            RejectReason::ValidationError => "validation_error",
        }
    }
}

/// The derived distribution for one game. Never persisted on its own — it is
/// embedded into the payout validation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutCalculation {
    pub stake_amount: f64,
    pub total_pot: f64,
    pub platform_fee: f64,
    pub net_pot: f64,
    pub winner_wallet: Option<String>,
    pub winner_amount: Option<f64>,
    pub payouts: BTreeMap<String, f64>,
}

/// The persisted payout decision row for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutValidation {
    pub game_id: Uuid,
    pub escrow_account: String,
    pub winner_wallet: Option<String>,
    pub stake_amount: f64,
    pub platform_fee: f64,
    pub status: PayoutStatus,
    pub score: f64,
    pub risk_factors: Vec<String>,
    pub human_review_required: bool,
    pub approved_by: Option<String>,
    pub payout_tx_id: Option<String>,
    pub payouts: BTreeMap<String, f64>,
}

/// Outcome returned to the caller. The caller executes `Approved`
/// distributions against the escrow; everything else releases nothing.
#[derive(Debug, Clone)]
pub enum PayoutDecision {
    Approved(PayoutValidation),
    Rejected {
        reason: RejectReason,
        detail: Option<String>,
    },
    HumanReview(PayoutValidation),
}

/// Compute the distribution for a finished game by result type.
///
/// - checkmate/resignation/timeout: winner takes the net pot, loser takes
///   nothing; a missing winner is a hard error.
/// - stalemate/agreement: net pot split evenly.
/// - abandoned: both stakes refunded, fee waived.
pub fn calculate_payout(game: &GameRecord) -> Result<PayoutCalculation, PayoutError> {
    let result = game
        .result()
        .ok_or_else(|| PayoutError::UnrecognizedResult {
            result: game.game_result.clone(),
        })?;

    let stake = game.stake_amount;
    let total_pot = stake * 2.0;
    let mut payouts = BTreeMap::new();

    let calculation = if result.is_decisive() {
        let winner_wallet =
            game.winner_wallet()
                .map(str::to_string)
                .ok_or_else(|| PayoutError::MissingWinner {
                    result: result.as_str().to_string(),
                })?;
        let loser_wallet = if winner_wallet == game.player_white_wallet {
            game.player_black_wallet.clone()
        } else {
            game.player_white_wallet.clone()
        };
        let platform_fee = total_pot * PLATFORM_FEE_RATE;
        let net_pot = total_pot - platform_fee;
        // Loser first: if both players somehow share a wallet, the winner's
        // entry must be the one that survives
        payouts.insert(loser_wallet, 0.0);
        payouts.insert(winner_wallet.clone(), net_pot);
        PayoutCalculation {
            stake_amount: stake,
            total_pot,
            platform_fee,
            net_pot,
            winner_wallet: Some(winner_wallet),
            winner_amount: Some(net_pot),
            payouts,
        }
    } else if result.is_draw() {
        let platform_fee = total_pot * PLATFORM_FEE_RATE;
        let net_pot = total_pot - platform_fee;
        let half = net_pot / 2.0;
        payouts.insert(game.player_white_wallet.clone(), half);
        payouts.insert(game.player_black_wallet.clone(), half);
        PayoutCalculation {
            stake_amount: stake,
            total_pot,
            platform_fee,
            net_pot,
            winner_wallet: None,
            winner_amount: None,
            payouts,
        }
    } else {
        // Abandoned: refund both stakes, waive the fee
        debug_assert_eq!(result, GameResult::Abandoned);
        payouts.insert(game.player_white_wallet.clone(), stake);
        payouts.insert(game.player_black_wallet.clone(), stake);
        PayoutCalculation {
            stake_amount: stake,
            total_pot,
            platform_fee: 0.0,
            net_pot: total_pot,
            winner_wallet: None,
            winner_amount: None,
            payouts,
        }
    };

    Ok(calculation)
}

/// Authorize (or refuse) the payout for a finished game.
///
/// This is the wrapper that enforces the failure contract: any internal
/// error is logged and surfaced as a `validation_error` rejection.
pub async fn authorize_payout(store: &Store, game_id: Uuid) -> PayoutDecision {
    match authorize_inner(store, game_id).await {
        Ok(decision) => decision,
        Err(err) => {
            error!(%game_id, error = %err, "payout authorization aborted");
            PayoutDecision::Rejected {
                reason: RejectReason::ValidationError,
                detail: Some(err.to_string()),
            }
        }
    }
}

async fn authorize_inner(store: &Store, game_id: Uuid) -> Result<PayoutDecision, PayoutError> {
    let game = store
        .fetch_game(game_id)
        .await?
        .ok_or(PayoutError::GameNotFound(game_id))?;

    if game.lifecycle() != Some(GameLifecycle::Finished) {
        info!(%game_id, state = %game.state, "payout refused: game not finished");
        return Ok(PayoutDecision::Rejected {
            reason: RejectReason::GameNotFinished,
            detail: Some(format!("game state is '{}'", game.state)),
        });
    }

    // Idempotent short-circuit: an approved payout is never recomputed
    if let Some(existing) = store.fetch_payout_validation(game_id).await? {
        if existing.status == PayoutStatus::Approved {
            info!(%game_id, "payout already approved, returning stored decision");
            return Ok(PayoutDecision::Approved(existing));
        }
    }

    let moves = store.fetch_moves(game_id).await?;
    let results = validation::run_all(&game, &moves);
    for result in &results {
        store.upsert_validation(game_id, result).await?;
    }

    let overall = validation::overall_status(&results);
    let score = validation::readiness_score(&results);

    if overall == ValidationStatus::Failed {
        let failed: Vec<String> = results
            .iter()
            .filter(|r| r.status == ValidationStatus::Failed)
            .map(|r| format!("validator_failed:{}", r.validation_type.as_str()))
            .collect();
        warn!(%game_id, score, failed = ?failed, "payout rejected: validation failed");
        let row = decision_row(&game, score, PayoutStatus::Rejected, failed, false, None);
        store.save_payout_validation(&row).await?;
        return Ok(PayoutDecision::Rejected {
            reason: RejectReason::GameValidationFailed,
            detail: None,
        });
    }

    if !validation::is_payout_ready(&results) || score < READINESS_MIN_SCORE {
        warn!(%game_id, score, "payout rejected: low confidence");
        let row = decision_row(
            &game,
            score,
            PayoutStatus::Rejected,
            vec![format!("readiness_score:{score:.1}")],
            false,
            None,
        );
        store.save_payout_validation(&row).await?;
        return Ok(PayoutDecision::Rejected {
            reason: RejectReason::LowConfidenceScore,
            detail: Some(format!("readiness score {score:.1}")),
        });
    }

    let calculation = calculate_payout(&game)?;
    let triggers = human_review_triggers(&results, &calculation, score);

    if !triggers.is_empty() {
        warn!(%game_id, score, triggers = ?triggers, "payout escalated to human review");
        let row = decision_row(
            &game,
            score,
            PayoutStatus::Pending,
            triggers,
            true,
            Some(&calculation),
        );
        let stored = store.save_payout_validation(&row).await?;
        // A concurrent authorization may have already approved; honor it
        if stored.status == PayoutStatus::Approved {
            return Ok(PayoutDecision::Approved(stored));
        }
        return Ok(PayoutDecision::HumanReview(stored));
    }

    let mut row = decision_row(
        &game,
        score,
        PayoutStatus::Approved,
        Vec::new(),
        false,
        Some(&calculation),
    );
    row.approved_by = Some(SYSTEM_AUTO_APPROVER.to_string());
    let stored = store.save_payout_validation(&row).await?;
    info!(
        %game_id,
        score,
        payouts = %json!(stored.payouts),
        "payout auto-approved"
    );
    Ok(PayoutDecision::Approved(stored))
}

fn decision_row(
    game: &GameRecord,
    score: f64,
    status: PayoutStatus,
    risk_factors: Vec<String>,
    human_review_required: bool,
    calculation: Option<&PayoutCalculation>,
) -> PayoutValidation {
    PayoutValidation {
        game_id: game.id,
        escrow_account: format!("escrow:{}", game.room_id),
        winner_wallet: calculation
            .and_then(|c| c.winner_wallet.clone())
            .or_else(|| game.winner_wallet().map(str::to_string)),
        stake_amount: game.stake_amount,
        platform_fee: calculation.map(|c| c.platform_fee).unwrap_or(game.platform_fee),
        status,
        score,
        risk_factors,
        human_review_required,
        approved_by: None,
        payout_tx_id: None,
        payouts: calculation.map(|c| c.payouts.clone()).unwrap_or_default(),
    }
}

/// The auto-approval gate. Any trigger sends the payout to a human.
fn human_review_triggers(
    results: &[crate::validation::ValidationResult],
    calculation: &PayoutCalculation,
    score: f64,
) -> Vec<String> {
    let mut triggers = Vec::new();

    if calculation.total_pot > HUMAN_REVIEW_POT_LIMIT {
        triggers.push(format!(
            "pot_exceeds_auto_approval_limit:{}",
            calculation.total_pot
        ));
    }
    if score < AUTO_APPROVE_MIN_SCORE {
        triggers.push(format!("score_below_auto_approval_threshold:{score:.1}"));
    }
    for result in results {
        if result.status == ValidationStatus::Warning {
            triggers.push(format!("validator_warning:{}", result.validation_type.as_str()));
        }
    }
    if let Some(anti_cheat) = results
        .iter()
        .find(|r| r.validation_type == ValidationType::AntiCheat)
    {
        if anti_cheat.details["risk_level"] == "high" {
            triggers.push("high_cheat_risk".to_string());
        }
    }
    if let Some(timing) = results
        .iter()
        .find(|r| r.validation_type == ValidationType::Timing)
    {
        if timing.details["issues"]
            .as_array()
            .map(|issues| !issues.is_empty())
            .unwrap_or(false)
        {
            triggers.push("timing_issues_present".to_string());
        }
    }

    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::fixtures::{fools_mate_game, BLACK_WALLET, WHITE_WALLET};

    fn conservation_holds(calc: &PayoutCalculation) {
        let distributed: f64 = calc.payouts.values().sum();
        assert!(
            (distributed + calc.platform_fee - calc.total_pot).abs() < 1e-9,
            "payouts {} + fee {} != pot {}",
            distributed,
            calc.platform_fee,
            calc.total_pot
        );
    }

    #[test]
    fn test_decisive_payout_goes_to_winner() {
        let game = fools_mate_game(); // black wins by checkmate, stake 0.5
        let calc = calculate_payout(&game).unwrap();

        assert_eq!(calc.total_pot, 1.0);
        assert!((calc.platform_fee - 0.02).abs() < 1e-12);
        assert!((calc.net_pot - 0.98).abs() < 1e-12);
        assert_eq!(calc.winner_wallet.as_deref(), Some(BLACK_WALLET));
        assert_eq!(calc.payouts[BLACK_WALLET], calc.net_pot);
        assert_eq!(calc.payouts[WHITE_WALLET], 0.0);
        conservation_holds(&calc);
    }

    #[test]
    fn test_draw_splits_net_pot() {
        let mut game = fools_mate_game();
        game.game_result = "stalemate".to_string();
        game.winner = None;

        let calc = calculate_payout(&game).unwrap();

        assert_eq!(calc.winner_wallet, None);
        assert!((calc.payouts[WHITE_WALLET] - calc.net_pot / 2.0).abs() < 1e-12);
        assert_eq!(calc.payouts[WHITE_WALLET], calc.payouts[BLACK_WALLET]);
        conservation_holds(&calc);
    }

    #[test]
    fn test_abandoned_refunds_stakes_and_waives_fee() {
        let mut game = fools_mate_game();
        game.game_result = "abandoned".to_string();
        game.winner = None;

        let calc = calculate_payout(&game).unwrap();

        assert_eq!(calc.platform_fee, 0.0);
        assert_eq!(calc.payouts[WHITE_WALLET], game.stake_amount);
        assert_eq!(calc.payouts[BLACK_WALLET], game.stake_amount);
        conservation_holds(&calc);
    }

    #[test]
    fn test_decisive_without_winner_is_hard_error() {
        let mut game = fools_mate_game();
        game.winner = None;
        assert!(matches!(
            calculate_payout(&game),
            Err(PayoutError::MissingWinner { .. })
        ));

        game.winner = Some("draw".to_string());
        assert!(
            matches!(
                calculate_payout(&game),
                Err(PayoutError::MissingWinner { .. })
            ),
            "A checkmate declared as a draw names no payable side"
        );
    }

    #[test]
    fn test_unrecognized_result_is_hard_error() {
        let mut game = fools_mate_game();
        game.game_result = "coin_flip".to_string();
        assert!(matches!(
            calculate_payout(&game),
            Err(PayoutError::UnrecognizedResult { .. })
        ));
    }

    #[test]
    fn test_conservation_across_stakes() {
        for stake in [0.001, 0.5, 1.0, 2.5, 100.0] {
            for result in ["checkmate", "resignation", "timeout", "stalemate", "agreement"] {
                let mut game = fools_mate_game();
                game.stake_amount = stake;
                game.platform_fee = stake * PLATFORM_FEE_RATE;
                game.game_result = result.to_string();
                game.winner = if GameResult::parse(result).unwrap().is_decisive() {
                    Some("white".to_string())
                } else {
                    None
                };
                let calc = calculate_payout(&game).unwrap();
                conservation_holds(&calc);
            }
        }
    }

    #[test]
    fn test_reject_reason_strings() {
        assert_eq!(RejectReason::GameNotFinished.as_str(), "game_not_finished");
        assert_eq!(
            RejectReason::GameValidationFailed.as_str(),
            "game_validation_failed"
        );
        assert_eq!(
            RejectReason::LowConfidenceScore.as_str(),
            "low_confidence_score"
        );
        assert_eq!(RejectReason::ValidationError.as_str(), "validation_error");
    }

    #[test]
    fn test_payout_status_roundtrip() {
        for status in [
            PayoutStatus::Pending,
            PayoutStatus::Approved,
            PayoutStatus::Rejected,
        ] {
            assert_eq!(PayoutStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PayoutStatus::parse("maybe"), None);
    }
}
