//! Financial-security validation
//!
//! Recomputes the platform fee, checks result/winner consistency, bounds the
//! stake, and sanity-checks the wallet addresses. An unrecognized result
//! string or a drawn game carrying a winner is fatal to validation; fee
//! drift and wallet-shape problems only warn.

use super::{ValidationResult, ValidationStatus, ValidationType};
use serde_json::json;
use shared::{GameRecord, GameResult, MoveRecord, Winner};

/// Platform fee as a fraction of the total pot (2%).
pub const PLATFORM_FEE_RATE: f64 = 0.02;
/// Tolerated absolute drift between the recorded and recomputed fee.
pub const FEE_EPSILON: f64 = 1e-6;
/// Largest stake (in stake units) the platform settles automatically.
pub const MAX_STAKE: f64 = 1000.0;

pub fn validate(game: &GameRecord, _moves: &[MoveRecord]) -> ValidationResult {
    let mut issues: Vec<String> = Vec::new();
    let mut status = ValidationStatus::Passed;
    let mut score = 100.0_f64;

    let result = match game.result() {
        Some(result) => result,
        None => {
            return ValidationResult::new(
                ValidationType::FinancialSecurity,
                ValidationStatus::Failed,
                0.0,
                json!({
                    "issues": [format!("Unrecognized game result: {}", game.game_result)],
                    "stake_amount": game.stake_amount,
                }),
            );
        }
    };

    let expected_fee = game.stake_amount * PLATFORM_FEE_RATE;
    if (game.platform_fee - expected_fee).abs() > FEE_EPSILON {
        issues.push(format!(
            "platform fee mismatch: recorded {} expected {}",
            game.platform_fee, expected_fee
        ));
        status = status.max(ValidationStatus::Warning);
        score -= 15.0;
    }

    if (result.is_draw() || result == GameResult::Abandoned) && game.winner.is_some() {
        issues.push("Draw game should not have winner".to_string());
        status = ValidationStatus::Failed;
        score = 0.0;
    }

    if !(game.stake_amount > 0.0 && game.stake_amount <= MAX_STAKE) {
        issues.push(format!("stake amount out of range: {}", game.stake_amount));
        status = ValidationStatus::Failed;
        score = 0.0;
    }

    if result.is_decisive() && !matches!(game.winner(), Some(Winner::White | Winner::Black)) {
        issues.push(format!("decisive result {} without a winner", result.as_str()));
        status = status.max(ValidationStatus::Warning);
        score -= 15.0;
    }

    for (label, wallet) in [
        ("white", &game.player_white_wallet),
        ("black", &game.player_black_wallet),
    ] {
        if !wallet_well_formed(wallet) {
            issues.push(format!("{} wallet is not a valid address", label));
            status = status.max(ValidationStatus::Warning);
            score -= 10.0;
        }
    }
    if game.player_white_wallet == game.player_black_wallet {
        issues.push("both players share one wallet".to_string());
        status = status.max(ValidationStatus::Warning);
        score -= 10.0;
    }

    ValidationResult::new(
        ValidationType::FinancialSecurity,
        status,
        score,
        json!({
            "issues": issues,
            "expected_fee": expected_fee,
            "recorded_fee": game.platform_fee,
            "stake_amount": game.stake_amount,
        }),
    )
}

/// Wallets are base58-encoded 32-byte public keys.
fn wallet_well_formed(wallet: &str) -> bool {
    bs58::decode(wallet)
        .into_vec()
        .map(|bytes| bytes.len() == 32)
        .unwrap_or(false)
}
