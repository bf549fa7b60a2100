//! Position and record integrity
//!
//! Shape checks only: the stored final FEN must look like a FEN, the PGN
//! (when present) must tokenize as moves, and the recorded move count must
//! agree with the stored move rows. Semantic correctness of the position is
//! the replay validator's job; a shape defect here alone is never fatal.

use super::{ValidationResult, ValidationStatus, ValidationType};
use regex::Regex;
use serde_json::json;
use shared::{GameRecord, MoveRecord};
use std::sync::OnceLock;

fn fen_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^([pnbrqkPNBRQK1-8]{1,8}/){7}[pnbrqkPNBRQK1-8]{1,8} [wb] (-|K?Q?k?q?) (-|[a-h][36])( \d+ \d+)?$",
        )
        .expect("FEN pattern compiles")
    })
}

fn pgn_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(\d+\.(\.\.)?|[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](=[QRBN])?[+#]?|O-O(-O)?[+#]?|1-0|0-1|1/2-1/2|\*)$",
        )
        .expect("PGN token pattern compiles")
    })
}

pub fn validate(game: &GameRecord, moves: &[MoveRecord]) -> ValidationResult {
    let mut issues: Vec<String> = Vec::new();
    let mut status = ValidationStatus::Passed;
    let mut score = 100.0_f64;

    if !fen_pattern().is_match(&game.final_position_fen) {
        issues.push("malformed_fen".to_string());
        status = status.max(ValidationStatus::Warning);
        score -= 20.0;
    }

    if let Some(pgn) = &game.pgn {
        if let Some(token) = pgn
            .split_whitespace()
            .find(|token| !pgn_token_pattern().is_match(token))
        {
            issues.push(format!("malformed_pgn: bad token '{}'", token));
            status = status.max(ValidationStatus::Warning);
            score -= 15.0;
        }
    }

    if game.move_count != moves.len() as i64 {
        issues.push(format!(
            "move_count_mismatch: recorded {} stored {}",
            game.move_count,
            moves.len()
        ));
        status = status.max(ValidationStatus::Warning);
        score -= 15.0;
    }

    ValidationResult::new(
        ValidationType::PositionIntegrity,
        status,
        score,
        json!({
            "issues": issues,
            "recorded_move_count": game.move_count,
            "stored_move_count": moves.len(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::fixtures::{fools_mate_game, fools_mate_moves};

    #[test]
    fn test_consistent_record_passes() {
        let game = fools_mate_game();
        let moves = fools_mate_moves(game.id);
        let result = validate(&game, &moves);
        assert_eq!(result.status, ValidationStatus::Passed);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_fen_shapes() {
        let valid = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            "8/8/8/8/4K3/8/8/k7 b - -",
            "4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 12",
        ];
        for fen in valid {
            assert!(fen_pattern().is_match(fen), "should accept {}", fen);
        }

        let invalid = [
            "",
            "not a fen at all",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1", // 7 ranks
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1", // bad side
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1", // bad ep
        ];
        for fen in invalid {
            assert!(!fen_pattern().is_match(fen), "should reject {}", fen);
        }
    }

    #[test]
    fn test_malformed_fen_warns() {
        let game = fools_mate_game();
        let moves = fools_mate_moves(game.id);
        let mut game = game;
        game.final_position_fen = "garbage".to_string();

        let result = validate(&game, &moves);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.score, 80.0);
        assert!(result.details["issues"][0]
            .as_str()
            .unwrap()
            .contains("malformed_fen"));
    }

    #[test]
    fn test_pgn_tokens() {
        for token in ["1.", "e4", "Nf3", "exd5", "Qh4#", "O-O", "O-O-O", "a8=Q", "0-1"] {
            assert!(
                pgn_token_pattern().is_match(token),
                "should accept token {}",
                token
            );
        }
        for token in ["e9", "hello!", "Z3", "4x4"] {
            assert!(
                !pgn_token_pattern().is_match(token),
                "should reject token {}",
                token
            );
        }
    }

    #[test]
    fn test_malformed_pgn_warns() {
        let game = fools_mate_game();
        let moves = fools_mate_moves(game.id);
        let mut game = game;
        game.pgn = Some("1. e4 lol_what 2. Nf3".to_string());

        let result = validate(&game, &moves);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(result.details["issues"][0]
            .as_str()
            .unwrap()
            .contains("malformed_pgn"));
    }

    #[test]
    fn test_missing_pgn_is_fine() {
        let mut game = fools_mate_game();
        game.pgn = None;
        let moves = fools_mate_moves(game.id);
        let result = validate(&game, &moves);
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn test_move_count_mismatch_warns() {
        let mut game = fools_mate_game();
        game.move_count = 40;
        let moves = fools_mate_moves(game.id);

        let result = validate(&game, &moves);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.details["recorded_move_count"], 40);
        assert_eq!(result.details["stored_move_count"], 4);
    }
}
