//! Payout Authorization Integration Tests
//!
//! Drives the full pipeline — seeded game rows, replay against the rules
//! engine, heuristic validators, payout decision — over an in-memory SQLite
//! pool.

use backend::payout::{
    self, PayoutDecision, PayoutStatus, RejectReason, SYSTEM_AUTO_APPROVER,
};
use backend::storage::Store;
use backend::validation::ValidationType;
use chess_engine::{Color, Piece, PieceKind, Square};
use chrono::{Duration, TimeZone, Utc};
use shared::{GameRecord, MoveRecord};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

const WHITE_WALLET: &str = "11111111111111111111111111111111";
const BLACK_WALLET: &str = "So11111111111111111111111111111111111111112";

/// Helper to create a test database pool
async fn test_store() -> Store {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create test database");
    let store = Store::new(pool);
    store.init_schema().await.expect("Failed to init schema");
    store
}

fn fools_mate_game() -> GameRecord {
    let started = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    GameRecord {
        id: Uuid::new_v4(),
        room_id: "ROOM0001".to_string(),
        player_white_wallet: WHITE_WALLET.to_string(),
        player_black_wallet: BLACK_WALLET.to_string(),
        stake_amount: 0.5,
        platform_fee: 0.01,
        winner: Some("black".to_string()),
        game_result: "checkmate".to_string(),
        move_count: 4,
        final_position_fen: "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .to_string(),
        pgn: Some("1. f3 e5 2. g4 Qh4# 0-1".to_string()),
        time_limit_seconds: 600,
        started_at: started,
        finished_at: started + Duration::seconds(120),
        state: "finished".to_string(),
    }
}

fn move_record(
    game_id: Uuid,
    move_number: i64,
    from: &str,
    to: &str,
    piece: Piece,
    time_spent_ms: i64,
) -> MoveRecord {
    MoveRecord {
        game_id,
        move_number,
        from: Square::parse(from).unwrap(),
        to: Square::parse(to).unwrap(),
        piece,
        captured: None,
        promotion: None,
        is_check: false,
        is_checkmate: false,
        is_castle: false,
        is_en_passant: false,
        time_spent_ms,
    }
}

fn fools_mate_moves(game_id: Uuid) -> Vec<MoveRecord> {
    let white_pawn = Piece::new(Color::White, PieceKind::Pawn);
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    let black_queen = Piece::new(Color::Black, PieceKind::Queen);

    let mut mate = move_record(game_id, 4, "d8", "h4", black_queen, 2100);
    mate.is_check = true;
    mate.is_checkmate = true;

    vec![
        move_record(game_id, 1, "f2", "f3", white_pawn, 1500),
        move_record(game_id, 2, "e7", "e5", black_pawn, 1800),
        move_record(game_id, 3, "g2", "g4", white_pawn, 1200),
        mate,
    ]
}

async fn seed(store: &Store, game: &GameRecord, moves: &[MoveRecord]) {
    store.insert_game(game).await.expect("insert game");
    for record in moves {
        store.insert_move(record).await.expect("insert move");
    }
}

#[tokio::test]
async fn test_honest_checkmate_auto_approves() {
    let store = test_store().await;
    let game = fools_mate_game();
    seed(&store, &game, &fools_mate_moves(game.id)).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    let validation = match decision {
        PayoutDecision::Approved(v) => v,
        other => panic!("expected approval, got {:?}", other),
    };
    assert_eq!(validation.status, PayoutStatus::Approved);
    assert_eq!(validation.approved_by.as_deref(), Some(SYSTEM_AUTO_APPROVER));
    assert_eq!(validation.winner_wallet.as_deref(), Some(BLACK_WALLET));

    // Winner takes the net pot: 1.0 pot less 2% fee
    assert!((validation.payouts[BLACK_WALLET] - 0.98).abs() < 1e-9);
    assert_eq!(validation.payouts[WHITE_WALLET], 0.0);

    // All five validator rows persisted
    let results = store.fetch_validations(game.id).await.unwrap();
    assert_eq!(results.len(), 5);
    for ty in ValidationType::ALL {
        assert!(
            results.iter().any(|r| r.validation_type == ty),
            "missing validator row for {:?}",
            ty
        );
    }
}

#[tokio::test]
async fn test_approval_is_idempotent() {
    let store = test_store().await;
    let game = fools_mate_game();
    seed(&store, &game, &fools_mate_moves(game.id)).await;

    let first = match payout::authorize_payout(&store, game.id).await {
        PayoutDecision::Approved(v) => v,
        other => panic!("expected approval, got {:?}", other),
    };
    let second = match payout::authorize_payout(&store, game.id).await {
        PayoutDecision::Approved(v) => v,
        other => panic!("expected stored approval, got {:?}", other),
    };

    assert_eq!(first.payouts, second.payouts);
    assert_eq!(first.approved_by, second.approved_by);
    assert_eq!(first.score, second.score);

    let stored = store
        .fetch_payout_validation(game.id)
        .await
        .unwrap()
        .expect("payout row exists");
    assert_eq!(stored.status, PayoutStatus::Approved);
}

#[tokio::test]
async fn test_illegal_move_rejects_payout() {
    let store = test_store().await;
    let game = fools_mate_game();
    let mut moves = fools_mate_moves(game.id);
    // Queen push blocked by its own pawn: geometrically illegal
    moves[3] = move_record(
        game.id,
        4,
        "d8",
        "d4",
        Piece::new(Color::Black, PieceKind::Queen),
        1500,
    );
    seed(&store, &game, &moves).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    match decision {
        PayoutDecision::Rejected { reason, .. } => {
            assert_eq!(reason, RejectReason::GameValidationFailed)
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    let replay = store
        .fetch_validations(game.id)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.validation_type == ValidationType::MoveReplay)
        .expect("replay result persisted");
    assert_eq!(replay.score, 80.0);
    assert_eq!(replay.details["invalid_moves"].as_array().unwrap().len(), 1);

    let stored = store
        .fetch_payout_validation(game.id)
        .await
        .unwrap()
        .expect("rejection persisted");
    assert_eq!(stored.status, PayoutStatus::Rejected);
}

#[tokio::test]
async fn test_large_pot_goes_to_human_review() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    game.stake_amount = 6.0; // pot 12 > auto-approval limit 10
    game.platform_fee = 0.12;
    seed(&store, &game, &fools_mate_moves(game.id)).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    let validation = match decision {
        PayoutDecision::HumanReview(v) => v,
        other => panic!("expected human review, got {:?}", other),
    };
    assert!(validation.human_review_required);
    assert_eq!(validation.status, PayoutStatus::Pending);
    assert!(validation
        .risk_factors
        .iter()
        .any(|t| t.starts_with("pot_exceeds_auto_approval_limit")));

    let stored = store
        .fetch_payout_validation(game.id)
        .await
        .unwrap()
        .expect("suspended row persisted");
    assert!(stored.human_review_required);
    assert_eq!(stored.status, PayoutStatus::Pending);
}

#[tokio::test]
async fn test_unfinished_game_rejected() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    game.state = "active".to_string();
    seed(&store, &game, &fools_mate_moves(game.id)).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    match decision {
        PayoutDecision::Rejected { reason, .. } => {
            assert_eq!(reason, RejectReason::GameNotFinished)
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(
        store
            .fetch_payout_validation(game.id)
            .await
            .unwrap()
            .is_none(),
        "No payout row for a game that never reached authorization"
    );
}

#[tokio::test]
async fn test_unknown_game_surfaces_validation_error() {
    let store = test_store().await;

    let decision = payout::authorize_payout(&store, Uuid::new_v4()).await;

    match decision {
        PayoutDecision::Rejected { reason, detail } => {
            assert_eq!(reason, RejectReason::ValidationError);
            assert!(detail.unwrap().contains("not found"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_agreed_draw_splits_net_pot() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    game.game_result = "agreement".to_string();
    game.winner = None;
    game.move_count = 2;
    game.final_position_fen =
        "rnbqkbnr/pppp1ppp/8/4p3/8/5P2/PPPPP1PP/RNBQKBNR w KQkq - 0 2".to_string();
    game.pgn = Some("1. f3 e5 1/2-1/2".to_string());
    let moves = fools_mate_moves(game.id)[..2].to_vec();
    seed(&store, &game, &moves).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    let validation = match decision {
        PayoutDecision::Approved(v) => v,
        other => panic!("expected approval, got {:?}", other),
    };
    assert_eq!(validation.winner_wallet, None);
    let half = (1.0 - 0.02) / 2.0;
    assert!((validation.payouts[WHITE_WALLET] - half).abs() < 1e-9);
    assert!((validation.payouts[BLACK_WALLET] - half).abs() < 1e-9);
}

#[tokio::test]
async fn test_abandoned_game_refunds_stakes() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    game.game_result = "abandoned".to_string();
    game.winner = None;
    game.move_count = 2;
    game.final_position_fen =
        "rnbqkbnr/pppp1ppp/8/4p3/8/5P2/PPPPP1PP/RNBQKBNR w KQkq - 0 2".to_string();
    game.pgn = None;
    let moves = fools_mate_moves(game.id)[..2].to_vec();
    seed(&store, &game, &moves).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    let validation = match decision {
        PayoutDecision::Approved(v) => v,
        other => panic!("expected approval, got {:?}", other),
    };
    assert_eq!(validation.platform_fee, 0.0, "Fee waived on abandonment");
    assert_eq!(validation.payouts[WHITE_WALLET], game.stake_amount);
    assert_eq!(validation.payouts[BLACK_WALLET], game.stake_amount);
}

#[tokio::test]
async fn test_stalemate_with_winner_rejected() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    game.game_result = "stalemate".to_string();
    game.winner = Some("white".to_string());
    seed(&store, &game, &fools_mate_moves(game.id)).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    match decision {
        PayoutDecision::Rejected { reason, .. } => {
            assert_eq!(reason, RejectReason::GameValidationFailed)
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_suspicious_timing_escalates() {
    let store = test_store().await;
    let mut game = fools_mate_game();
    // Checkmate delivered in 8 seconds
    game.finished_at = game.started_at + Duration::seconds(8);
    let moves = fools_mate_moves(game.id);
    seed(&store, &game, &moves).await;

    let decision = payout::authorize_payout(&store, game.id).await;

    let validation = match decision {
        PayoutDecision::HumanReview(v) => v,
        other => panic!("expected human review, got {:?}", other),
    };
    assert!(validation
        .risk_factors
        .iter()
        .any(|t| t == "timing_issues_present"));
    assert!(validation
        .risk_factors
        .iter()
        .any(|t| t == "validator_warning:timing"));
}
