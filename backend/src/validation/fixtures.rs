//! Shared fixtures for the validator unit tests
//!
//! A fool's mate game (1. f3 e5 2. g4 Qh4#) with consistent financials and
//! timing is the baseline "honest game"; individual tests corrupt the fields
//! they care about.

use chess_engine::{Color, Piece, PieceKind, Square};
use chrono::{Duration, TimeZone, Utc};
use shared::{GameRecord, MoveRecord};
use uuid::Uuid;

/// System program address: valid base58, 32 bytes.
pub(crate) const WHITE_WALLET: &str = "11111111111111111111111111111111";
/// Wrapped SOL mint: valid base58, 32 bytes.
pub(crate) const BLACK_WALLET: &str = "So11111111111111111111111111111111111111112";

pub(crate) fn fools_mate_game() -> GameRecord {
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

pub(crate) fn move_record(
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

pub(crate) fn fools_mate_moves(game_id: Uuid) -> Vec<MoveRecord> {
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
