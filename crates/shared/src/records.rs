//! Persisted game and move records
//!
//! `GameRecord` mirrors the `games` row and is consumed strictly read-only by
//! the validators. `game_result`, `winner`, and `state` stay raw strings on
//! the record: they arrive from external writers, and an unrecognized value
//! must surface as a validation failure, not a deserialization panic. The
//! typed accessors (`result()`, `winner()`, `lifecycle()`) return `None` for
//! anything they do not recognize.

use chess_engine::{Color, Move, Piece, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Checkmate,
    Resignation,
    Timeout,
    Stalemate,
    Agreement,
    Abandoned,
}

impl GameResult {
    pub const ALL: [GameResult; 6] = [
        GameResult::Checkmate,
        GameResult::Resignation,
        GameResult::Timeout,
        GameResult::Stalemate,
        GameResult::Agreement,
        GameResult::Abandoned,
    ];

    pub fn parse(input: &str) -> Option<GameResult> {
        match input {
            "checkmate" => Some(GameResult::Checkmate),
            "resignation" => Some(GameResult::Resignation),
            "timeout" => Some(GameResult::Timeout),
            "stalemate" => Some(GameResult::Stalemate),
            "agreement" => Some(GameResult::Agreement),
            "abandoned" => Some(GameResult::Abandoned),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Checkmate => "checkmate",
            GameResult::Resignation => "resignation",
            GameResult::Timeout => "timeout",
            GameResult::Stalemate => "stalemate",
            GameResult::Agreement => "agreement",
            GameResult::Abandoned => "abandoned",
        }
    }

    /// Results where one player takes the pot.
    pub fn is_decisive(self) -> bool {
        matches!(
            self,
            GameResult::Checkmate | GameResult::Resignation | GameResult::Timeout
        )
    }

    /// Results that split the pot.
    pub fn is_draw(self) -> bool {
        matches!(self, GameResult::Stalemate | GameResult::Agreement)
    }
}

/// Declared winner of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    pub fn parse(input: &str) -> Option<Winner> {
        match input {
            "white" => Some(Winner::White),
            "black" => Some(Winner::Black),
            "draw" => Some(Winner::Draw),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Winner::White => "white",
            Winner::Black => "black",
            Winner::Draw => "draw",
        }
    }

    pub fn from_color(color: Color) -> Winner {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Game lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameLifecycle {
    Waiting,
    Active,
    Finished,
    Cancelled,
}

impl GameLifecycle {
    pub fn parse(input: &str) -> Option<GameLifecycle> {
        match input {
            "waiting" => Some(GameLifecycle::Waiting),
            "active" => Some(GameLifecycle::Active),
            "finished" => Some(GameLifecycle::Finished),
            "cancelled" => Some(GameLifecycle::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameLifecycle::Waiting => "waiting",
            GameLifecycle::Active => "active",
            GameLifecycle::Finished => "finished",
            GameLifecycle::Cancelled => "cancelled",
        }
    }
}

/// One `games` row. Stake amounts are in stake units (SOL), fees likewise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub room_id: String,
    pub player_white_wallet: String,
    pub player_black_wallet: String,
    pub stake_amount: f64,
    pub platform_fee: f64,
    pub winner: Option<String>,
    pub game_result: String,
    pub move_count: i64,
    pub final_position_fen: String,
    pub pgn: Option<String>,
    pub time_limit_seconds: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub state: String,
}

impl GameRecord {
    /// Typed result, `None` for unrecognized text.
    pub fn result(&self) -> Option<GameResult> {
        GameResult::parse(&self.game_result)
    }

    /// Typed winner, `None` when absent or unrecognized.
    pub fn winner(&self) -> Option<Winner> {
        self.winner.as_deref().and_then(Winner::parse)
    }

    /// Typed lifecycle state, `None` for unrecognized text.
    pub fn lifecycle(&self) -> Option<GameLifecycle> {
        GameLifecycle::parse(&self.state)
    }

    /// Wallet of the declared winner, when the declaration names a side.
    pub fn winner_wallet(&self) -> Option<&str> {
        match self.winner()? {
            Winner::White => Some(&self.player_white_wallet),
            Winner::Black => Some(&self.player_black_wallet),
            Winner::Draw => None,
        }
    }
}

/// One `game_moves` row: an engine move plus recorded timing and the
/// check/checkmate annotations the client stored with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub game_id: Uuid,
    pub move_number: i64,
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_castle: bool,
    pub is_en_passant: bool,
    pub time_spent_ms: i64,
}

impl MoveRecord {
    /// Engine move carrying the recorded annotations verbatim.
    ///
    /// Replay prefers to re-derive captures and flags from the board it
    /// reconstructs; this conversion is for callers that trust the record.
    pub fn to_engine_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            piece: self.piece,
            captured: self.captured,
            promotion: self.promotion,
            is_castle: self.is_castle,
            is_en_passant: self.is_en_passant,
        }
    }
}
