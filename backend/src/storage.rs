//! SQLite persistence for games, validator output, and payout decisions
//!
//! Runtime queries with explicit row mapping; UUIDs are stored as TEXT and
//! pieces/squares in their canonical text forms, parsed strictly on the way
//! back out (a row that no longer parses is a [`StorageError::MalformedRow`],
//! not a silent default).
//!
//! The at-most-one-approval guarantee lives here: `payout_validations` keys
//! on `game_id`, and [`Store::save_payout_validation`] wraps the
//! existing-row check and the write in one transaction, so a concurrent
//! second authorization observes the first decision instead of overwriting
//! it.

use crate::error::StorageError;
use crate::payout::{PayoutStatus, PayoutValidation};
use crate::validation::{ValidationResult, ValidationStatus, ValidationType};
use chrono::{DateTime, Utc};
use shared::{GameRecord, MoveRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    pub fn new(pool: Pool<Sqlite>) -> Store {
        Store { pool }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Connect to the given database URL, creating the file if missing.
    pub async fn connect(database_url: &str) -> Result<Store, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::Database)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Store { pool })
    }

    /// Create the settlement tables if they do not exist.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS games (
                id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL,
                player_white_wallet TEXT NOT NULL,
                player_black_wallet TEXT NOT NULL,
                stake_amount REAL NOT NULL,
                platform_fee REAL NOT NULL,
                winner TEXT,
                game_result TEXT NOT NULL,
                move_count INTEGER NOT NULL DEFAULT 0,
                final_position_fen TEXT NOT NULL DEFAULT '',
                pgn TEXT,
                time_limit_seconds INTEGER NOT NULL DEFAULT 600,
                started_at DATETIME NOT NULL,
                finished_at DATETIME NOT NULL,
                state TEXT NOT NULL
            );",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS game_moves (
                game_id TEXT NOT NULL,
                move_number INTEGER NOT NULL,
                from_square TEXT NOT NULL,
                to_square TEXT NOT NULL,
                piece TEXT NOT NULL,
                captured TEXT,
                promotion TEXT,
                is_check INTEGER NOT NULL DEFAULT 0,
                is_checkmate INTEGER NOT NULL DEFAULT 0,
                is_castle INTEGER NOT NULL DEFAULT 0,
                is_en_passant INTEGER NOT NULL DEFAULT 0,
                time_spent_ms INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (game_id, move_number)
            );",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS validation_results (
                game_id TEXT NOT NULL,
                validation_type TEXT NOT NULL,
                status TEXT NOT NULL,
                score REAL NOT NULL,
                details TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (game_id, validation_type)
            );",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS payout_validations (
                game_id TEXT PRIMARY KEY,
                escrow_account TEXT NOT NULL,
                winner_wallet TEXT,
                stake_amount REAL NOT NULL,
                platform_fee REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                score REAL NOT NULL DEFAULT 0,
                risk_factors TEXT NOT NULL DEFAULT '[]',
                human_review_required INTEGER NOT NULL DEFAULT 0,
                approved_by TEXT,
                payout_tx_id TEXT,
                payouts TEXT NOT NULL DEFAULT '{}',
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a game row (used by the room service and by tests).
    pub async fn insert_game(&self, game: &GameRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO games (
                id, room_id, player_white_wallet, player_black_wallet,
                stake_amount, platform_fee, winner, game_result, move_count,
                final_position_fen, pgn, time_limit_seconds, started_at,
                finished_at, state
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(game.id.to_string())
        .bind(&game.room_id)
        .bind(&game.player_white_wallet)
        .bind(&game.player_black_wallet)
        .bind(game.stake_amount)
        .bind(game.platform_fee)
        .bind(&game.winner)
        .bind(&game.game_result)
        .bind(game.move_count)
        .bind(&game.final_position_fen)
        .bind(&game.pgn)
        .bind(game.time_limit_seconds)
        .bind(game.started_at)
        .bind(game.finished_at)
        .bind(&game.state)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert one move row.
    pub async fn insert_move(&self, record: &MoveRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO game_moves (
                game_id, move_number, from_square, to_square, piece, captured,
                promotion, is_check, is_checkmate, is_castle, is_en_passant,
                time_spent_ms
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(record.game_id.to_string())
        .bind(record.move_number)
        .bind(record.from.to_string())
        .bind(record.to.to_string())
        .bind(record.piece.to_string())
        .bind(record.captured.map(|p| p.to_string()))
        .bind(record.promotion.map(|k| k.to_string()))
        .bind(record.is_check)
        .bind(record.is_checkmate)
        .bind(record.is_castle)
        .bind(record.is_en_passant)
        .bind(record.time_spent_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fetch_game(&self, game_id: Uuid) -> Result<Option<GameRecord>, StorageError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = $1")
            .bind(game_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(map_game).transpose()
    }

    /// The ordered move list for a game.
    pub async fn fetch_moves(&self, game_id: Uuid) -> Result<Vec<MoveRecord>, StorageError> {
        let rows = sqlx::query("SELECT * FROM game_moves WHERE game_id = $1 ORDER BY move_number")
            .bind(game_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(map_move).collect()
    }

    /// Upsert one validator result; re-runs overwrite the prior row for the
    /// same `(game_id, validation_type)`.
    pub async fn upsert_validation(
        &self,
        game_id: Uuid,
        result: &ValidationResult,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO validation_results (game_id, validation_type, status, score, details, updated_at)
             VALUES ($1, $2, $3, $4, $5, CURRENT_TIMESTAMP)
             ON CONFLICT (game_id, validation_type) DO UPDATE SET
                status = excluded.status,
                score = excluded.score,
                details = excluded.details,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(game_id.to_string())
        .bind(result.validation_type.as_str())
        .bind(result.status.as_str())
        .bind(result.score)
        .bind(result.details.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fetch_validations(
        &self,
        game_id: Uuid,
    ) -> Result<Vec<ValidationResult>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM validation_results WHERE game_id = $1 ORDER BY validation_type",
        )
        .bind(game_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| map_validation(game_id, row))
            .collect()
    }

    pub async fn fetch_payout_validation(
        &self,
        game_id: Uuid,
    ) -> Result<Option<PayoutValidation>, StorageError> {
        let row = sqlx::query("SELECT * FROM payout_validations WHERE game_id = $1")
            .bind(game_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(map_payout).transpose()
    }

    /// Persist a payout decision, honoring the at-most-one-approval rule.
    ///
    /// The existing-row check and the write share one transaction: if a row
    /// for this game is already `approved`, it is returned unchanged and the
    /// candidate is discarded. Otherwise the candidate replaces whatever
    /// non-terminal row exists.
    pub async fn save_payout_validation(
        &self,
        candidate: &PayoutValidation,
    ) -> Result<PayoutValidation, StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT * FROM payout_validations WHERE game_id = $1")
            .bind(candidate.game_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = existing {
            let stored = map_payout(row)?;
            if stored.status == PayoutStatus::Approved {
                tx.commit().await?;
                return Ok(stored);
            }
        }

        sqlx::query(
            "INSERT INTO payout_validations (
                game_id, escrow_account, winner_wallet, stake_amount,
                platform_fee, status, score, risk_factors,
                human_review_required, approved_by, payout_tx_id, payouts,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, CURRENT_TIMESTAMP)
             ON CONFLICT (game_id) DO UPDATE SET
                winner_wallet = excluded.winner_wallet,
                status = excluded.status,
                score = excluded.score,
                risk_factors = excluded.risk_factors,
                human_review_required = excluded.human_review_required,
                approved_by = excluded.approved_by,
                payout_tx_id = excluded.payout_tx_id,
                payouts = excluded.payouts,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(candidate.game_id.to_string())
        .bind(&candidate.escrow_account)
        .bind(&candidate.winner_wallet)
        .bind(candidate.stake_amount)
        .bind(candidate.platform_fee)
        .bind(candidate.status.as_str())
        .bind(candidate.score)
        .bind(serde_json::to_string(&candidate.risk_factors).unwrap_or_else(|_| "[]".into()))
        .bind(candidate.human_review_required)
        .bind(&candidate.approved_by)
        .bind(&candidate.payout_tx_id)
        .bind(serde_json::to_string(&candidate.payouts).unwrap_or_else(|_| "{}".into()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(candidate.clone())
    }

    /// Finished games that have never been through authorization. Games
    /// suspended in human review keep their pending row and are not
    /// re-queued.
    pub async fn pending_settlements(&self) -> Result<Vec<Uuid>, StorageError> {
        let rows = sqlx::query(
            "SELECT g.id FROM games g
             LEFT JOIN payout_validations pv ON pv.game_id = g.id
             WHERE g.state = 'finished' AND pv.game_id IS NULL
             ORDER BY g.finished_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.get("id");
                Uuid::parse_str(&id).map_err(|e| StorageError::MalformedRow {
                    game_id: id,
                    detail: e.to_string(),
                })
            })
            .collect()
    }
}

fn malformed(game_id: &str, detail: impl std::fmt::Display) -> StorageError {
    StorageError::MalformedRow {
        game_id: game_id.to_string(),
        detail: detail.to_string(),
    }
}

fn map_game(row: SqliteRow) -> Result<GameRecord, StorageError> {
    let id: String = row.get("id");
    let started_at: DateTime<Utc> = row.get("started_at");
    let finished_at: DateTime<Utc> = row.get("finished_at");
    Ok(GameRecord {
        id: Uuid::parse_str(&id).map_err(|e| malformed(&id, e))?,
        room_id: row.get("room_id"),
        player_white_wallet: row.get("player_white_wallet"),
        player_black_wallet: row.get("player_black_wallet"),
        stake_amount: row.get("stake_amount"),
        platform_fee: row.get("platform_fee"),
        winner: row.get("winner"),
        game_result: row.get("game_result"),
        move_count: row.get("move_count"),
        final_position_fen: row.get("final_position_fen"),
        pgn: row.get("pgn"),
        time_limit_seconds: row.get("time_limit_seconds"),
        started_at,
        finished_at,
        state: row.get("state"),
    })
}

fn map_move(row: SqliteRow) -> Result<MoveRecord, StorageError> {
    let game_id: String = row.get("game_id");
    let from: String = row.get("from_square");
    let to: String = row.get("to_square");
    let piece: String = row.get("piece");
    let captured: Option<String> = row.get("captured");
    let promotion: Option<String> = row.get("promotion");

    Ok(MoveRecord {
        game_id: Uuid::parse_str(&game_id).map_err(|e| malformed(&game_id, e))?,
        move_number: row.get("move_number"),
        from: from.parse().map_err(|e| malformed(&game_id, e))?,
        to: to.parse().map_err(|e| malformed(&game_id, e))?,
        piece: piece.parse().map_err(|e| malformed(&game_id, e))?,
        captured: captured
            .map(|p| p.parse().map_err(|e| malformed(&game_id, e)))
            .transpose()?,
        promotion: promotion
            .map(|k| k.parse().map_err(|e| malformed(&game_id, e)))
            .transpose()?,
        is_check: row.get("is_check"),
        is_checkmate: row.get("is_checkmate"),
        is_castle: row.get("is_castle"),
        is_en_passant: row.get("is_en_passant"),
        time_spent_ms: row.get("time_spent_ms"),
    })
}

fn map_validation(game_id: Uuid, row: SqliteRow) -> Result<ValidationResult, StorageError> {
    let type_text: String = row.get("validation_type");
    let status_text: String = row.get("status");
    let details_text: String = row.get("details");

    let validation_type = ValidationType::parse(&type_text)
        .ok_or_else(|| malformed(&game_id.to_string(), format!("validation type {type_text}")))?;
    let status = ValidationStatus::parse(&status_text)
        .ok_or_else(|| malformed(&game_id.to_string(), format!("status {status_text}")))?;
    let details = serde_json::from_str(&details_text)
        .map_err(|e| malformed(&game_id.to_string(), e))?;

    Ok(ValidationResult {
        validation_type,
        status,
        score: row.get("score"),
        details,
    })
}

fn map_payout(row: SqliteRow) -> Result<PayoutValidation, StorageError> {
    let game_id: String = row.get("game_id");
    let status_text: String = row.get("status");
    let risk_text: String = row.get("risk_factors");
    let payouts_text: String = row.get("payouts");

    let status = PayoutStatus::parse(&status_text)
        .ok_or_else(|| malformed(&game_id, format!("payout status {status_text}")))?;
    let risk_factors: Vec<String> =
        serde_json::from_str(&risk_text).map_err(|e| malformed(&game_id, e))?;
    let payouts: BTreeMap<String, f64> =
        serde_json::from_str(&payouts_text).map_err(|e| malformed(&game_id, e))?;

    Ok(PayoutValidation {
        game_id: Uuid::parse_str(&game_id).map_err(|e| malformed(&game_id, e))?,
        escrow_account: row.get("escrow_account"),
        winner_wallet: row.get("winner_wallet"),
        stake_amount: row.get("stake_amount"),
        platform_fee: row.get("platform_fee"),
        status,
        score: row.get("score"),
        risk_factors,
        human_review_required: row.get("human_review_required"),
        approved_by: row.get("approved_by"),
        payout_tx_id: row.get("payout_tx_id"),
        payouts,
    })
}
