//! Error taxonomy for the settlement backend
//!
//! Validators never surface errors through these types — each validator
//! returns a `ValidationResult` carrying its own status, so one validator
//! cannot crash the pipeline. These types cover the storage layer and the
//! payout authorizer, where a failure must abort the current authorization
//! attempt without leaving partial payout state behind.

use thiserror::Error;
use uuid::Uuid;

/// Storage failures: the database itself, or rows that no longer parse.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row failed to map back into a domain record
    #[error("malformed row for game {game_id}: {detail}")]
    MalformedRow { game_id: String, detail: String },
}

/// Failures that abort a payout authorization attempt.
#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("game {0} not found")]
    GameNotFound(Uuid),

    #[error("unrecognized game result: {result}")]
    UnrecognizedResult { result: String },

    /// A decisive result (checkmate/resignation/timeout) with no winner on
    /// record; the distribution cannot be computed.
    #[error("winner missing for decisive result {result}")]
    MissingWinner { result: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
