//! Error types for the rules engine
//!
//! Covers malformed external input only: squares, pieces, and colors that
//! arrive as text from persistence. Move legality is never an error — the
//! legality predicates return `false` instead, so a corrupt move history
//! cannot abort a replay.

use thiserror::Error;

/// Errors that can occur when constructing engine values from external input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Square coordinate outside a1..h8
    #[error("Invalid square: {input}")]
    InvalidSquare { input: String },

    /// Piece string not in `color-kind` form (e.g. `white-knight`)
    #[error("Malformed piece: {input}")]
    MalformedPiece { input: String },

    /// Color string other than `white` or `black`
    #[error("Malformed color: {input}")]
    MalformedColor { input: String },

    /// Piece kind string not one of the six kinds
    #[error("Malformed piece kind: {input}")]
    MalformedPieceKind { input: String },
}

/// Result type alias for engine parsing operations
pub type EngineResult<T> = Result<T, EngineError>;
