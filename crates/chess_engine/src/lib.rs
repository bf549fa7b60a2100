//! # Chess Rules Engine - Settlement Oracle
//!
//! A deterministic chess rules engine used to independently recompute whether
//! a declared game outcome is legitimate before escrowed funds are released.
//! It answers three questions: is this move legal, what does the position
//! look like after it, and has the game reached checkmate or stalemate.
//!
//! ## Design
//!
//! - **Value semantics everywhere.** `Board` is `Copy` and
//!   [`api::apply_move`] returns a new [`types::GameState`] instead of
//!   mutating the input. Simulation paths ("would this leave my king in
//!   check?") work on throwaway copies, so there is no restore step to
//!   forget.
//! - **Tagged pieces.** A piece is `{color, kind}`, validated at
//!   construction. The `color-kind` text form exists only at the persistence
//!   boundary and round-trips through `Display`/`FromStr`.
//! - **Two-pass legality.** Pseudo-legal candidates come from per-piece
//!   geometry rules in [`move_gen`]; a second pass simulates each candidate
//!   and discards any that leave the mover's own king attacked. Check safety
//!   is a whole-board property, which is why it cannot live inside the
//!   per-piece rules.
//! - **Fails closed.** Every legality predicate returns `false` for
//!   anything it cannot positively verify; corrupt recorded histories
//!   surface as illegal moves, never as panics.
//!
//! Not a full FIDE arbiter: no fifty-move rule and no threefold repetition.
//! Castling and en passant are accepted under pragmatic rules (rights +
//! clear path, and target-square match respectively) so that legitimately
//! recorded games replay cleanly.

pub mod api;
pub mod board;
pub mod error;
pub mod move_gen;
pub mod types;

pub use api::{
    apply_move, game_status, has_any_legal_move, is_legal_move, legal_moves, new_game, GameStatus,
};
pub use board::{Board, Square};
pub use error::{EngineError, EngineResult};
pub use move_gen::{is_in_check, is_pseudo_legal, pseudo_legal_targets, square_attacked_by};
pub use types::{CastlingRights, Color, GameState, Move, Piece, PieceKind};
