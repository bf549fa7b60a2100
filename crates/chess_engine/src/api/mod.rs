//! Public API for the rules engine
//!
//! ## Module Organization
//!
//! - `game` - Game lifecycle (new_game, apply_move)
//! - `moves` - Move legality and legal-move generation
//! - `state` - Terminal-state queries (check, checkmate, stalemate)

mod game;
mod moves;
mod state;

pub use game::{apply_move, new_game};
pub use moves::{is_legal_move, legal_moves};
pub use state::{game_status, has_any_legal_move, GameStatus};
