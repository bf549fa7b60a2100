//! Shared domain records for the settlement pipeline
//!
//! The rows the settlement core reads from the persistence collaborator and
//! the enums it parses out of them. Kept separate from the backend so the
//! engine, the pipeline, and any future reporting tooling agree on one
//! definition of a game record.

pub mod records;

pub use records::{GameLifecycle, GameRecord, GameResult, MoveRecord, Winner};
