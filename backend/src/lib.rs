//! Settlement backend
//!
//! The gate between a finished game and the release of escrowed funds. A
//! finished game's stored move list and declared result are re-validated by
//! five independent validators; the payout authorizer aggregates them into an
//! approve/reject/escalate decision and persists an auditable record of it.

pub mod error;
pub mod payout;
pub mod storage;
pub mod validation;
