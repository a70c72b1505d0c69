//! Card movement and mutation.
//!
//! [`CardMovementEngine`] is the only writer of the local [`ZoneStore`]
//! besides snapshot reconciliation.
//!
//! [`ZoneStore`]: crate::zones::ZoneStore

pub mod cascade;
pub mod counters;
pub mod engine;

pub use engine::{CardMovementEngine, MoveOutcome, ResetOutcome};
