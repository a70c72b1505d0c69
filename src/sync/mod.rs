//! Keeping local zones and the server in step.
//!
//! - `debounce`: the render / transmit / tap-toggle timers
//! - `optimistic`: the window during which local edits beat snapshots
//! - `transmitter`: coalesced full-state publishing
//! - `library_cache`: stable shuffled view of spectated libraries
//! - `reconcile`: incremental merge and full resync

pub mod debounce;
pub mod optimistic;
pub mod transmitter;
pub mod library_cache;
pub mod reconcile;

pub use debounce::{Debounce, Scheduler, TimerKind};
pub use optimistic::{ActionKind, OptimisticAction, OptimisticActionTracker};
pub use transmitter::MoveTransmitter;
pub use library_cache::{LibraryCacheKey, SpectatedLibraryCache};
pub use reconcile::{MergeMode, OwnZonesOutcome, ReconciliationService, SpectatedBoard};
