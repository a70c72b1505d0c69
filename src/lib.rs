//! # tabletop-sync
//!
//! Client-side state engine for a multiplayer card tabletop.
//!
//! Each client keeps its player's six zones (hand, library, graveyard, exile,
//! command, battlefield) locally so clicks and drags apply immediately, then
//! reconciles with the authoritative server snapshot as it arrives.
//!
//! ## Design Principles
//!
//! 1. **Local First**: Edits apply synchronously and are visible on the next
//!    render, before any network round-trip.
//!
//! 2. **Server Wins Eventually**: A local edit shields the player's own zones
//!    from incoming snapshots only for a short optimistic window. Everyone
//!    else's board always follows the server.
//!
//! 3. **One Owner**: All state lives in a single [`ClientSession`]; timers are
//!    explicit and driven by an injectable [`Clock`].
//!
//! ## Modules
//!
//! - `core`: Cards, players, clock, RNG, configuration, errors
//! - `zones`: Zone kinds and the local zone store
//! - `movement`: Card moves, cascade placement, tap/flip/counters
//! - `sync`: Debounce timers, optimistic window, publishing, reconciliation
//! - `protocol`: Wire messages and JSON codec
//! - `session`: The client session tying it together

pub mod core;
pub mod zones;
pub mod movement;
pub mod sync;
pub mod protocol;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, Face, Rotation,
    PlayerId,
    GameRng,
    Clock, ManualClock, Millis, SystemClock,
    CardSizeConfig, CascadeConfig, DebounceConfig, SessionConfig,
    Result, SessionError,
};

pub use crate::zones::{Zone, ZoneKind, ZonePosition, ZoneSet, ZoneStore, ZoneTarget};

pub use crate::movement::{CardMovementEngine, MoveOutcome, ResetOutcome};

pub use crate::sync::{
    ActionKind, OptimisticAction, OptimisticActionTracker,
    Debounce, Scheduler, TimerKind,
    MoveTransmitter,
    LibraryCacheKey, SpectatedLibraryCache,
    MergeMode, OwnZonesOutcome, ReconciliationService, SpectatedBoard,
};

pub use crate::protocol::{
    ClientMessage, ServerMessage,
    GameSnapshot, PlayerRecord, PublishState,
    JoinRequest, RejoinRequest, SessionAccepted, SessionRejected, Disconnected,
};

pub use crate::session::{ClientSession, SessionOutput};
