//! Errors surfaced to the player.
//!
//! Stale references (unknown card IDs, unknown zone keys) are deliberately
//! absent: those are silent no-ops, since the UI may lag the model by one
//! event. Everything here degrades to "state unchanged, show a message".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter both room name and display name.")]
    MissingRoomOrName,

    #[error("Please enter at least one card in your decklist.")]
    EmptyDecklist,

    #[error("Please enter a valid number (negative values allowed, 0 removes counters), got {0:?}.")]
    MalformedCounter(String),

    #[error("Error joining game: {0}")]
    JoinRejected(String),

    #[error("Error rejoining game: {0}. You may need to create a new game.")]
    RejoinRejected(String),

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
