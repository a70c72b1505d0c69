//! Wire protocol: outbound commands, inbound snapshots and session replies.

pub mod messages;

pub use messages::{
    ClientMessage, DecklistEntry, Disconnected, GameSnapshot, JoinRequest, PlayerRecord,
    PublishState, RejoinRequest, ServerMessage, SessionAccepted, SessionRejected,
};
