//! Wire messages exchanged with the table server.
//!
//! Every message is a JSON object `{"event": <name>, "data": <payload>}` with
//! camelCase payload fields. The transport itself is external; this module
//! only fixes the shapes and the codec.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::zones::{Zone, ZoneKind, ZoneSet, ZoneStore};

/// Full state of the local player's zones, sent after local edits.
///
/// Always the whole state, never a diff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishState {
    pub hand: Zone,
    pub library: Zone,
    pub graveyard: Zone,
    pub exile: Zone,
    pub command: Zone,
    pub play_zone: Zone,
    pub life: i32,
}

impl PublishState {
    #[must_use]
    pub fn from_store(store: &ZoneStore) -> Self {
        Self {
            hand: store.get(ZoneKind::Hand).clone(),
            library: store.get(ZoneKind::Library).clone(),
            graveyard: store.get(ZoneKind::Graveyard).clone(),
            exile: store.get(ZoneKind::Exile).clone(),
            command: store.get(ZoneKind::Command).clone(),
            play_zone: store.get(ZoneKind::Battlefield).clone(),
            life: store.life(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub room_name: String,
    pub display_name: String,
    pub decklist: Vec<String>,
    pub commanders: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejoinRequest {
    pub room_name: String,
    pub display_name: String,
}

/// Messages the client sends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Join(JoinRequest),
    Rejoin(RejoinRequest),
    Move(PublishState),
    EndTurn,
    PickTurnOrder,
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A decklist entry as the server echoes it: either a bare name or a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecklistEntry {
    Name(String),
    Card { name: String },
}

impl DecklistEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DecklistEntry::Name(name) | DecklistEntry::Card { name } => name,
        }
    }
}

/// One player's non-battlefield zones as the server sees them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerRecord {
    pub hand: Zone,
    pub library: Zone,
    pub graveyard: Zone,
    pub exile: Zone,
    pub command: Zone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life: Option<i32>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decklist: Option<Vec<DecklistEntry>>,
}

impl PlayerRecord {
    /// The record's zone of `kind`. Battlefields live in `GameSnapshot::play_zones`.
    #[must_use]
    pub fn zone(&self, kind: ZoneKind) -> Option<&Zone> {
        match kind {
            ZoneKind::Hand => Some(&self.hand),
            ZoneKind::Library => Some(&self.library),
            ZoneKind::Graveyard => Some(&self.graveyard),
            ZoneKind::Exile => Some(&self.exile),
            ZoneKind::Command => Some(&self.command),
            ZoneKind::Battlefield => None,
        }
    }
}

/// Authoritative table state broadcast by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSnapshot {
    pub players: FxHashMap<PlayerId, PlayerRecord>,
    pub play_zones: FxHashMap<PlayerId, Zone>,
    pub turn_order_set: bool,
    pub turn_order: Vec<PlayerId>,
    pub current_turn: usize,
}

impl GameSnapshot {
    #[must_use]
    pub fn player(&self, player: &PlayerId) -> Option<&PlayerRecord> {
        self.players.get(player)
    }

    /// A player's battlefield; empty if the server sent none.
    #[must_use]
    pub fn battlefield(&self, player: &PlayerId) -> Zone {
        self.play_zones.get(player).cloned().unwrap_or_default()
    }

    /// All six zones of `player`, or `None` if the snapshot has no record.
    #[must_use]
    pub fn zone_set(&self, player: &PlayerId) -> Option<ZoneSet> {
        let record = self.player(player)?;
        let mut zones = ZoneSet::new();
        for kind in ZoneKind::ALL {
            let zone = match record.zone(kind) {
                Some(zone) => zone.clone(),
                None => self.battlefield(player),
            };
            zones.set(kind, zone);
        }
        Some(zones)
    }

    /// Whose turn it is, once turn order has been picked.
    #[must_use]
    pub fn current_turn_player(&self) -> Option<&PlayerId> {
        if !self.turn_order_set {
            return None;
        }
        self.turn_order.get(self.current_turn)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAccepted {
    pub room_name: String,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRejected {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnected {
    pub reason: String,
}

/// Messages the server sends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    JoinSuccess(SessionAccepted),
    RejoinSuccess(SessionAccepted),
    JoinError(SessionRejected),
    RejoinError(SessionRejected),
    State(GameSnapshot),
    Disconnect(Disconnected),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
