//! Card entity: identity plus the per-zone presentation state.
//!
//! A `Card` carries no behavior of its own. Movement and mutation rules live
//! in `movement`; this module only fixes the shape and the wire encoding.
//!
//! ## Battlefield-only state
//!
//! `x`/`y`, `rotation`, `counters`, `face_shown` and `from_hand_cascade` only
//! mean something while the card sits on a battlefield. The movement engine
//! resets them when the card leaves.

use std::num::NonZeroI32;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable, globally unique card identifier.
///
/// Assigned when the card is created (decklist instantiation on the server,
/// or placeholder creation on the client) and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a card ID from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Tapped state. Only two angles exist on the wire: 0 and 90.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Untapped,
    Tapped,
}

impl Rotation {
    /// Angle in degrees as sent over the wire.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Untapped => 0,
            Rotation::Tapped => 90,
        }
    }

    #[must_use]
    pub const fn is_tapped(self) -> bool {
        matches!(self, Rotation::Tapped)
    }
}

impl From<u16> for Rotation {
    /// Any nonzero angle reads as tapped.
    fn from(degrees: u16) -> Self {
        if degrees == 0 {
            Rotation::Untapped
        } else {
            Rotation::Tapped
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Which face of a card is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

/// A card as held in a zone and as exchanged with the server.
///
/// `counters` is `None` or nonzero; zero is never representable. Incoming
/// snapshots carrying `"counters": 0` normalize to `None` on decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,

    /// Canonical card name.
    pub name: String,

    /// Label shown to players. Falls back to `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(default)]
    pub rotation: Rotation,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_counters"
    )]
    pub counters: Option<NonZeroI32>,

    #[serde(default)]
    pub face_shown: Face,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_placeholder: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_commander: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub from_hand_cascade: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn deserialize_counters<'de, D>(deserializer: D) -> Result<Option<NonZeroI32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<i32> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(NonZeroI32::new))
}

impl Card {
    /// Create a plain card with `display_name` equal to `name`.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            display_name: Some(name.clone()),
            name,
            x: None,
            y: None,
            rotation: Rotation::Untapped,
            counters: None,
            face_shown: Face::Front,
            is_placeholder: false,
            is_commander: false,
            from_hand_cascade: false,
        }
    }

    /// Create a placeholder token at the given battlefield position.
    #[must_use]
    pub fn placeholder(id: impl Into<CardId>, text: impl Into<String>, x: f64, y: f64) -> Self {
        let mut card = Self::new(id, text);
        card.is_placeholder = true;
        card.x = Some(x);
        card.y = Some(y);
        card
    }

    #[must_use]
    pub fn commander(mut self) -> Self {
        self.is_commander = true;
        self
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Label shown to players.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Battlefield position, if both coordinates are set.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = Some(x);
        self.y = Some(y);
    }

    /// Counter value, treating absent as zero.
    #[must_use]
    pub fn counter_value(&self) -> i32 {
        self.counters.map_or(0, NonZeroI32::get)
    }

    #[must_use]
    pub fn has_counters(&self) -> bool {
        self.counters.is_some()
    }

    /// Drop everything that only exists on a battlefield.
    pub fn clear_battlefield_state(&mut self) {
        self.rotation = Rotation::Untapped;
        self.counters = None;
        self.face_shown = Face::Front;
        self.x = None;
        self.y = None;
        self.from_hand_cascade = false;
    }

    /// Reduce to identity only, as cards are when shuffled back into a library.
    #[must_use]
    pub fn stripped(&self) -> Self {
        let mut card = Self::new(self.id.clone(), self.name.clone());
        card.display_name = Some(self.label().to_owned());
        card
    }
}
