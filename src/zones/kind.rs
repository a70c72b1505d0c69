//! Zone kinds and insertion positions.

use serde::{Deserialize, Serialize};

/// The six per-player card containers.
///
/// The wire and UI name the battlefield `"play"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneKind {
    #[serde(rename = "hand")]
    Hand,
    #[serde(rename = "library")]
    Library,
    #[serde(rename = "graveyard")]
    Graveyard,
    #[serde(rename = "exile")]
    Exile,
    #[serde(rename = "command")]
    Command,
    #[serde(rename = "play")]
    Battlefield,
}

impl ZoneKind {
    /// Number of zone kinds.
    pub const COUNT: usize = 6;

    /// Storage order, used as the lookup-table index.
    pub const ALL: [ZoneKind; Self::COUNT] = [
        ZoneKind::Hand,
        ZoneKind::Library,
        ZoneKind::Graveyard,
        ZoneKind::Exile,
        ZoneKind::Command,
        ZoneKind::Battlefield,
    ];

    /// Order in which `find_card_by_id` searches; first match wins.
    pub const SEARCH_ORDER: [ZoneKind; Self::COUNT] = [
        ZoneKind::Hand,
        ZoneKind::Battlefield,
        ZoneKind::Graveyard,
        ZoneKind::Exile,
        ZoneKind::Command,
        ZoneKind::Library,
    ];

    /// Index into a `[_; ZoneKind::COUNT]` table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ZoneKind::Hand => 0,
            ZoneKind::Library => 1,
            ZoneKind::Graveyard => 2,
            ZoneKind::Exile => 3,
            ZoneKind::Command => 4,
            ZoneKind::Battlefield => 5,
        }
    }

    /// Wire/UI key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            ZoneKind::Hand => "hand",
            ZoneKind::Library => "library",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Exile => "exile",
            ZoneKind::Command => "command",
            ZoneKind::Battlefield => "play",
        }
    }

    /// Parse a wire/UI key. Unknown keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    #[must_use]
    pub const fn is_battlefield(self) -> bool {
        matches!(self, ZoneKind::Battlefield)
    }

    /// Key with the first letter upper-cased, for action names like `handToPlay`.
    #[must_use]
    pub fn capitalized(self) -> &'static str {
        match self {
            ZoneKind::Hand => "Hand",
            ZoneKind::Library => "Library",
            ZoneKind::Graveyard => "Graveyard",
            ZoneKind::Exile => "Exile",
            ZoneKind::Command => "Command",
            ZoneKind::Battlefield => "Play",
        }
    }

    /// Human-readable destination name used in confirmation notices.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            ZoneKind::Hand => "hand",
            ZoneKind::Library => "top of library",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Exile => "exile",
            ZoneKind::Command => "command zone",
            ZoneKind::Battlefield => "battlefield",
        }
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Position for inserting a card into a zone.
///
/// The last element of a zone is its top (top of library, front-most card on
/// the battlefield).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Append (top of library).
    #[default]
    Top,
    /// Insert at index 0 (bottom of library).
    Bottom,
}

/// A destination for a selection move: a zone plus where in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneTarget {
    pub zone: ZoneKind,
    pub position: ZonePosition,
}

impl ZoneTarget {
    #[must_use]
    pub const fn top(zone: ZoneKind) -> Self {
        Self {
            zone,
            position: ZonePosition::Top,
        }
    }

    #[must_use]
    pub const fn library_bottom() -> Self {
        Self {
            zone: ZoneKind::Library,
            position: ZonePosition::Bottom,
        }
    }

    /// Parse a context-menu key; `"library-bottom"` addresses the library bottom.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        if key == "library-bottom" {
            return Some(Self::library_bottom());
        }
        ZoneKind::from_key(key).map(Self::top)
    }

    #[must_use]
    pub fn describe(&self) -> &'static str {
        match (self.zone, self.position) {
            (ZoneKind::Library, ZonePosition::Bottom) => "bottom of library",
            (zone, _) => zone.describe(),
        }
    }
}

impl From<ZoneKind> for ZoneTarget {
    fn from(zone: ZoneKind) -> Self {
        Self::top(zone)
    }
}
