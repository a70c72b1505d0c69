//! Zone system for card locations.
//!
//! ## Key Types
//!
//! - `ZoneKind`: the six per-player zones, with wire keys
//! - `ZonePosition` / `ZoneTarget`: where in a zone a card lands
//! - `Zone`, `ZoneSet`: ordered containers and the kind -> container table
//! - `ZoneStore`: the local player's zones, card lookup, scalar state

pub mod kind;
pub mod store;

pub use kind::{ZoneKind, ZonePosition, ZoneTarget};
pub use store::{Zone, ZoneSet, ZoneStore};
