//! Zone storage for the locally controlled player.
//!
//! `ZoneStore` owns six ordered zones plus scalar player state (life,
//! displayed card width, cascade counter). It tracks which zone each card ID
//! lives in so lookups don't scan, and refuses inserts that would put one ID
//! in two zones.
//!
//! The store enforces no game rule; battlefield resets, placeholder disposal
//! and positioning belong to `movement::CardMovementEngine`.
//!
//! ```
//! use tabletop_sync::core::Card;
//! use tabletop_sync::zones::{ZoneKind, ZoneStore};
//!
//! let mut store = ZoneStore::new(40, 80);
//! store.append_to(ZoneKind::Hand, Card::new("c1", "Lightning Bolt"));
//!
//! assert_eq!(store.locate(&"c1".into()), Some(ZoneKind::Hand));
//! let card = store.remove_from(ZoneKind::Hand, &"c1".into()).unwrap();
//! store.append_to(ZoneKind::Graveyard, card);
//! assert_eq!(store.get(ZoneKind::Graveyard).len(), 1);
//! ```

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::kind::{ZoneKind, ZonePosition};
use crate::core::card::{Card, CardId};

/// An ordered sequence of cards. The last element is the top.
///
/// Backed by a persistent vector so cloning a zone (for publishing, or when a
/// snapshot is adopted) is O(1).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone {
    cards: Vector<Card>,
}

impl Zone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CardId> + '_ {
        self.cards.iter().map(|card| &card.id)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn position_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.position_of(id).is_some()
    }

    #[must_use]
    pub fn find(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn find_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        let index = self.position_of(id)?;
        self.cards.get_mut(index)
    }

    /// Top card (last element).
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// Cards at the bottom, up to `n` of them.
    pub fn head(&self, n: usize) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().take(n)
    }

    fn remove(&mut self, id: &CardId) -> Option<Card> {
        let index = self.position_of(id)?;
        Some(self.cards.remove(index))
    }

    fn insert(&mut self, card: Card, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.push_back(card),
            ZonePosition::Bottom => self.cards.push_front(card),
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().cloned().collect()
    }
}

impl FromIterator<Card> for Zone {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Card>> for Zone {
    fn from(cards: Vec<Card>) -> Self {
        Self {
            cards: Vector::from(cards),
        }
    }
}

/// Six zones addressed by `ZoneKind`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneSet {
    zones: [Zone; ZoneKind::COUNT],
}

impl ZoneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, kind: ZoneKind) -> &Zone {
        &self.zones[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ZoneKind) -> &mut Zone {
        &mut self.zones[kind.index()]
    }

    pub fn set(&mut self, kind: ZoneKind, zone: Zone) {
        self.zones[kind.index()] = zone;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneKind, &Zone)> + '_ {
        ZoneKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.zones.iter().map(Zone::len).sum()
    }
}

/// Local player's zones and scalar state.
#[derive(Clone, Debug)]
pub struct ZoneStore {
    zones: ZoneSet,

    /// Card locations: card_id -> zone. First zone in search order wins when
    /// a snapshot hands us duplicates.
    locations: FxHashMap<CardId, ZoneKind>,

    life: i32,

    card_width: u32,

    /// Cascade slots currently occupied on the battlefield.
    cascade_count: usize,
}

impl ZoneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(life: i32, card_width: u32) -> Self {
        Self {
            zones: ZoneSet::new(),
            locations: FxHashMap::default(),
            life,
            card_width,
            cascade_count: 0,
        }
    }

    #[must_use]
    pub fn get(&self, kind: ZoneKind) -> &Zone {
        self.zones.get(kind)
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Zone currently holding `id`.
    #[must_use]
    pub fn locate(&self, id: &CardId) -> Option<ZoneKind> {
        self.locations.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.locations.contains_key(id)
    }

    /// Find a card in any zone.
    #[must_use]
    pub fn find_card_by_id(&self, id: &CardId) -> Option<&Card> {
        let kind = self.locate(id)?;
        self.zones.get(kind).find(id)
    }

    pub fn find_card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        let kind = self.locate(id)?;
        self.zones.get_mut(kind).find_mut(id)
    }

    /// Find a card only if it is in `kind`.
    #[must_use]
    pub fn card_in(&self, kind: ZoneKind, id: &CardId) -> Option<&Card> {
        self.zones.get(kind).find(id)
    }

    pub fn card_in_mut(&mut self, kind: ZoneKind, id: &CardId) -> Option<&mut Card> {
        self.zones.get_mut(kind).find_mut(id)
    }

    /// Remove a card from `kind`. Returns `None` if it isn't there.
    pub fn remove_from(&mut self, kind: ZoneKind, id: &CardId) -> Option<Card> {
        let card = self.zones.get_mut(kind).remove(id)?;
        self.locations.remove(id);
        // A snapshot may have handed us the same ID twice.
        if let Some(other) = ZoneKind::SEARCH_ORDER
            .into_iter()
            .find(|&k| self.zones.get(k).contains(id))
        {
            self.locations.insert(id.clone(), other);
        }
        Some(card)
    }

    /// Append a card to the end of `kind`.
    ///
    /// Returns `false` (and drops nothing) if the ID is already in some zone.
    pub fn append_to(&mut self, kind: ZoneKind, card: Card) -> bool {
        self.insert_into(kind, card, ZonePosition::Top)
    }

    /// Insert a card into `kind` at `position`.
    ///
    /// Returns `false` if the ID is already in some zone.
    pub fn insert_into(&mut self, kind: ZoneKind, card: Card, position: ZonePosition) -> bool {
        if let Some(existing) = self.locate(&card.id) {
            log::warn!(
                "refusing to insert {} into {}: already in {}",
                card.id,
                kind,
                existing
            );
            return false;
        }
        self.locations.insert(card.id.clone(), kind);
        self.zones.get_mut(kind).insert(card, position);
        true
    }

    /// Replace all six zones wholesale.
    pub fn replace_all(&mut self, zones: ZoneSet) {
        self.zones = zones;
        self.reindex();
    }

    /// Remove every card from every zone.
    pub fn clear(&mut self) {
        self.replace_all(ZoneSet::new());
    }

    fn reindex(&mut self) {
        self.locations.clear();
        for kind in ZoneKind::SEARCH_ORDER {
            for id in self.zones.get(kind).ids() {
                self.locations.entry(id.clone()).or_insert(kind);
            }
        }
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.zones.total_cards()
    }

    #[must_use]
    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn set_life(&mut self, life: i32) {
        self.life = life;
    }

    #[must_use]
    pub fn card_width(&self) -> u32 {
        self.card_width
    }

    pub fn set_card_width(&mut self, width: u32) {
        self.card_width = width;
    }

    #[must_use]
    pub fn cascade_count(&self) -> usize {
        self.cascade_count
    }

    pub fn set_cascade_count(&mut self, count: usize) {
        self.cascade_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CardId {
        CardId::new(s)
    }

    #[test]
    fn test_append_and_locate() {
        let mut store = ZoneStore::new(40, 80);
        assert!(store.append_to(ZoneKind::Hand, Card::new("a", "A")));
        assert!(store.append_to(ZoneKind::Library, Card::new("b", "B")));

        assert_eq!(store.locate(&id("a")), Some(ZoneKind::Hand));
        assert_eq!(store.locate(&id("b")), Some(ZoneKind::Library));
        assert_eq!(store.locate(&id("zz")), None);
        assert_eq!(store.find_card_by_id(&id("b")).unwrap().name, "B");
    }

    #[test]
    fn test_duplicate_insert_refused() {
        let mut store = ZoneStore::new(40, 80);
        assert!(store.append_to(ZoneKind::Hand, Card::new("a", "A")));
        assert!(!store.append_to(ZoneKind::Exile, Card::new("a", "A")));

        assert_eq!(store.total_cards(), 1);
        assert!(store.get(ZoneKind::Exile).is_empty());
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut store = ZoneStore::new(40, 80);
        store.append_to(ZoneKind::Hand, Card::new("a", "A"));

        assert!(store.remove_from(ZoneKind::Graveyard, &id("a")).is_none());
        assert!(store.remove_from(ZoneKind::Hand, &id("nope")).is_none());
        assert_eq!(store.locate(&id("a")), Some(ZoneKind::Hand));
    }

    #[test]
    fn test_insert_positions() {
        let mut store = ZoneStore::new(40, 80);
        store.append_to(ZoneKind::Library, Card::new("a", "A"));
        store.append_to(ZoneKind::Library, Card::new("b", "B"));
        store.insert_into(ZoneKind::Library, Card::new("c", "C"), ZonePosition::Bottom);
        store.insert_into(ZoneKind::Library, Card::new("d", "D"), ZonePosition::Top);

        let order: Vec<_> = store.get(ZoneKind::Library).ids().map(CardId::as_str).collect();
        assert_eq!(order, vec!["c", "a", "b", "d"]);
        assert_eq!(store.get(ZoneKind::Library).top().unwrap().id, id("d"));
    }

    #[test]
    fn test_duplicate_from_snapshot_first_search_match_wins() {
        let mut store = ZoneStore::new(40, 80);
        let mut zones = ZoneSet::new();
        zones.set(ZoneKind::Library, Zone::from(vec![Card::new("d", "Dup")]));
        zones.set(ZoneKind::Hand, Zone::from(vec![Card::new("d", "Dup")]));
        store.replace_all(zones);

        assert_eq!(store.locate(&id("d")), Some(ZoneKind::Hand));

        // Removing the hand copy exposes the library copy.
        store.remove_from(ZoneKind::Hand, &id("d"));
        assert_eq!(store.locate(&id("d")), Some(ZoneKind::Library));
    }

    #[test]
    fn test_find_card_mut() {
        let mut store = ZoneStore::new(40, 80);
        store.append_to(ZoneKind::Battlefield, Card::new("a", "A").at(1.0, 1.0));

        store.find_card_mut(&id("a")).unwrap().set_position(9.0, 9.0);
        assert_eq!(store.find_card_by_id(&id("a")).unwrap().position(), Some((9.0, 9.0)));
    }

    #[test]
    fn test_scalars() {
        let mut store = ZoneStore::new(40, 80);
        store.set_life(37);
        store.set_card_width(90);
        store.set_cascade_count(2);
        assert_eq!((store.life(), store.card_width(), store.cascade_count()), (37, 90, 2));
    }
}
