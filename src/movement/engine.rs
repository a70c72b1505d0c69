//! Validated card operations over a [`ZoneStore`].
//!
//! `CardMovementEngine` borrows the session's store, optimistic tracker,
//! timers and transmitter for the duration of one event-loop step. Every
//! operation that changes something:
//! - registers an optimistic action,
//! - requests a publish (re-arming the transmit timer),
//! - arms a render,
//! - recomputes the cascade counter.
//!
//! ## Zone transition rules
//!
//! Leaving a battlefield for any other zone:
//! - placeholders are discarded instead of relocated;
//! - other cards lose rotation, counters, face, position and cascade flag.
//!
//! Entering a battlefield without a position lands at the configured origin.
//!
//! Unknown card IDs are skipped silently; the UI can lag the model by one
//! event and that is not an error.

use smallvec::SmallVec;

use crate::core::card::{Card, CardId, Rotation};
use crate::core::clock::Millis;
use crate::core::config::SessionConfig;
use crate::core::rng::GameRng;
use crate::sync::{ActionKind, MoveTransmitter, OptimisticActionTracker, Scheduler, TimerKind};
use crate::zones::{ZoneKind, ZoneStore, ZoneTarget};

use super::{cascade, counters};

/// Result of a move: which cards arrived and how many placeholders vanished.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: SmallVec<[CardId; 4]>,
    pub discarded: usize,
}

impl MoveOutcome {
    /// Nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.discarded == 0
    }

    /// Confirmation text for a selection move, if anything happened.
    ///
    /// ```
    /// use tabletop_sync::core::CardId;
    /// use tabletop_sync::movement::MoveOutcome;
    /// use tabletop_sync::zones::{ZoneKind, ZoneTarget};
    ///
    /// let outcome = MoveOutcome {
    ///     moved: [CardId::new("a"), CardId::new("b")].into_iter().collect(),
    ///     discarded: 1,
    /// };
    /// assert_eq!(
    ///     outcome.notice(ZoneTarget::top(ZoneKind::Graveyard)).as_deref(),
    ///     Some("Moved 2 cards to graveyard. Removed 1 placeholder card")
    /// );
    /// ```
    #[must_use]
    pub fn notice(&self, target: ZoneTarget) -> Option<String> {
        let moved = (!self.moved.is_empty()).then(|| {
            format!(
                "Moved {} card{} to {}",
                self.moved.len(),
                plural(self.moved.len()),
                target.describe()
            )
        });
        let removed = (self.discarded > 0).then(|| {
            format!(
                "Removed {} placeholder card{}",
                self.discarded,
                plural(self.discarded)
            )
        });
        match (moved, removed) {
            (Some(moved), Some(removed)) => Some(format!("{moved}. {removed}")),
            (moved, removed) => moved.or(removed),
        }
    }
}

/// Result of [`CardMovementEngine::reset_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Cards shuffled into the library.
    pub shuffled: usize,
    /// Commanders now in the command zone.
    pub commanders: usize,
    pub placeholders_removed: usize,
}

impl ResetOutcome {
    #[must_use]
    pub fn notice(&self) -> String {
        let mut message = String::from("Your cards have been shuffled into your library!");
        if self.commanders > 0 {
            message.push_str(&format!(
                " {} commander{} returned to command zone.",
                self.commanders,
                plural(self.commanders)
            ));
        }
        message
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// What happened to one card on arrival.
enum Landing {
    Moved(CardId),
    Discarded,
    Refused,
}

pub struct CardMovementEngine<'a> {
    store: &'a mut ZoneStore,
    tracker: &'a mut OptimisticActionTracker,
    timers: &'a mut Scheduler,
    transmitter: &'a mut MoveTransmitter,
    config: &'a SessionConfig,
    now: Millis,
}

impl<'a> CardMovementEngine<'a> {
    pub fn new(
        store: &'a mut ZoneStore,
        tracker: &'a mut OptimisticActionTracker,
        timers: &'a mut Scheduler,
        transmitter: &'a mut MoveTransmitter,
        config: &'a SessionConfig,
        now: Millis,
    ) -> Self {
        Self {
            store,
            tracker,
            timers,
            transmitter,
            config,
            now,
        }
    }

    // === Moves ===

    /// Move one card from `source` to the end of `target`.
    pub fn move_card(&mut self, id: &CardId, source: ZoneKind, target: ZoneKind) -> MoveOutcome {
        self.move_batch(
            std::slice::from_ref(id),
            source,
            ZoneTarget::top(target),
            None,
            ActionKind::Move { from: source, to: target },
        )
    }

    /// Move one card onto the battlefield at a drop point.
    pub fn move_card_at(&mut self, id: &CardId, source: ZoneKind, x: f64, y: f64) -> MoveOutcome {
        self.move_batch(
            std::slice::from_ref(id),
            source,
            ZoneTarget::top(ZoneKind::Battlefield),
            Some((x, y)),
            ActionKind::Move { from: source, to: ZoneKind::Battlefield },
        )
    }

    /// Move several cards from one source as a single batch.
    ///
    /// All removals happen before any insertion; missing IDs are skipped.
    pub fn move_card_group(
        &mut self,
        ids: &[CardId],
        source: ZoneKind,
        target: ZoneKind,
    ) -> MoveOutcome {
        self.move_batch(
            ids,
            source,
            ZoneTarget::top(target),
            None,
            ActionKind::Move { from: source, to: target },
        )
    }

    /// Drop a group onto the battlefield; card `i` lands at
    /// `(x + i * offset, y + i * offset)`.
    pub fn move_card_group_at(&mut self, ids: &[CardId], source: ZoneKind, x: f64, y: f64) -> MoveOutcome {
        self.move_batch(
            ids,
            source,
            ZoneTarget::top(ZoneKind::Battlefield),
            Some((x, y)),
            ActionKind::Move { from: source, to: ZoneKind::Battlefield },
        )
    }

    /// Move a mixed selection; each card's source zone is looked up.
    pub fn move_selection(&mut self, ids: &[CardId], target: ZoneTarget) -> MoveOutcome {
        let taken: Vec<(ZoneKind, Card)> = ids
            .iter()
            .filter_map(|id| {
                let source = self.store.locate(id)?;
                self.store.remove_from(source, id).map(|card| (source, card))
            })
            .collect();

        let outcome = self.land_all(taken, target, None);
        if !outcome.is_empty() {
            let ids = outcome.moved.iter().cloned();
            self.commit(ActionKind::Selection { to: target.zone }, ids);
        }
        outcome
    }

    /// Move the top card of `source` to `target`.
    pub fn draw(&mut self, source: ZoneKind, target: ZoneKind) -> Option<CardId> {
        let id = self.store.get(source).top()?.id.clone();
        self.move_card(&id, source, target).moved.into_iter().next()
    }

    fn move_batch(
        &mut self,
        ids: &[CardId],
        source: ZoneKind,
        target: ZoneTarget,
        drop: Option<(f64, f64)>,
        kind: ActionKind,
    ) -> MoveOutcome {
        let taken: Vec<(ZoneKind, Card)> = ids
            .iter()
            .filter_map(|id| self.store.remove_from(source, id))
            .map(|card| (source, card))
            .collect();

        let outcome = self.land_all(taken, target, drop);
        if outcome.is_empty() {
            log::debug!("{} skipped: no card found in {}", kind, source);
        } else {
            let ids = outcome.moved.iter().cloned();
            self.commit(kind, ids);
        }
        outcome
    }

    fn land_all(
        &mut self,
        taken: Vec<(ZoneKind, Card)>,
        target: ZoneTarget,
        drop: Option<(f64, f64)>,
    ) -> MoveOutcome {
        let offset = self.config.group_drop_offset;
        let mut outcome = MoveOutcome::default();
        let mut placed = 0usize;
        for (source, card) in taken {
            let drop = drop.map(|(x, y)| {
                let shift = placed as f64 * offset;
                (x + shift, y + shift)
            });
            match self.land(card, source, target, drop) {
                Landing::Moved(id) => {
                    placed += 1;
                    outcome.moved.push(id);
                }
                Landing::Discarded => outcome.discarded += 1,
                Landing::Refused => {}
            }
        }
        outcome
    }

    fn land(
        &mut self,
        mut card: Card,
        source: ZoneKind,
        target: ZoneTarget,
        drop: Option<(f64, f64)>,
    ) -> Landing {
        if source.is_battlefield() && !target.zone.is_battlefield() {
            if card.is_placeholder {
                log::debug!("discarding placeholder {} leaving the battlefield", card.id);
                return Landing::Discarded;
            }
            card.clear_battlefield_state();
        }

        if target.zone.is_battlefield() {
            if let Some((x, y)) = drop {
                card.set_position(x, y);
            } else if card.position().is_none() {
                let (x, y) = self.config.battlefield_origin;
                card.set_position(x, y);
            }
        }

        let id = card.id.clone();
        if self.store.insert_into(target.zone, card, target.position) {
            Landing::Moved(id)
        } else {
            Landing::Refused
        }
    }

    // === Battlefield ===

    /// Move a card from hand onto the next free cascade slot.
    pub fn place_cascaded(&mut self, id: &CardId) -> Option<(f64, f64)> {
        let slot = cascade::refresh(self.store, &self.config.cascade);
        let mut card = self.store.remove_from(ZoneKind::Hand, id)?;

        let (x, y) = cascade::slot_position(&self.config.cascade, slot);
        card.set_position(x, y);
        card.rotation = Rotation::Untapped;
        card.from_hand_cascade = true;

        if !self.store.append_to(ZoneKind::Battlefield, card) {
            return None;
        }
        log::debug!("cascaded {} into slot {} at ({}, {})", id, slot, x, y);
        self.commit(
            ActionKind::Move { from: ZoneKind::Hand, to: ZoneKind::Battlefield },
            [id.clone()],
        );
        Some((x, y))
    }

    /// Drag a battlefield card to a new point.
    pub fn reposition(&mut self, id: &CardId, x: f64, y: f64) -> bool {
        let Some(card) = self.store.card_in_mut(ZoneKind::Battlefield, id) else {
            return false;
        };
        card.set_position(x, y);
        self.commit(ActionKind::Reposition, [id.clone()]);
        true
    }

    /// Tap or untap a group by consensus: if any is untapped, tap them all;
    /// otherwise untap them all.
    ///
    /// Returns the applied rotation, or `None` if no ID named a battlefield
    /// card.
    pub fn apply_tap_toggle(&mut self, ids: &[CardId]) -> Option<Rotation> {
        let battlefield = self.store.get(ZoneKind::Battlefield);
        let present: Vec<&CardId> = ids.iter().filter(|id| battlefield.contains(id)).collect();
        if present.is_empty() {
            return None;
        }

        let any_untapped = present
            .iter()
            .filter_map(|id| battlefield.find(id))
            .any(|card| !card.rotation.is_tapped());
        let rotation = if any_untapped {
            Rotation::Tapped
        } else {
            Rotation::Untapped
        };

        let present: Vec<CardId> = present.into_iter().cloned().collect();
        for id in &present {
            if let Some(card) = self.store.card_in_mut(ZoneKind::Battlefield, id) {
                card.rotation = rotation;
            }
        }
        log::debug!("set {} card(s) to {} degrees", present.len(), rotation.degrees());
        self.commit(ActionKind::Tap, present);
        Some(rotation)
    }

    /// Turn cards over wherever they are. Returns how many flipped.
    pub fn flip(&mut self, ids: &[CardId]) -> usize {
        let mut flipped: SmallVec<[CardId; 4]> = SmallVec::new();
        for id in ids {
            let Some(kind) = self.store.locate(id) else {
                continue;
            };
            if let Some(card) = self.store.card_in_mut(kind, id) {
                card.face_shown = card.face_shown.flipped();
                flipped.push(id.clone());
            }
        }
        let count = flipped.len();
        if count > 0 {
            self.commit(ActionKind::Flip, flipped);
        }
        count
    }

    /// Put a new placeholder token on the battlefield at the origin.
    pub fn create_placeholder(&mut self, id: CardId, text: &str) -> bool {
        let (x, y) = self.config.battlefield_origin;
        let card = Card::placeholder(id.clone(), text, x, y);
        if !self.store.append_to(ZoneKind::Battlefield, card) {
            return false;
        }
        self.commit(ActionKind::Placeholder, [id]);
        true
    }

    // === Counters ===

    pub fn increment_counter(&mut self, id: &CardId) -> bool {
        self.edit_counters(std::slice::from_ref(id), counters::increment) > 0
    }

    /// No-op on a card without counters.
    pub fn decrement_counter(&mut self, id: &CardId) -> bool {
        self.edit_counters(std::slice::from_ref(id), counters::decrement) > 0
    }

    pub fn set_counter(&mut self, id: &CardId, value: i32) -> bool {
        self.set_counters(std::slice::from_ref(id), value) > 0
    }

    /// Set the same value on several cards. Returns how many changed.
    pub fn set_counters(&mut self, ids: &[CardId], value: i32) -> usize {
        self.edit_counters(ids, |card| counters::set(card, value))
    }

    pub fn increment_counters(&mut self, ids: &[CardId]) -> usize {
        self.edit_counters(ids, counters::increment)
    }

    pub fn decrement_counters(&mut self, ids: &[CardId]) -> usize {
        self.edit_counters(ids, counters::decrement)
    }

    fn edit_counters(&mut self, ids: &[CardId], mut edit: impl FnMut(&mut Card) -> bool) -> usize {
        let mut changed: SmallVec<[CardId; 4]> = SmallVec::new();
        for id in ids {
            if let Some(card) = self.store.find_card_mut(id) {
                if edit(card) {
                    changed.push(id.clone());
                }
            }
        }
        let count = changed.len();
        if count > 0 {
            self.commit(ActionKind::Counter, changed);
        }
        count
    }

    // === Whole-board ===

    /// Shuffle everything back into the library.
    ///
    /// Hand, battlefield, graveyard and exile are emptied. Commanders from
    /// those zones join the command zone, placeholders disappear, and every
    /// other card is stripped to its identity, shuffled and put on top of the
    /// library.
    pub fn reset_all(&mut self, rng: &mut GameRng) -> ResetOutcome {
        const SWEPT: [ZoneKind; 4] = [
            ZoneKind::Hand,
            ZoneKind::Battlefield,
            ZoneKind::Graveyard,
            ZoneKind::Exile,
        ];

        let mut outcome = ResetOutcome::default();
        let mut returning = Vec::new();
        let mut commanders = Vec::new();

        for kind in SWEPT {
            let ids: Vec<CardId> = self.store.get(kind).ids().cloned().collect();
            for id in ids {
                let Some(mut card) = self.store.remove_from(kind, &id) else {
                    continue;
                };
                if card.is_commander {
                    card.clear_battlefield_state();
                    commanders.push(card);
                } else if card.is_placeholder {
                    outcome.placeholders_removed += 1;
                } else {
                    returning.push(card.stripped());
                }
            }
        }

        rng.shuffle(&mut returning);
        outcome.shuffled = returning.len();
        for card in returning {
            self.store.append_to(ZoneKind::Library, card);
        }
        for card in commanders {
            self.store.append_to(ZoneKind::Command, card);
        }
        outcome.commanders = self.store.get(ZoneKind::Command).len();

        log::debug!(
            "reset: {} shuffled, {} commander(s), {} placeholder(s) removed",
            outcome.shuffled,
            outcome.commanders,
            outcome.placeholders_removed
        );
        self.commit(ActionKind::Reset, std::iter::empty());
        outcome
    }

    /// Change life by `delta` and publish.
    pub fn adjust_life(&mut self, delta: i32) -> i32 {
        let life = self.store.life().saturating_add(delta);
        self.store.set_life(life);
        self.commit(ActionKind::Life, std::iter::empty());
        life
    }

    // === Side effects ===

    fn commit(&mut self, kind: ActionKind, ids: impl IntoIterator<Item = CardId>) {
        self.tracker.register(kind, ids, self.now);
        cascade::refresh(self.store, &self.config.cascade);
        self.transmitter.request(self.timers, self.now);
        self.timers.arm(TimerKind::Render, self.now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Face;
    use crate::core::config::DebounceConfig;
    use std::num::NonZeroI32;

    struct Fixture {
        store: ZoneStore,
        tracker: OptimisticActionTracker,
        timers: Scheduler,
        transmitter: MoveTransmitter,
        config: SessionConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let config = SessionConfig::default().with_seed(7);
            Self {
                store: ZoneStore::new(40, 80),
                tracker: OptimisticActionTracker::new(config.optimistic_ttl_ms),
                timers: Scheduler::new(&DebounceConfig::default()),
                transmitter: MoveTransmitter::new(),
                config,
            }
        }

        fn engine(&mut self, now: Millis) -> CardMovementEngine<'_> {
            CardMovementEngine::new(
                &mut self.store,
                &mut self.tracker,
                &mut self.timers,
                &mut self.transmitter,
                &self.config,
                now,
            )
        }

        fn ids(&self, kind: ZoneKind) -> Vec<&str> {
            self.store.get(kind).ids().map(CardId::as_str).collect()
        }
    }

    fn id(s: &str) -> CardId {
        CardId::new(s)
    }

    #[test]
    fn test_move_hand_to_battlefield_lands_at_origin() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Hand, Card::new("c1", "Lightning Bolt"));

        let outcome = fx.engine(0).move_card(&id("c1"), ZoneKind::Hand, ZoneKind::Battlefield);

        assert_eq!(outcome.moved.as_slice(), &[id("c1")]);
        let card = fx.store.card_in(ZoneKind::Battlefield, &id("c1")).unwrap();
        assert_eq!(card.position(), Some((50.0, 50.0)));
        assert_eq!(card.rotation, Rotation::Untapped);
        assert!(fx.store.get(ZoneKind::Hand).is_empty());
        assert!(fx.transmitter.has_pending());
        assert!(fx.timers.is_armed(TimerKind::Transmit));
        assert!(fx.timers.is_armed(TimerKind::Render));
        let action = fx.tracker.current(0).unwrap();
        assert_eq!(action.kind.to_string(), "handToPlay");
    }

    #[test]
    fn test_missing_card_is_noop() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Hand, Card::new("c1", "A"));

        let outcome = fx.engine(0).move_card(&id("c1"), ZoneKind::Graveyard, ZoneKind::Exile);

        assert!(outcome.is_empty());
        assert_eq!(fx.store.locate(&id("c1")), Some(ZoneKind::Hand));
        assert!(!fx.tracker.is_active(0));
        assert!(!fx.timers.is_armed(TimerKind::Transmit));
    }

    #[test]
    fn test_leaving_battlefield_resets_state() {
        let mut fx = Fixture::new();
        let mut card = Card::new("c1", "Bear").at(3.0, 4.0);
        card.rotation = Rotation::Tapped;
        card.counters = NonZeroI32::new(2);
        card.face_shown = Face::Back;
        fx.store.append_to(ZoneKind::Battlefield, card);

        fx.engine(0).move_card(&id("c1"), ZoneKind::Battlefield, ZoneKind::Graveyard);

        let card = fx.store.card_in(ZoneKind::Graveyard, &id("c1")).unwrap();
        assert_eq!(card.rotation, Rotation::Untapped);
        assert!(card.counters.is_none());
        assert_eq!(card.face_shown, Face::Front);
        assert!(card.position().is_none());
    }

    #[test]
    fn test_placeholder_discarded_leaving_battlefield() {
        let mut fx = Fixture::new();
        fx.store
            .append_to(ZoneKind::Battlefield, Card::placeholder("p1", "Token", 50.0, 50.0));

        let outcome = fx.engine(0).move_card(&id("p1"), ZoneKind::Battlefield, ZoneKind::Hand);

        assert!(outcome.moved.is_empty());
        assert_eq!(outcome.discarded, 1);
        assert!(!fx.store.contains(&id("p1")));
        assert!(fx.tracker.is_active(0));
    }

    #[test]
    fn test_group_move_skips_missing_and_drops_placeholders() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Battlefield, Card::new("a", "A").at(1.0, 1.0));
        fx.store
            .append_to(ZoneKind::Battlefield, Card::placeholder("p", "P", 5.0, 5.0));
        fx.store.append_to(ZoneKind::Battlefield, Card::new("b", "B").at(2.0, 2.0));

        let outcome = fx.engine(0).move_card_group(
            &[id("a"), id("ghost"), id("p"), id("b")],
            ZoneKind::Battlefield,
            ZoneKind::Exile,
        );

        assert_eq!(outcome.moved.len(), 2);
        assert_eq!(outcome.discarded, 1);
        assert_eq!(fx.ids(ZoneKind::Exile), vec!["a", "b"]);
        assert!(fx.store.get(ZoneKind::Battlefield).is_empty());
    }

    #[test]
    fn test_group_drop_offsets() {
        let mut fx = Fixture::new();
        for name in ["a", "b", "c"] {
            fx.store.append_to(ZoneKind::Hand, Card::new(name, name));
        }

        fx.engine(0).move_card_group_at(
            &[id("a"), id("b"), id("c")],
            ZoneKind::Hand,
            100.0,
            200.0,
        );

        let positions: Vec<_> = fx
            .store
            .get(ZoneKind::Battlefield)
            .iter()
            .map(|card| card.position().unwrap())
            .collect();
        assert_eq!(positions, vec![(100.0, 200.0), (115.0, 215.0), (130.0, 230.0)]);
    }

    #[test]
    fn test_move_card_at_overrides_position() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Graveyard, Card::new("a", "A"));

        fx.engine(0).move_card_at(&id("a"), ZoneKind::Graveyard, 12.0, 34.0);

        let card = fx.store.card_in(ZoneKind::Battlefield, &id("a")).unwrap();
        assert_eq!(card.position(), Some((12.0, 34.0)));
    }

    #[test]
    fn test_selection_to_library_bottom() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Library, Card::new("top", "T"));
        fx.store.append_to(ZoneKind::Hand, Card::new("h", "H"));
        fx.store.append_to(ZoneKind::Graveyard, Card::new("g", "G"));
        fx.store
            .append_to(ZoneKind::Battlefield, Card::placeholder("p", "P", 0.0, 0.0));

        let target = ZoneTarget::library_bottom();
        let outcome = fx
            .engine(0)
            .move_selection(&[id("h"), id("g"), id("p"), id("nope")], target);

        assert_eq!(fx.ids(ZoneKind::Library), vec!["g", "h", "top"]);
        assert_eq!(
            outcome.notice(target).as_deref(),
            Some("Moved 2 cards to bottom of library. Removed 1 placeholder card")
        );
        assert_eq!(
            fx.tracker.current(0).unwrap().kind,
            ActionKind::Selection { to: ZoneKind::Library }
        );
    }

    #[test]
    fn test_notice_single_card_and_placeholders_only() {
        let target = ZoneTarget::top(ZoneKind::Hand);
        let one = MoveOutcome {
            moved: [id("a")].into_iter().collect(),
            discarded: 0,
        };
        assert_eq!(one.notice(target).as_deref(), Some("Moved 1 card to hand"));

        let only_placeholders = MoveOutcome {
            moved: SmallVec::new(),
            discarded: 2,
        };
        assert_eq!(
            only_placeholders.notice(target).as_deref(),
            Some("Removed 2 placeholder cards")
        );
        assert_eq!(MoveOutcome::default().notice(target), None);
    }

    #[test]
    fn test_draw_takes_top() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Library, Card::new("bottom", "B"));
        fx.store.append_to(ZoneKind::Library, Card::new("top", "T"));

        assert_eq!(
            fx.engine(0).draw(ZoneKind::Library, ZoneKind::Hand),
            Some(id("top"))
        );
        assert_eq!(fx.ids(ZoneKind::Hand), vec!["top"]);
        assert_eq!(fx.engine(0).draw(ZoneKind::Exile, ZoneKind::Hand), None);
    }

    #[test]
    fn test_cascade_fills_freed_slot() {
        let mut fx = Fixture::new();
        for name in ["a", "b", "c"] {
            fx.store.append_to(ZoneKind::Hand, Card::new(name, name));
        }

        assert_eq!(fx.engine(0).place_cascaded(&id("a")), Some((10.0, 10.0)));
        assert_eq!(fx.engine(0).place_cascaded(&id("b")), Some((25.0, 10.0)));
        assert_eq!(fx.store.cascade_count(), 2);

        // Dragging "a" away frees slot 0; "b" no longer sits on slot 0 either.
        fx.engine(0).reposition(&id("a"), 400.0, 400.0);
        assert_eq!(fx.store.cascade_count(), 0);
        assert_eq!(fx.engine(0).place_cascaded(&id("c")), Some((10.0, 10.0)));

        let card = fx.store.card_in(ZoneKind::Battlefield, &id("c")).unwrap();
        assert!(card.from_hand_cascade);
    }

    #[test]
    fn test_cascade_requires_hand() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Graveyard, Card::new("a", "A"));
        assert_eq!(fx.engine(0).place_cascaded(&id("a")), None);
        assert_eq!(fx.store.locate(&id("a")), Some(ZoneKind::Graveyard));
    }

    #[test]
    fn test_tap_consensus() {
        let mut fx = Fixture::new();
        let mut tapped = Card::new("t", "T").at(0.0, 0.0);
        tapped.rotation = Rotation::Tapped;
        fx.store.append_to(ZoneKind::Battlefield, tapped);
        fx.store.append_to(ZoneKind::Battlefield, Card::new("u", "U").at(0.0, 0.0));
        fx.store.append_to(ZoneKind::Hand, Card::new("h", "H"));

        let group = [id("t"), id("u"), id("h")];
        assert_eq!(fx.engine(0).apply_tap_toggle(&group), Some(Rotation::Tapped));
        assert_eq!(fx.engine(0).apply_tap_toggle(&group), Some(Rotation::Untapped));
        assert!(fx
            .store
            .get(ZoneKind::Battlefield)
            .iter()
            .all(|card| card.rotation == Rotation::Untapped));
        assert_eq!(fx.engine(0).apply_tap_toggle(&[id("h")]), None);
    }

    #[test]
    fn test_flip_in_any_zone() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Battlefield, Card::new("a", "A").at(0.0, 0.0));
        fx.store.append_to(ZoneKind::Hand, Card::new("h", "H"));
        fx.store.append_to(ZoneKind::Command, Card::new("c", "C").commander());

        assert_eq!(fx.engine(0).flip(&[id("a"), id("h"), id("ghost")]), 2);
        assert_eq!(
            fx.store.card_in(ZoneKind::Battlefield, &id("a")).unwrap().face_shown,
            Face::Back
        );
        assert_eq!(fx.store.card_in(ZoneKind::Hand, &id("h")).unwrap().face_shown, Face::Back);
        assert_eq!(fx.store.card_in(ZoneKind::Command, &id("c")).unwrap().face_shown, Face::Front);

        assert_eq!(fx.engine(0).flip(&[id("h")]), 1);
        assert_eq!(fx.store.card_in(ZoneKind::Hand, &id("h")).unwrap().face_shown, Face::Front);
    }

    #[test]
    fn test_counter_operations() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Battlefield, Card::new("a", "A").at(0.0, 0.0));
        let a = id("a");

        assert!(!fx.engine(0).decrement_counter(&a));
        assert!(fx.engine(0).increment_counter(&a));
        assert_eq!(fx.store.find_card_by_id(&a).unwrap().counter_value(), 1);
        assert!(fx.engine(0).decrement_counter(&a));
        assert!(fx.store.find_card_by_id(&a).unwrap().counters.is_none());

        assert!(fx.engine(0).set_counter(&a, -4));
        assert_eq!(fx.store.find_card_by_id(&a).unwrap().counter_value(), -4);
        assert!(fx.engine(0).set_counter(&a, 0));
        assert!(fx.store.find_card_by_id(&a).unwrap().counters.is_none());
        assert!(!fx.engine(0).increment_counter(&id("ghost")));
    }

    #[test]
    fn test_placeholder_creation() {
        let mut fx = Fixture::new();
        assert!(fx.engine(0).create_placeholder(id("p1"), "Treasure"));
        let card = fx.store.card_in(ZoneKind::Battlefield, &id("p1")).unwrap();
        assert!(card.is_placeholder);
        assert_eq!(card.label(), "Treasure");
        assert_eq!(card.position(), Some((50.0, 50.0)));
        assert!(!fx.engine(0).create_placeholder(id("p1"), "Again"));
    }

    #[test]
    fn test_reset_all() {
        let mut fx = Fixture::new();
        fx.store.append_to(ZoneKind::Hand, Card::new("h", "H"));
        fx.store
            .append_to(ZoneKind::Battlefield, Card::new("cmd", "Commander").at(1.0, 1.0).commander());
        fx.store
            .append_to(ZoneKind::Battlefield, Card::placeholder("p", "P", 0.0, 0.0));
        let mut tapped = Card::new("b", "B").at(9.0, 9.0);
        tapped.rotation = Rotation::Tapped;
        fx.store.append_to(ZoneKind::Battlefield, tapped);
        fx.store.append_to(ZoneKind::Graveyard, Card::new("g", "G"));
        fx.store.append_to(ZoneKind::Exile, Card::new("e", "E"));
        fx.store.append_to(ZoneKind::Library, Card::new("l", "L"));
        fx.store.set_cascade_count(3);

        let mut rng = GameRng::new(1);
        let outcome = fx.engine(0).reset_all(&mut rng);

        assert_eq!(outcome.shuffled, 4);
        assert_eq!(outcome.commanders, 1);
        assert_eq!(outcome.placeholders_removed, 1);
        assert_eq!(
            outcome.notice(),
            "Your cards have been shuffled into your library! 1 commander returned to command zone."
        );
        for kind in [ZoneKind::Hand, ZoneKind::Battlefield, ZoneKind::Graveyard, ZoneKind::Exile] {
            assert!(fx.store.get(kind).is_empty());
        }
        assert_eq!(fx.store.get(ZoneKind::Library).len(), 5);
        assert_eq!(fx.ids(ZoneKind::Library)[0], "l");
        assert!(fx
            .store
            .get(ZoneKind::Library)
            .iter()
            .all(|card| card.rotation == Rotation::Untapped && card.position().is_none()));
        assert_eq!(fx.ids(ZoneKind::Command), vec!["cmd"]);
        assert_eq!(fx.store.cascade_count(), 0);
    }

    #[test]
    fn test_adjust_life_publishes() {
        let mut fx = Fixture::new();
        assert_eq!(fx.engine(0).adjust_life(-3), 37);
        assert_eq!(fx.engine(0).adjust_life(1), 38);
        assert!(fx.timers.is_armed(TimerKind::Transmit));
    }
}
