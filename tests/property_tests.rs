//! Property tests for zone invariants.

use std::collections::HashSet;

use proptest::prelude::*;
use tabletop_sync::{
    Card, CardId, CardMovementEngine, MoveTransmitter, OptimisticActionTracker, Rotation,
    Scheduler, SessionConfig, ZoneKind, ZoneStore, ZoneTarget,
};

const DECK: usize = 12;

#[derive(Clone, Debug)]
enum Op {
    Move { card: usize, from: usize, to: usize },
    Group { cards: Vec<usize>, from: usize, to: usize },
    Selection { cards: Vec<usize>, to: usize, bottom: bool },
    Cascade { card: usize },
    Tap { cards: Vec<usize> },
    Counter { card: usize, delta: i32 },
}

fn zone(index: usize) -> ZoneKind {
    ZoneKind::ALL[index % ZoneKind::COUNT]
}

fn card_id(index: usize) -> CardId {
    CardId::new(format!("c{}", index % DECK))
}

fn op() -> impl Strategy<Value = Op> {
    let card = 0..DECK;
    let zone = 0..ZoneKind::COUNT;
    let cards = prop::collection::vec(0..DECK, 0..5);
    prop_oneof![
        (card.clone(), zone.clone(), zone.clone())
            .prop_map(|(card, from, to)| Op::Move { card, from, to }),
        (cards.clone(), zone.clone(), zone.clone())
            .prop_map(|(cards, from, to)| Op::Group { cards, from, to }),
        (cards.clone(), zone.clone(), any::<bool>())
            .prop_map(|(cards, to, bottom)| Op::Selection { cards, to, bottom }),
        card.clone().prop_map(|card| Op::Cascade { card }),
        cards.prop_map(|cards| Op::Tap { cards }),
        (card, -3i32..=3).prop_map(|(card, delta)| Op::Counter { card, delta }),
    ]
}

struct Table {
    store: ZoneStore,
    tracker: OptimisticActionTracker,
    timers: Scheduler,
    transmitter: MoveTransmitter,
    config: SessionConfig,
}

impl Table {
    fn dealt() -> Self {
        let config = SessionConfig::default().with_seed(1);
        let mut store = ZoneStore::new(40, 80);
        for i in 0..DECK {
            let kind = zone(i);
            let card = if kind.is_battlefield() {
                if i < ZoneKind::COUNT {
                    Card::placeholder(card_id(i), "Token", 0.0, 0.0)
                } else {
                    Card::new(card_id(i), "Card").at(1.0, 1.0)
                }
            } else {
                Card::new(card_id(i), "Card")
            };
            store.append_to(kind, card);
        }
        Self {
            store,
            tracker: OptimisticActionTracker::new(config.optimistic_ttl_ms),
            timers: Scheduler::new(&config.debounce),
            transmitter: MoveTransmitter::new(),
            config,
        }
    }

    fn engine(&mut self) -> CardMovementEngine<'_> {
        CardMovementEngine::new(
            &mut self.store,
            &mut self.tracker,
            &mut self.timers,
            &mut self.transmitter,
            &self.config,
            0,
        )
    }

    fn apply(&mut self, op: &Op) {
        let ids = |cards: &[usize]| cards.iter().copied().map(card_id).collect::<Vec<_>>();
        match op {
            Op::Move { card, from, to } => {
                self.engine().move_card(&card_id(*card), zone(*from), zone(*to));
            }
            Op::Group { cards, from, to } => {
                self.engine().move_card_group(&ids(cards), zone(*from), zone(*to));
            }
            Op::Selection { cards, to, bottom } => {
                let target = if *bottom {
                    ZoneTarget::library_bottom()
                } else {
                    ZoneTarget::top(zone(*to))
                };
                self.engine().move_selection(&ids(cards), target);
            }
            Op::Cascade { card } => {
                self.engine().place_cascaded(&card_id(*card));
            }
            Op::Tap { cards } => {
                self.engine().apply_tap_toggle(&ids(cards));
            }
            Op::Counter { card, delta } => {
                let id = card_id(*card);
                for _ in 0..delta.unsigned_abs() {
                    if *delta > 0 {
                        self.engine().increment_counter(&id);
                    } else {
                        self.engine().decrement_counter(&id);
                    }
                }
            }
        }
    }
}

proptest! {
    /// No card is ever in two zones, and only placeholders ever disappear.
    #[test]
    fn prop_zone_exclusivity(ops in prop::collection::vec(op(), 0..40)) {
        let mut table = Table::dealt();
        let placeholders: HashSet<CardId> = table
            .store
            .get(ZoneKind::Battlefield)
            .iter()
            .filter(|card| card.is_placeholder)
            .map(|card| card.id.clone())
            .collect();

        for op in &ops {
            table.apply(op);

            let mut seen = HashSet::new();
            for kind in ZoneKind::ALL {
                for card in table.store.get(kind).iter() {
                    prop_assert!(seen.insert(card.id.clone()), "{} in two zones", card.id);
                    prop_assert_eq!(table.store.locate(&card.id), Some(kind));
                }
            }
            for i in 0..DECK {
                let id = card_id(i);
                prop_assert!(seen.contains(&id) || placeholders.contains(&id));
            }
        }
    }

    /// Off-battlefield cards carry no battlefield state; nothing stores zero counters.
    #[test]
    fn prop_battlefield_state_confined(ops in prop::collection::vec(op(), 0..40)) {
        let mut table = Table::dealt();
        for op in &ops {
            table.apply(op);
        }
        for kind in ZoneKind::ALL {
            for card in table.store.get(kind).iter() {
                prop_assert!(card.counters.map_or(true, |n| n.get() != 0));
                if kind.is_battlefield() {
                    prop_assert!(card.position().is_some());
                } else {
                    prop_assert!(card.position().is_none());
                    prop_assert_eq!(card.rotation, Rotation::Untapped);
                    prop_assert!(!card.is_placeholder);
                }
            }
        }
    }

    /// Counters follow integer arithmetic with absent standing for zero,
    /// except that decrementing from absent does nothing.
    #[test]
    fn prop_counter_normalization(steps in prop::collection::vec(any::<bool>(), 0..30)) {
        let mut table = Table::dealt();
        let id = card_id(1);
        let mut expected = 0i32;
        for up in steps {
            if up {
                table.engine().increment_counter(&id);
                expected += 1;
            } else if expected != 0 {
                table.engine().decrement_counter(&id);
                expected -= 1;
            } else {
                table.engine().decrement_counter(&id);
            }
            let card = table.store.find_card_by_id(&id).unwrap();
            prop_assert_eq!(card.counter_value(), expected);
            prop_assert_eq!(card.has_counters(), expected != 0);
        }
    }

    /// Any untapped member taps the group; an all-tapped group untaps.
    #[test]
    fn prop_tap_consensus(tapped in prop::collection::vec(any::<bool>(), 1..8)) {
        let config = SessionConfig::default().with_seed(2);
        let mut store = ZoneStore::new(40, 80);
        let ids: Vec<CardId> = (0..tapped.len()).map(|i| CardId::new(format!("t{i}"))).collect();
        for (id, &is_tapped) in ids.iter().zip(&tapped) {
            let mut card = Card::new(id.clone(), "Card").at(0.0, 0.0);
            if is_tapped {
                card.rotation = Rotation::Tapped;
            }
            store.append_to(ZoneKind::Battlefield, card);
        }
        let mut tracker = OptimisticActionTracker::new(config.optimistic_ttl_ms);
        let mut timers = Scheduler::new(&config.debounce);
        let mut transmitter = MoveTransmitter::new();
        let applied = CardMovementEngine::new(
            &mut store,
            &mut tracker,
            &mut timers,
            &mut transmitter,
            &config,
            0,
        )
        .apply_tap_toggle(&ids);

        let expected = if tapped.iter().all(|&t| t) {
            Rotation::Untapped
        } else {
            Rotation::Tapped
        };
        prop_assert_eq!(applied, Some(expected));
        for card in store.get(ZoneKind::Battlefield).iter() {
            prop_assert_eq!(card.rotation, expected);
        }
    }
}
