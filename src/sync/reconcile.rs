//! Applying authoritative snapshots to local state.
//!
//! ## Incremental merge
//!
//! For the local player's own zones:
//! - inside the optimistic window, local state stays authoritative and only
//!   battlefield cards the client has never seen are appended;
//! - otherwise all six zones and life are replaced by the snapshot.
//!
//! Every other player's board always follows the snapshot, except that their
//! library is shown through [`SpectatedLibraryCache`].
//!
//! ## Full resync
//!
//! After a reconnect the merge heuristic is skipped: the local player's six
//! zones and life are replaced unconditionally.

use rustc_hash::FxHashMap;

use crate::core::clock::Millis;
use crate::core::player::PlayerId;
use crate::protocol::GameSnapshot;
use crate::zones::{ZoneKind, ZoneSet, ZoneStore};

use super::library_cache::SpectatedLibraryCache;
use super::optimistic::OptimisticActionTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMode {
    Incremental,
    FullResync,
}

/// What happened to the local player's own zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnZonesOutcome {
    /// Local edits kept; `appended` unseen battlefield cards added.
    Preserved { appended: usize },
    /// Snapshot adopted.
    Replaced,
    /// Full resync applied.
    Resynced,
    /// Snapshot had no record for the local player (or none is known).
    Absent,
}

/// Another player's board as shown to this client.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectatedBoard {
    pub player: PlayerId,
    pub display_name: String,
    pub life: Option<i32>,
    pub zones: ZoneSet,
}

#[derive(Clone, Debug)]
pub struct ReconciliationService {
    library_cache: SpectatedLibraryCache,
    spectated: FxHashMap<PlayerId, SpectatedBoard>,
}

impl ReconciliationService {
    #[must_use]
    pub fn new(library_cache: SpectatedLibraryCache) -> Self {
        Self {
            library_cache,
            spectated: FxHashMap::default(),
        }
    }

    /// Apply `snapshot` to the local store and the spectated boards.
    pub fn apply(
        &mut self,
        store: &mut ZoneStore,
        snapshot: &GameSnapshot,
        local: Option<&PlayerId>,
        mode: MergeMode,
        tracker: &OptimisticActionTracker,
        now: Millis,
    ) -> OwnZonesOutcome {
        let outcome = match (local, mode) {
            (None, _) => OwnZonesOutcome::Absent,
            (Some(player), MergeMode::FullResync) => {
                if Self::full_resync(store, snapshot, player) {
                    OwnZonesOutcome::Resynced
                } else {
                    OwnZonesOutcome::Absent
                }
            }
            (Some(player), MergeMode::Incremental) => {
                Self::merge_own(store, snapshot, player, tracker, now)
            }
        };
        self.refresh_spectated(snapshot, local);
        outcome
    }

    /// Replace the local player's six zones and life from `snapshot`.
    ///
    /// Returns `false`, leaving the store untouched, if the snapshot has no
    /// record for `player`.
    pub fn full_resync(store: &mut ZoneStore, snapshot: &GameSnapshot, player: &PlayerId) -> bool {
        let Some(zones) = snapshot.zone_set(player) else {
            log::warn!("resync snapshot has no record for {}", player);
            return false;
        };
        store.replace_all(zones);
        if let Some(life) = snapshot.player(player).and_then(|record| record.life) {
            store.set_life(life);
        }
        log::info!(
            "resynced {}: {} cards, life {}",
            player,
            store.total_cards(),
            store.life()
        );
        true
    }

    fn merge_own(
        store: &mut ZoneStore,
        snapshot: &GameSnapshot,
        player: &PlayerId,
        tracker: &OptimisticActionTracker,
        now: Millis,
    ) -> OwnZonesOutcome {
        let Some(record) = snapshot.player(player) else {
            return OwnZonesOutcome::Absent;
        };

        if let Some(action) = tracker.current(now) {
            log::debug!("preserving local zones for recent {}", action.kind);
            let mut appended = 0;
            if let Some(server_battlefield) = snapshot.play_zones.get(player) {
                for card in server_battlefield.iter() {
                    // Anything the client knows about, in any zone, stays put.
                    if !store.contains(&card.id)
                        && store.append_to(ZoneKind::Battlefield, card.clone())
                    {
                        appended += 1;
                    }
                }
            }
            return OwnZonesOutcome::Preserved { appended };
        }

        if let Some(zones) = snapshot.zone_set(player) {
            store.replace_all(zones);
        }
        if let Some(life) = record.life {
            store.set_life(life);
        }
        log::debug!("adopted server zones for {}", player);
        OwnZonesOutcome::Replaced
    }

    fn refresh_spectated(&mut self, snapshot: &GameSnapshot, local: Option<&PlayerId>) {
        self.spectated.retain(|player, _| snapshot.players.contains_key(player));
        self.library_cache
            .retain(|player| snapshot.players.contains_key(player));

        for (player, record) in &snapshot.players {
            if Some(player) == local {
                continue;
            }
            let Some(mut zones) = snapshot.zone_set(player) else {
                continue;
            };
            let library = self.library_cache.permuted(player, &record.library);
            zones.set(ZoneKind::Library, library);

            self.spectated.insert(
                player.clone(),
                SpectatedBoard {
                    player: player.clone(),
                    display_name: record.display_name.clone(),
                    life: record.life,
                    zones,
                },
            );
        }
        if let Some(local) = local {
            self.spectated.remove(local);
        }
    }

    #[must_use]
    pub fn spectated(&self, player: &PlayerId) -> Option<&SpectatedBoard> {
        self.spectated.get(player)
    }

    pub fn spectated_boards(&self) -> impl Iterator<Item = &SpectatedBoard> + '_ {
        self.spectated.values()
    }

    /// Forget cached library permutations and spectated boards.
    pub fn reset(&mut self) {
        self.library_cache.clear();
        self.spectated.clear();
    }
}
