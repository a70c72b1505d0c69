//! Stable shuffled view of other players' libraries.
//!
//! Spectators must not see true library order, but re-randomizing on every
//! snapshot makes the pile visibly churn. The cache keeps one permutation per
//! player and only reshuffles when the library's length or its first three
//! cards change.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::card::{Card, CardId};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::zones::Zone;

/// What a cached permutation was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LibraryCacheKey {
    pub player: PlayerId,
    pub len: usize,
    pub head: SmallVec<[CardId; 3]>,
}

impl LibraryCacheKey {
    #[must_use]
    pub fn new(player: &PlayerId, library: &Zone) -> Self {
        Self {
            player: player.clone(),
            len: library.len(),
            head: library.head(3).map(|card| card.id.clone()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpectatedLibraryCache {
    rng: GameRng,
    entries: FxHashMap<PlayerId, (LibraryCacheKey, Zone)>,
}

impl SpectatedLibraryCache {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            rng,
            entries: FxHashMap::default(),
        }
    }

    /// Shuffled view of `library`, reused while its key is unchanged.
    pub fn permuted(&mut self, player: &PlayerId, library: &Zone) -> Zone {
        let key = LibraryCacheKey::new(player, library);
        if let Some((cached_key, zone)) = self.entries.get(player) {
            if *cached_key == key {
                return zone.clone();
            }
        }

        let mut cards: Vec<Card> = library.to_vec();
        self.rng.shuffle(&mut cards);
        let zone = Zone::from(cards);
        log::debug!("reshuffled spectated library of {} ({} cards)", player, key.len);
        self.entries.insert(player.clone(), (key, zone.clone()));
        zone
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop permutations of players for whom `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(&PlayerId) -> bool) {
        self.entries.retain(|player, _| keep(player));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
