//! Optimistic-action window.
//!
//! The tracker holds at most one pending action: the most recent local
//! mutation. While it is younger than the TTL, snapshots may only add to the
//! local player's own zones, never overwrite them.

use smallvec::SmallVec;

use crate::core::card::CardId;
use crate::core::clock::Millis;
use crate::zones::ZoneKind;

/// What kind of local mutation was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Single, group, cascade and draw moves between two zones.
    Move { from: ZoneKind, to: ZoneKind },
    /// Selection moved from mixed sources.
    Selection { to: ZoneKind },
    Reposition,
    Tap,
    Flip,
    Counter,
    Placeholder,
    Life,
    Reset,
}

impl std::fmt::Display for ActionKind {
    /// Move names follow the `<source>To<Target>` convention, e.g. `handToPlay`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Move { from, to } => write!(f, "{}To{}", from.key(), to.capitalized()),
            ActionKind::Selection { to } => write!(f, "selectionTo{}", to.capitalized()),
            ActionKind::Reposition => f.write_str("reposition"),
            ActionKind::Tap => f.write_str("tapUntap"),
            ActionKind::Flip => f.write_str("flip"),
            ActionKind::Counter => f.write_str("counter"),
            ActionKind::Placeholder => f.write_str("placeholder"),
            ActionKind::Life => f.write_str("life"),
            ActionKind::Reset => f.write_str("reset"),
        }
    }
}

/// A recorded local mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimisticAction {
    pub kind: ActionKind,
    pub card_ids: SmallVec<[CardId; 4]>,
    pub timestamp: Millis,
}

/// Single-slot, most-recent-wins tracker.
#[derive(Clone, Debug)]
pub struct OptimisticActionTracker {
    ttl: Millis,
    pending: Option<OptimisticAction>,
}

impl OptimisticActionTracker {
    #[must_use]
    pub fn new(ttl: Millis) -> Self {
        Self { ttl, pending: None }
    }

    #[must_use]
    pub fn ttl(&self) -> Millis {
        self.ttl
    }

    /// Record a mutation, replacing any earlier one and restarting the window.
    pub fn register(
        &mut self,
        kind: ActionKind,
        card_ids: impl IntoIterator<Item = CardId>,
        now: Millis,
    ) {
        let action = OptimisticAction {
            kind,
            card_ids: card_ids.into_iter().collect(),
            timestamp: now,
        };
        log::debug!("optimistic action {} on {} card(s)", kind, action.card_ids.len());
        self.pending = Some(action);
    }

    /// The pending action if still inside its window.
    #[must_use]
    pub fn current(&self, now: Millis) -> Option<&OptimisticAction> {
        self.pending
            .as_ref()
            .filter(|action| now.saturating_sub(action.timestamp) < self.ttl)
    }

    #[must_use]
    pub fn is_active(&self, now: Millis) -> bool {
        self.current(now).is_some()
    }

    /// Instant at which the pending action stops shielding local state.
    #[must_use]
    pub fn expires_at(&self) -> Option<Millis> {
        self.pending.as_ref().map(|action| action.timestamp + self.ttl)
    }

    /// Drop the pending action if its window has passed.
    pub fn expire(&mut self, now: Millis) {
        if self.pending.is_some() && !self.is_active(now) {
            self.pending = None;
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
