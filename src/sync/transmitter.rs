//! Outbound state publishing.
//!
//! Local edits call [`MoveTransmitter::request`], which (re-)arms the
//! transmit timer. When the timer fires, the session asks for one
//! [`PublishState`] built from the store *at that moment*, so a burst of
//! edits collapses into a single message carrying the final state.

use crate::core::clock::Millis;
use crate::protocol::PublishState;
use crate::zones::ZoneStore;

use super::debounce::{Scheduler, TimerKind};

#[derive(Clone, Debug, Default)]
pub struct MoveTransmitter {
    /// Requests since the last publish.
    pending: u32,
}

impl MoveTransmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a publish; coalesces with any request still inside the window.
    pub fn request(&mut self, timers: &mut Scheduler, now: Millis) {
        self.pending += 1;
        timers.arm(TimerKind::Transmit, now);
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Drop pending requests without sending (not yet seated at a table).
    pub fn discard(&mut self) {
        if self.pending > 0 {
            log::debug!("discarding {} publish request(s): not joined", self.pending);
        }
        self.pending = 0;
    }

    /// Build the full-state payload. Called when the transmit timer fires.
    pub fn publish(&mut self, store: &ZoneStore) -> PublishState {
        log::debug!("publishing zone state ({} request(s) coalesced)", self.pending);
        self.pending = 0;
        PublishState::from_store(store)
    }
}
