//! Time source for debounce timers and optimistic-action expiry.
//!
//! All timing in the crate is expressed as [`Millis`] since an arbitrary
//! epoch. Production code uses [`SystemClock`]; tests drive a
//! [`ManualClock`] forward explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds since the clock's epoch.
pub type Millis = u64;

/// A monotonic millisecond clock.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Monotonic wall clock, epoch at construction.
#[derive(Clone, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.epoch.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock. Clones share the same time.
///
/// ```
/// use tabletop_sync::core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(50);
/// assert_eq!(clock.now(), 50);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(now: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn advance(&self, by: Millis) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}
